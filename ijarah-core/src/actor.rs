//! Actor-based concurrency for the ledger
//!
//! One task owns the engine and drains a bounded mailbox, so every
//! operation's read-modify-write sequence (and its single payout) commits
//! fully before the next operation is observed. This serializes all
//! operations, which is stronger than the per-identity atomicity the
//! record model strictly needs, and keeps the store free of locking.

use tokio::sync::{mpsc, oneshot};

use crate::engine::LedgerEngine;
use crate::error::{Error, Result};
use crate::types::{
    ClaimReceipt, DepositReceipt, DepositorId, OwnPosition, Payment, Position, WithdrawReceipt,
};

/// Message sent to the ledger actor
#[derive(Debug)]
pub enum LedgerMessage {
    /// Apply an inbound deposit payment
    Deposit {
        /// The inbound payment
        payment: Payment,
        /// Response channel
        response: oneshot::Sender<Result<DepositReceipt>>,
    },

    /// Pay out the caller's accrued ujrah
    Claim {
        /// Claiming depositor
        caller: DepositorId,
        /// Response channel
        response: oneshot::Sender<Result<ClaimReceipt>>,
    },

    /// Withdraw principal plus accrued ujrah
    Withdraw {
        /// Withdrawing depositor
        caller: DepositorId,
        /// Principal amount requested
        amount: u64,
        /// Response channel
        response: oneshot::Sender<Result<WithdrawReceipt>>,
    },

    /// Read the caller's own position
    OwnPosition {
        /// Querying depositor
        caller: DepositorId,
        /// Response channel
        response: oneshot::Sender<Result<OwnPosition>>,
    },

    /// Read any depositor's position
    PeerPosition {
        /// Queried identity
        id: DepositorId,
        /// Response channel
        response: oneshot::Sender<Result<Position>>,
    },

    /// Read the holding account's aggregate balance
    TotalBalance {
        /// Response channel
        response: oneshot::Sender<Result<u64>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that processes ledger messages
#[derive(Debug)]
pub struct LedgerActor {
    /// The engine this actor owns
    engine: LedgerEngine,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<LedgerMessage>,
}

impl LedgerActor {
    /// Create new actor
    pub fn new(engine: LedgerEngine, mailbox: mpsc::Receiver<LedgerMessage>) -> Self {
        Self { engine, mailbox }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                LedgerMessage::Shutdown => break,
                _ => self.handle_message(msg),
            }
        }

        tracing::info!("Ledger actor stopped");
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: LedgerMessage) {
        match msg {
            LedgerMessage::Deposit { payment, response } => {
                let _ = response.send(self.engine.deposit(&payment));
            }

            LedgerMessage::Claim { caller, response } => {
                let _ = response.send(self.engine.claim(&caller));
            }

            LedgerMessage::Withdraw {
                caller,
                amount,
                response,
            } => {
                let _ = response.send(self.engine.withdraw(&caller, amount));
            }

            LedgerMessage::OwnPosition { caller, response } => {
                let _ = response.send(self.engine.own_position(&caller));
            }

            LedgerMessage::PeerPosition { id, response } => {
                let _ = response.send(self.engine.peer_position(&id));
            }

            LedgerMessage::TotalBalance { response } => {
                let _ = response.send(self.engine.total_balance());
            }

            LedgerMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Debug, Clone)]
pub struct LedgerHandle {
    sender: mpsc::Sender<LedgerMessage>,
}

impl LedgerHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<LedgerMessage>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        msg: LedgerMessage,
        rx: oneshot::Receiver<Result<T>>,
    ) -> Result<T> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Apply an inbound deposit payment
    pub async fn deposit(&self, payment: Payment) -> Result<DepositReceipt> {
        let (tx, rx) = oneshot::channel();
        self.request(
            LedgerMessage::Deposit {
                payment,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Pay out the caller's accrued ujrah
    pub async fn claim(&self, caller: DepositorId) -> Result<ClaimReceipt> {
        let (tx, rx) = oneshot::channel();
        self.request(
            LedgerMessage::Claim {
                caller,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Withdraw principal plus accrued ujrah
    pub async fn withdraw(&self, caller: DepositorId, amount: u64) -> Result<WithdrawReceipt> {
        let (tx, rx) = oneshot::channel();
        self.request(
            LedgerMessage::Withdraw {
                caller,
                amount,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Read the caller's own position
    pub async fn own_position(&self, caller: DepositorId) -> Result<OwnPosition> {
        let (tx, rx) = oneshot::channel();
        self.request(
            LedgerMessage::OwnPosition {
                caller,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Read any depositor's position
    pub async fn peer_position(&self, id: DepositorId) -> Result<Position> {
        let (tx, rx) = oneshot::channel();
        self.request(LedgerMessage::PeerPosition { id, response: tx }, rx)
            .await
    }

    /// Read the holding account's aggregate balance
    pub async fn total_balance(&self) -> Result<u64> {
        let (tx, rx) = oneshot::channel();
        self.request(LedgerMessage::TotalBalance { response: tx }, rx)
            .await
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(LedgerMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the ledger actor
pub fn spawn_ledger_actor(engine: LedgerEngine) -> LedgerHandle {
    let (tx, rx) = mpsc::channel(1000); // Bounded channel for backpressure
    let actor = LedgerActor::new(engine, rx);

    tokio::spawn(async move {
        actor.run().await;
    });

    LedgerHandle::new(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::LedgerConfig;
    use crate::store::MemoryStore;
    use crate::treasury::InMemoryTreasury;
    use std::sync::Arc;

    fn spawn_test_actor() -> (LedgerHandle, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let engine = LedgerEngine::new(
            Arc::new(MemoryStore::new()),
            Arc::new(InMemoryTreasury::new(1_000_000_000)),
            clock.clone(),
            &LedgerConfig::default(),
        );
        (spawn_ledger_actor(engine), clock)
    }

    fn deposit_of(amount: u64) -> Payment {
        Payment {
            sender: DepositorId::new("alice"),
            receiver: DepositorId::new(LedgerConfig::default().holding_account),
            amount,
        }
    }

    #[tokio::test]
    async fn test_actor_spawn_and_shutdown() {
        let (handle, _clock) = spawn_test_actor();
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_actor_deposit_and_query() {
        let (handle, _clock) = spawn_test_actor();

        let receipt = handle.deposit(deposit_of(2_000_000)).await.unwrap();
        assert_eq!(receipt.new_principal, 2_000_000);

        let position = handle
            .own_position(DepositorId::new("alice"))
            .await
            .unwrap();
        assert_eq!(position.principal, 2_000_000);
        assert_eq!(position.accrued, 0);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_actor_full_cycle() {
        let (handle, clock) = spawn_test_actor();
        let alice = DepositorId::new("alice");

        handle.deposit(deposit_of(1_000_000)).await.unwrap();
        clock.advance(crate::accrual::DEFAULT_SECONDS_PER_YEAR);

        let claim = handle.claim(alice.clone()).await.unwrap();
        assert_eq!(claim.amount, 30_000);

        let withdraw = handle.withdraw(alice.clone(), 1_000_000).await.unwrap();
        assert_eq!(withdraw.total, 1_000_000);

        let position = handle.own_position(alice).await.unwrap();
        assert_eq!(position.principal, 0);

        handle.shutdown().await.unwrap();
    }
}

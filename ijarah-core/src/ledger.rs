//! Main ledger orchestration layer
//!
//! Ties together the record store, the engine and the actor into a
//! high-level async API for the public operation surface.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ijarah_core::{Config, InMemoryTreasury, Ledger};
//!
//! #[tokio::main]
//! async fn main() -> ijarah_core::Result<()> {
//!     let config = Config::default();
//!     let treasury = Arc::new(InMemoryTreasury::default());
//!     let ledger = Ledger::open(config, treasury).await?;
//!
//!     // let receipt = ledger.deposit(payment).await?;
//!
//!     ledger.shutdown().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::actor::{spawn_ledger_actor, LedgerHandle};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::engine::LedgerEngine;
use crate::error::{Error, Result};
use crate::metrics::Metrics;
use crate::store::{RecordStore, RocksStore};
use crate::treasury::Treasury;
use crate::types::{
    ClaimReceipt, DepositReceipt, DepositorId, OwnPosition, Payment, Position, WithdrawReceipt,
};

/// Main ledger interface
#[derive(Debug)]
pub struct Ledger {
    /// Actor handle for serialized operations
    handle: LedgerHandle,

    /// Operation metrics
    metrics: Metrics,
}

impl Ledger {
    /// Open the ledger over RocksDB storage and the system clock
    pub async fn open(config: Config, treasury: Arc<dyn Treasury>) -> Result<Self> {
        let store = Arc::new(RocksStore::open(&config)?);
        Self::open_with(config, store, treasury, Arc::new(SystemClock)).await
    }

    /// Open the ledger over explicit collaborators
    ///
    /// Used by tests to inject the in-memory store and a manual clock.
    pub async fn open_with(
        config: Config,
        store: Arc<dyn RecordStore>,
        treasury: Arc<dyn Treasury>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.ledger.validate()?;

        let engine = LedgerEngine::new(store, treasury, clock, &config.ledger);
        let handle = spawn_ledger_actor(engine);
        let metrics = Metrics::new().map_err(|e| Error::Other(e.to_string()))?;

        tracing::info!(
            service = %config.service_name,
            rate_bp = config.ledger.rate_bp,
            minimum_deposit = config.ledger.minimum_deposit,
            "Ledger opened"
        );

        Ok(Self { handle, metrics })
    }

    /// Apply an inbound deposit payment
    pub async fn deposit(&self, payment: Payment) -> Result<DepositReceipt> {
        let started = Instant::now();
        let receipt = self.handle.deposit(payment).await?;

        self.metrics.record_deposit(receipt.settled_ujrah);
        self.metrics
            .record_operation_duration(started.elapsed().as_secs_f64());

        Ok(receipt)
    }

    /// Pay out the caller's accrued ujrah
    pub async fn claim(&self, caller: DepositorId) -> Result<ClaimReceipt> {
        let started = Instant::now();
        let receipt = self.handle.claim(caller).await?;

        self.metrics.record_claim(receipt.amount);
        self.metrics
            .record_operation_duration(started.elapsed().as_secs_f64());

        Ok(receipt)
    }

    /// Withdraw principal, partially or fully, plus accrued ujrah
    pub async fn withdraw(&self, caller: DepositorId, amount: u64) -> Result<WithdrawReceipt> {
        let started = Instant::now();
        let receipt = self.handle.withdraw(caller, amount).await?;

        self.metrics.record_withdrawal(receipt.total);
        self.metrics
            .record_operation_duration(started.elapsed().as_secs_f64());

        Ok(receipt)
    }

    /// The caller's own position
    pub async fn get_own_info(&self, caller: DepositorId) -> Result<OwnPosition> {
        self.handle.own_position(caller).await
    }

    /// Any depositor's position
    pub async fn check_other_info(&self, id: DepositorId) -> Result<Position> {
        self.handle.peer_position(id).await
    }

    /// Aggregate holding-account balance
    pub async fn total_balance(&self) -> Result<u64> {
        self.handle.total_balance().await
    }

    /// Operation metrics
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Shutdown ledger
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await
    }
}

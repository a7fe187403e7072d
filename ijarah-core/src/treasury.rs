//! Holding-account treasury abstraction
//!
//! The payment primitive that moves funds to an address is an external
//! collaborator; the engine only sees this trait. The holding account
//! bears any transfer cost, so `pay` takes no fee argument and
//! implementations must not deduct fees from the payout amount.

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::types::DepositorId;

/// Outbound payment primitive plus holding-account balance query
pub trait Treasury: Send + Sync {
    /// Move `amount` from the holding account to `to`
    fn pay(&self, to: &DepositorId, amount: u64) -> Result<()>;

    /// Current aggregate balance of the holding account
    fn balance(&self) -> Result<u64>;
}

#[derive(Debug, Default)]
struct TreasuryState {
    balance: u64,
    payouts: Vec<(DepositorId, u64)>,
}

/// In-memory treasury for tests and the demo server
///
/// Tracks the holding-account balance and records every outbound payout.
#[derive(Debug, Default)]
pub struct InMemoryTreasury {
    state: Mutex<TreasuryState>,
}

impl InMemoryTreasury {
    /// Create a treasury holding `initial_balance`
    pub fn new(initial_balance: u64) -> Self {
        Self {
            state: Mutex::new(TreasuryState {
                balance: initial_balance,
                payouts: Vec::new(),
            }),
        }
    }

    /// Credit an inbound payment to the holding account
    pub fn credit(&self, amount: u64) {
        let mut state = self.state.lock();
        state.balance = state.balance.saturating_add(amount);
    }

    /// All payouts performed so far, in order
    pub fn payouts(&self) -> Vec<(DepositorId, u64)> {
        self.state.lock().payouts.clone()
    }
}

impl Treasury for InMemoryTreasury {
    fn pay(&self, to: &DepositorId, amount: u64) -> Result<()> {
        let mut state = self.state.lock();

        if amount > state.balance {
            return Err(Error::Payout(format!(
                "holding account balance {} cannot cover payout of {}",
                state.balance, amount
            )));
        }

        state.balance -= amount;
        state.payouts.push((to.clone(), amount));
        Ok(())
    }

    fn balance(&self) -> Result<u64> {
        Ok(self.state.lock().balance)
    }
}

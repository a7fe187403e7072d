//! Ledger engine: operation planning and execution
//!
//! Every operation runs in two phases. Planning is pure: it maps the
//! previous record, the inputs and the current time to the payout amount
//! and the next persisted state, with all preconditions checked up front.
//! Execution then performs exactly one store write (or delete) followed by
//! at most one outbound payout. If the payout fails, the prior record is
//! restored before the error surfaces, so settled state and moved money
//! never diverge.

use std::fmt;
use std::sync::Arc;

use crate::accrual::AccrualParams;
use crate::clock::Clock;
use crate::config::LedgerConfig;
use crate::error::{Error, Result};
use crate::store::RecordStore;
use crate::treasury::Treasury;
use crate::types::{
    ClaimReceipt, DepositReceipt, DepositorId, LeaseRecord, OwnPosition, Payment, Position,
    WithdrawReceipt,
};

/// Planned outcome of a deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DepositPlan {
    /// Ujrah settled to the depositor before the principal changes
    pub settled_ujrah: u64,
    /// Record to persist
    pub record: LeaseRecord,
}

/// Planned outcome of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClaimPlan {
    /// Ujrah paid out
    pub ujrah: u64,
    /// Record to persist
    pub record: LeaseRecord,
}

/// Planned outcome of a withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WithdrawPlan {
    /// Principal portion plus settled ujrah
    pub total: u64,
    /// Record to persist, `None` when the withdrawal closes the lease
    pub record: Option<LeaseRecord>,
}

/// Plan a deposit of `amount` against the caller's previous record.
///
/// A brand-new record stamps `lease_start = now`; a top-up keeps the
/// existing start so deposits never reset the lineage.
pub(crate) fn plan_deposit(
    previous: Option<LeaseRecord>,
    amount: u64,
    now: u64,
    params: &AccrualParams,
) -> Result<DepositPlan> {
    let (prev_principal, settled_ujrah, lease_start, settle_time) = match previous {
        Some(prev) => {
            let settled = params.accrued(prev.principal, prev.last_accrual_time, now)?;
            // last_accrual_time must never decrease, even if the clock does.
            (
                prev.principal,
                settled,
                prev.lease_start,
                now.max(prev.last_accrual_time),
            )
        }
        None => (0, 0, now, now),
    };

    let new_principal = prev_principal.checked_add(amount).ok_or(Error::Overflow)?;

    Ok(DepositPlan {
        settled_ujrah,
        record: LeaseRecord {
            principal: new_principal,
            lease_start,
            last_accrual_time: settle_time,
        },
    })
}

/// Plan a claim against the caller's previous record.
pub(crate) fn plan_claim(
    previous: Option<LeaseRecord>,
    now: u64,
    params: &AccrualParams,
) -> Result<ClaimPlan> {
    let prev = previous.ok_or(Error::NoAccrualYet)?;

    let ujrah = params.accrued(prev.principal, prev.last_accrual_time, now)?;
    if ujrah == 0 {
        return Err(Error::NoAccrualYet);
    }

    Ok(ClaimPlan {
        ujrah,
        record: LeaseRecord {
            principal: prev.principal,
            lease_start: prev.lease_start,
            last_accrual_time: now,
        },
    })
}

/// Plan a withdrawal of `amount` against the caller's previous record.
pub(crate) fn plan_withdraw(
    previous: Option<LeaseRecord>,
    amount: u64,
    now: u64,
    params: &AccrualParams,
) -> Result<WithdrawPlan> {
    if amount == 0 {
        return Err(Error::InvalidAmount);
    }

    let prev = previous.ok_or(Error::InsufficientPrincipal {
        requested: amount,
        available: 0,
    })?;

    if amount > prev.principal {
        return Err(Error::InsufficientPrincipal {
            requested: amount,
            available: prev.principal,
        });
    }

    let ujrah = params.accrued(prev.principal, prev.last_accrual_time, now)?;
    let total = amount.checked_add(ujrah).ok_or(Error::Overflow)?;
    let new_principal = prev.principal - amount;

    let record = if new_principal == 0 {
        // Lineage ends, the record is deleted rather than kept at zero.
        None
    } else {
        Some(LeaseRecord {
            principal: new_principal,
            lease_start: prev.lease_start,
            last_accrual_time: now.max(prev.last_accrual_time),
        })
    };

    Ok(WithdrawPlan { total, record })
}

/// The accrual ledger engine
///
/// Stateless beyond its collaborators: record store, treasury and clock
/// are injected, accrual parameters are fixed at construction. All five
/// operations plus the queries live here; serialization of concurrent
/// invocations is the actor's job.
pub struct LedgerEngine {
    store: Arc<dyn RecordStore>,
    treasury: Arc<dyn Treasury>,
    clock: Arc<dyn Clock>,
    params: AccrualParams,
    minimum_deposit: u64,
    holding_account: DepositorId,
}

impl LedgerEngine {
    /// Build an engine from its collaborators and ledger configuration
    pub fn new(
        store: Arc<dyn RecordStore>,
        treasury: Arc<dyn Treasury>,
        clock: Arc<dyn Clock>,
        config: &LedgerConfig,
    ) -> Self {
        Self {
            store,
            treasury,
            clock,
            params: config.accrual_params(),
            minimum_deposit: config.minimum_deposit,
            holding_account: DepositorId::new(config.holding_account.clone()),
        }
    }

    /// Apply an inbound deposit payment
    pub fn deposit(&self, payment: &Payment) -> Result<DepositReceipt> {
        if payment.receiver != self.holding_account {
            return Err(Error::InvalidDestination {
                expected: self.holding_account.to_string(),
                actual: payment.receiver.to_string(),
            });
        }
        if payment.amount < self.minimum_deposit {
            return Err(Error::BelowMinimumDeposit {
                amount: payment.amount,
                minimum: self.minimum_deposit,
            });
        }

        let now = self.clock.now();
        let previous = self.store.get(&payment.sender)?;
        let plan = plan_deposit(previous, payment.amount, now, &self.params)?;

        self.store.put(&payment.sender, &plan.record)?;

        if plan.settled_ujrah > 0 {
            if let Err(err) = self.treasury.pay(&payment.sender, plan.settled_ujrah) {
                self.restore(&payment.sender, previous);
                return Err(err);
            }
        }

        tracing::info!(
            depositor = %payment.sender,
            amount = payment.amount,
            settled_ujrah = plan.settled_ujrah,
            new_principal = plan.record.principal,
            "Deposit applied"
        );

        Ok(DepositReceipt {
            new_principal: plan.record.principal,
            settled_ujrah: plan.settled_ujrah,
        })
    }

    /// Pay out the caller's accrued ujrah
    pub fn claim(&self, caller: &DepositorId) -> Result<ClaimReceipt> {
        let now = self.clock.now();
        let previous = self.store.get(caller)?;
        let plan = plan_claim(previous, now, &self.params)?;

        self.store.put(caller, &plan.record)?;

        if let Err(err) = self.treasury.pay(caller, plan.ujrah) {
            self.restore(caller, previous);
            return Err(err);
        }

        tracing::info!(depositor = %caller, ujrah = plan.ujrah, "Ujrah claimed");

        Ok(ClaimReceipt { amount: plan.ujrah })
    }

    /// Withdraw principal, partially or fully, plus accrued ujrah
    pub fn withdraw(&self, caller: &DepositorId, amount: u64) -> Result<WithdrawReceipt> {
        let now = self.clock.now();
        let previous = self.store.get(caller)?;
        let plan = plan_withdraw(previous, amount, now, &self.params)?;

        match plan.record {
            Some(record) => self.store.put(caller, &record)?,
            None => self.store.delete(caller)?,
        }

        if let Err(err) = self.treasury.pay(caller, plan.total) {
            self.restore(caller, previous);
            return Err(err);
        }

        tracing::info!(
            depositor = %caller,
            principal_withdrawn = amount,
            total_payout = plan.total,
            closed = plan.record.is_none(),
            "Lease withdrawal"
        );

        Ok(WithdrawReceipt { total: plan.total })
    }

    /// The caller's own position: principal, accrued ujrah, lease age
    pub fn own_position(&self, caller: &DepositorId) -> Result<OwnPosition> {
        let now = self.clock.now();

        match self.store.get(caller)? {
            None => Ok(OwnPosition {
                principal: 0,
                accrued: 0,
                elapsed: 0,
            }),
            Some(record) => Ok(OwnPosition {
                principal: record.principal,
                accrued: self
                    .params
                    .accrued(record.principal, record.last_accrual_time, now)?,
                elapsed: now.saturating_sub(record.lease_start),
            }),
        }
    }

    /// Any depositor's position; the ledger is publicly readable
    pub fn peer_position(&self, id: &DepositorId) -> Result<Position> {
        let now = self.clock.now();

        match self.store.get(id)? {
            None => Ok(Position {
                principal: 0,
                accrued: 0,
            }),
            Some(record) => Ok(Position {
                principal: record.principal,
                accrued: self
                    .params
                    .accrued(record.principal, record.last_accrual_time, now)?,
            }),
        }
    }

    /// Aggregate holding-account balance
    pub fn total_balance(&self) -> Result<u64> {
        self.treasury.balance()
    }

    /// Put the record back the way it was before a failed payout.
    fn restore(&self, id: &DepositorId, previous: Option<LeaseRecord>) {
        let result = match previous {
            Some(record) => self.store.put(id, &record),
            None => self.store.delete(id),
        };

        if let Err(err) = result {
            tracing::error!(
                depositor = %id,
                error = %err,
                "Failed to restore record after payout failure"
            );
        }
    }
}

impl fmt::Debug for LedgerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerEngine")
            .field("params", &self.params)
            .field("minimum_deposit", &self.minimum_deposit)
            .field("holding_account", &self.holding_account)
            .finish_non_exhaustive()
    }
}

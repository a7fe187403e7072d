//! Ijarah Accrual Ledger Core
//!
//! Lease/deposit accrual bookkeeping: depositors pay principal into a
//! shared pool, the pool accrues a time-proportional ujrah return at a
//! fixed annual rate, and depositors claim accrued return or withdraw
//! principal at any time.
//!
//! # Architecture
//!
//! - **Record model**: one fixed-layout record per depositor identity
//! - **Pure planning**: each operation computes its payout and next state
//!   before any side effect
//! - **Single writer**: one actor task serializes all operations
//! - **Injected collaborators**: record store, treasury and clock are
//!   traits supplied by the environment
//!
//! # Invariants
//!
//! - A record exists iff its principal is nonzero
//! - `last_accrual_time` never decreases across operations on one record
//! - Every payout is the recomputed accrued return, plus at most the
//!   stored principal
//! - Integer-only arithmetic, floor division exactly once per accrual

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod accrual;
pub mod actor;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod store;
pub mod treasury;
pub mod types;

// Re-exports
pub use accrual::AccrualParams;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, LedgerConfig};
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use store::{MemoryStore, RecordStore, RocksStore};
pub use treasury::{InMemoryTreasury, Treasury};
pub use types::{
    ClaimReceipt, DepositReceipt, DepositorId, LeaseRecord, OwnPosition, Payment, Position,
    WithdrawReceipt,
};

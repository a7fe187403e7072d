//! Error types for the accrual ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// The first five variants are precondition failures. They are checked
/// before any state mutation, so a failed operation commits nothing.
#[derive(Error, Debug)]
pub enum Error {
    /// Deposit payment not addressed to the holding account
    #[error("Invalid destination: payment addressed to {actual}, holding account is {expected}")]
    InvalidDestination {
        /// The holding account that must receive deposits
        expected: String,
        /// The receiver the payment actually named
        actual: String,
    },

    /// Deposit amount below the configured floor
    #[error("Deposit of {amount} is below the minimum of {minimum}")]
    BelowMinimumDeposit {
        /// Amount offered
        amount: u64,
        /// Configured minimum
        minimum: u64,
    },

    /// Withdrawal request for a zero amount
    #[error("Invalid amount: withdrawal must be greater than zero")]
    InvalidAmount,

    /// Withdrawal request exceeds the stored principal
    #[error("Insufficient principal: requested {requested}, available {available}")]
    InsufficientPrincipal {
        /// Amount requested
        requested: u64,
        /// Principal currently on record
        available: u64,
    },

    /// Claim with nothing accrued
    #[error("No ujrah accrued yet")]
    NoAccrualYet,

    /// Storage error (RocksDB)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Persisted record bytes do not match the fixed layout
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// Arithmetic overflow in an accrual or balance computation
    #[error("Arithmetic overflow")]
    Overflow,

    /// Outbound payout failed
    #[error("Payout failed: {0}")]
    Payout(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<rocksdb::Error> for Error {
    fn from(err: rocksdb::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

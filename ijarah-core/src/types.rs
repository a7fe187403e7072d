//! Core types for the accrual ledger
//!
//! All quantities are unsigned integers in the smallest currency unit.
//! The persisted record layout is fixed so the ledger stays compatible
//! with any other implementation written against the same storage.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Depositor identity (account address, opaque to the ledger)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepositorId(String);

impl DepositorId {
    /// Create new depositor ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identity bytes used for record keys
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for DepositorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encoded size of a persisted lease record
pub const RECORD_ENCODED_LEN: usize = 24;

/// Per-depositor lease record
///
/// Invariants:
/// - `principal > 0` whenever the record is stored; a record whose
///   principal reaches zero is deleted, never kept as a zero entry
/// - `last_accrual_time` never decreases across operations on one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseRecord {
    /// Outstanding deposited amount, smallest currency unit
    pub principal: u64,

    /// Start of the depositor's current lease lineage (seconds)
    pub lease_start: u64,

    /// Last instant up to which ujrah has been settled (seconds)
    pub last_accrual_time: u64,
}

impl LeaseRecord {
    /// Encode as three consecutive 8-byte big-endian unsigned integers:
    /// `principal || lease_start || last_accrual_time`
    pub fn encode(&self) -> [u8; RECORD_ENCODED_LEN] {
        let mut buf = [0u8; RECORD_ENCODED_LEN];
        buf[0..8].copy_from_slice(&self.principal.to_be_bytes());
        buf[8..16].copy_from_slice(&self.lease_start.to_be_bytes());
        buf[16..24].copy_from_slice(&self.last_accrual_time.to_be_bytes());
        buf
    }

    /// Decode from the fixed 24-byte layout
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != RECORD_ENCODED_LEN {
            return Err(Error::CorruptRecord(format!(
                "expected {} bytes, found {}",
                RECORD_ENCODED_LEN,
                bytes.len()
            )));
        }

        Ok(Self {
            principal: u64::from_be_bytes(bytes[0..8].try_into().expect("length checked")),
            lease_start: u64::from_be_bytes(bytes[8..16].try_into().expect("length checked")),
            last_accrual_time: u64::from_be_bytes(bytes[16..24].try_into().expect("length checked")),
        })
    }
}

/// Inbound payment delivered by the transport layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Account the payment came from (the depositor)
    pub sender: DepositorId,

    /// Account the payment was addressed to; must be the holding account
    pub receiver: DepositorId,

    /// Payment amount, smallest currency unit
    pub amount: u64,
}

/// Confirmation returned by a successful deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// Principal on record after the deposit
    pub new_principal: u64,

    /// Ujrah paid out to settle the open accrual window, 0 if none
    pub settled_ujrah: u64,
}

impl fmt::Display for DepositReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lease started! Amount: {}", self.new_principal)
    }
}

/// Confirmation returned by a successful claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    /// Ujrah paid out
    pub amount: u64,
}

impl fmt::Display for ClaimReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ujrah claimed: {}", self.amount)
    }
}

/// Confirmation returned by a successful withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    /// Principal portion plus settled ujrah
    pub total: u64,
}

impl fmt::Display for WithdrawReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Withdrawn {}", self.total)
    }
}

/// A caller's view of their own position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnPosition {
    /// Outstanding principal, 0 if no record exists
    pub principal: u64,

    /// Ujrah accrued as of now
    pub accrued: u64,

    /// Seconds since the lease lineage began, 0 if no record exists
    pub elapsed: u64,
}

/// Public view of any depositor's position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Outstanding principal, 0 if no record exists
    pub principal: u64,

    /// Ujrah accrued as of now
    pub accrued: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_codec_roundtrip() {
        let record = LeaseRecord {
            principal: 1_000_000,
            lease_start: 1_700_000_000,
            last_accrual_time: 1_700_100_000,
        };

        let decoded = LeaseRecord::decode(&record.encode()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_record_layout_is_big_endian() {
        let record = LeaseRecord {
            principal: 1,
            lease_start: 2,
            last_accrual_time: 3,
        };

        let bytes = record.encode();
        assert_eq!(&bytes[0..8], &[0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(&bytes[8..16], &[0, 0, 0, 0, 0, 0, 0, 2]);
        assert_eq!(&bytes[16..24], &[0, 0, 0, 0, 0, 0, 0, 3]);
    }

    #[test]
    fn test_record_decode_rejects_wrong_length() {
        let result = LeaseRecord::decode(&[0u8; 23]);
        assert!(matches!(result, Err(Error::CorruptRecord(_))));
    }

    #[test]
    fn test_receipt_confirmations() {
        let deposit = DepositReceipt {
            new_principal: 5_000_000,
            settled_ujrah: 0,
        };
        assert_eq!(deposit.to_string(), "Lease started! Amount: 5000000");

        let claim = ClaimReceipt { amount: 30_000 };
        assert_eq!(claim.to_string(), "Ujrah claimed: 30000");

        let withdraw = WithdrawReceipt { total: 1_030_000 };
        assert_eq!(withdraw.to_string(), "Withdrawn 1030000");
    }
}

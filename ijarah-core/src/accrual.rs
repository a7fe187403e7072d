//! Time-proportional ujrah computation
//!
//! `accrued = principal * elapsed * rate_bp / (seconds_per_year * 10_000)`
//!
//! Computed entirely in unsigned integer arithmetic: intermediates are
//! widened to `u128` and multiplied with overflow checks, and the floor
//! division happens exactly once at the end. Pre-dividing any intermediate
//! product would accumulate rounding error.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default annual ujrah rate, basis points (3%)
pub const DEFAULT_RATE_BP: u64 = 300;

/// Default seconds per year (365.25 days, average Gregorian year)
pub const DEFAULT_SECONDS_PER_YEAR: u64 = 31_557_600;

/// Basis-point scale: 10_000 bp == 100%
const BASIS_POINT_SCALE: u128 = 10_000;

/// Fixed accrual parameters, set once at initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualParams {
    /// Annual rate in basis points
    pub rate_bp: u64,

    /// Length of one year in seconds
    pub seconds_per_year: u64,
}

impl Default for AccrualParams {
    fn default() -> Self {
        Self {
            rate_bp: DEFAULT_RATE_BP,
            seconds_per_year: DEFAULT_SECONDS_PER_YEAR,
        }
    }
}

impl AccrualParams {
    /// Ujrah accrued on `principal` between `last_accrual_time` and `now`.
    ///
    /// `principal == 0` short-circuits to 0 without evaluating the formula,
    /// so absent records never observe a spurious `now - 0` interval.
    /// A clock reading earlier than `last_accrual_time` clamps elapsed to 0.
    pub fn accrued(&self, principal: u64, last_accrual_time: u64, now: u64) -> Result<u64> {
        if principal == 0 {
            return Ok(0);
        }

        let elapsed = now.saturating_sub(last_accrual_time);
        if elapsed == 0 {
            return Ok(0);
        }

        let numerator = (principal as u128)
            .checked_mul(elapsed as u128)
            .and_then(|v| v.checked_mul(self.rate_bp as u128))
            .ok_or(Error::Overflow)?;
        let denominator = (self.seconds_per_year as u128) * BASIS_POINT_SCALE;

        // Single floor division.
        let accrued = numerator / denominator;

        u64::try_from(accrued).map_err(|_| Error::Overflow)
    }
}

//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `ijarah_deposits_total` - Deposits applied
//! - `ijarah_claims_total` - Ujrah claims paid
//! - `ijarah_withdrawals_total` - Withdrawals paid
//! - `ijarah_payout_units_total` - Units paid out across all operations
//! - `ijarah_operation_duration_seconds` - Operation latency histogram

use prometheus::{Histogram, HistogramOpts, IntCounter, Opts, Registry};
use std::fmt;
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Deposits applied
    pub deposits_total: IntCounter,

    /// Ujrah claims paid
    pub claims_total: IntCounter,

    /// Withdrawals paid
    pub withdrawals_total: IntCounter,

    /// Units paid out across all operations
    pub payout_units_total: IntCounter,

    /// Operation latency histogram
    pub operation_duration: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let deposits_total = IntCounter::with_opts(Opts::new(
            "ijarah_deposits_total",
            "Deposits applied",
        ))?;
        registry.register(Box::new(deposits_total.clone()))?;

        let claims_total = IntCounter::with_opts(Opts::new(
            "ijarah_claims_total",
            "Ujrah claims paid",
        ))?;
        registry.register(Box::new(claims_total.clone()))?;

        let withdrawals_total = IntCounter::with_opts(Opts::new(
            "ijarah_withdrawals_total",
            "Withdrawals paid",
        ))?;
        registry.register(Box::new(withdrawals_total.clone()))?;

        let payout_units_total = IntCounter::with_opts(Opts::new(
            "ijarah_payout_units_total",
            "Units paid out across all operations",
        ))?;
        registry.register(Box::new(payout_units_total.clone()))?;

        let operation_duration = Histogram::with_opts(
            HistogramOpts::new(
                "ijarah_operation_duration_seconds",
                "Operation latency histogram",
            )
            .buckets(vec![0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0]),
        )?;
        registry.register(Box::new(operation_duration.clone()))?;

        Ok(Self {
            deposits_total,
            claims_total,
            withdrawals_total,
            payout_units_total,
            operation_duration,
            registry,
        })
    }

    /// Record an applied deposit and any settled ujrah
    pub fn record_deposit(&self, settled_ujrah: u64) {
        self.deposits_total.inc();
        self.payout_units_total.inc_by(settled_ujrah);
    }

    /// Record a paid claim
    pub fn record_claim(&self, amount: u64) {
        self.claims_total.inc();
        self.payout_units_total.inc_by(amount);
    }

    /// Record a paid withdrawal
    pub fn record_withdrawal(&self, total: u64) {
        self.withdrawals_total.inc();
        self.payout_units_total.inc_by(total);
    }

    /// Record operation latency
    pub fn record_operation_duration(&self, duration_seconds: f64) {
        self.operation_duration.observe(duration_seconds);
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

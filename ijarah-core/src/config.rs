//! Configuration for the accrual ledger

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::accrual::{AccrualParams, DEFAULT_RATE_BP, DEFAULT_SECONDS_PER_YEAR};

/// Ledger service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for RocksDB
    pub data_dir: PathBuf,

    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Metrics listen address
    pub metrics_listen_addr: String,

    /// Ledger parameters
    pub ledger: LedgerConfig,

    /// RocksDB configuration
    pub rocksdb: RocksDbConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/ijarah"),
            service_name: "ijarah-core".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            metrics_listen_addr: "0.0.0.0:9090".to_string(),
            ledger: LedgerConfig::default(),
            rocksdb: RocksDbConfig::default(),
        }
    }
}

/// Ledger parameters, fixed at initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Annual ujrah rate in basis points
    pub rate_bp: u64,

    /// Length of one year in seconds
    pub seconds_per_year: u64,

    /// Minimum accepted deposit, smallest currency unit
    pub minimum_deposit: u64,

    /// Address of the holding account that receives deposits
    pub holding_account: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rate_bp: DEFAULT_RATE_BP,
            seconds_per_year: DEFAULT_SECONDS_PER_YEAR,
            minimum_deposit: 1_000_000,
            holding_account: "ijarah-holding".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Accrual parameters derived from this configuration
    pub fn accrual_params(&self) -> AccrualParams {
        AccrualParams {
            rate_bp: self.rate_bp,
            seconds_per_year: self.seconds_per_year,
        }
    }

    /// Reject parameter combinations the engine cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.seconds_per_year == 0 {
            return Err(crate::Error::Config(
                "seconds_per_year must be greater than zero".to_string(),
            ));
        }
        if self.minimum_deposit == 0 {
            return Err(crate::Error::Config(
                "minimum_deposit must be at least one unit".to_string(),
            ));
        }
        if self.holding_account.is_empty() {
            return Err(crate::Error::Config(
                "holding_account must be set".to_string(),
            ));
        }
        Ok(())
    }
}

/// RocksDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocksDbConfig {
    /// Write buffer size (MB)
    pub write_buffer_size_mb: usize,

    /// Max write buffers
    pub max_write_buffer_number: i32,

    /// Target file size (MB)
    pub target_file_size_mb: u64,

    /// Max background jobs (compaction + flush)
    pub max_background_jobs: i32,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            write_buffer_size_mb: 64,
            max_write_buffer_number: 4,
            target_file_size_mb: 64,
            max_background_jobs: 2,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.ledger.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(data_dir) = std::env::var("IJARAH_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(addr) = std::env::var("IJARAH_METRICS_ADDR") {
            config.metrics_listen_addr = addr;
        }

        if let Ok(holding) = std::env::var("IJARAH_HOLDING_ACCOUNT") {
            config.ledger.holding_account = holding;
        }

        config.ledger.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "ijarah-core");
        assert_eq!(config.ledger.rate_bp, 300);
        assert_eq!(config.ledger.seconds_per_year, 31_557_600);
        assert_eq!(config.ledger.minimum_deposit, 1_000_000);
        assert!(config.ledger.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let mut ledger = LedgerConfig::default();
        ledger.seconds_per_year = 0;
        assert!(ledger.validate().is_err());

        let mut ledger = LedgerConfig::default();
        ledger.minimum_deposit = 0;
        assert!(ledger.validate().is_err());

        let mut ledger = LedgerConfig::default();
        ledger.holding_account = String::new();
        assert!(ledger.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ijarah.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/var/lib/ijarah"
service_name = "ijarah-core"
service_version = "0.1.0"
metrics_listen_addr = "0.0.0.0:9100"

[ledger]
rate_bp = 250
seconds_per_year = 31557600
minimum_deposit = 500000
holding_account = "pool"

[rocksdb]
write_buffer_size_mb = 32
max_write_buffer_number = 2
target_file_size_mb = 32
max_background_jobs = 1
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.ledger.rate_bp, 250);
        assert_eq!(config.ledger.minimum_deposit, 500_000);
        assert_eq!(config.ledger.holding_account, "pool");
        assert_eq!(config.rocksdb.write_buffer_size_mb, 32);
    }
}

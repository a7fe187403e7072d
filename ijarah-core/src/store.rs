//! Record store implementations
//!
//! Durable mapping from depositor identity to a fixed-layout lease record.
//! The engine only depends on the [`RecordStore`] trait; production uses
//! RocksDB, tests and the demo server use the in-memory store.
//!
//! # Key layout
//!
//! `ijarah_` prefix concatenated with the depositor's identity bytes, in
//! the `records` column family. Values are the 24-byte record encoding.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rocksdb::{BoundColumnFamily, ColumnFamilyDescriptor, Options, DB};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{DepositorId, LeaseRecord};

/// Fixed prefix for record keys
pub const RECORD_KEY_PREFIX: &[u8] = b"ijarah_";

/// Column family holding lease records
const CF_RECORDS: &str = "records";

/// Storage key for a depositor's record
pub fn record_key(id: &DepositorId) -> Vec<u8> {
    let mut key = Vec::with_capacity(RECORD_KEY_PREFIX.len() + id.as_bytes().len());
    key.extend_from_slice(RECORD_KEY_PREFIX);
    key.extend_from_slice(id.as_bytes());
    key
}

/// Durable keyed record storage
///
/// Single-operation atomicity only; read-modify-write correctness within
/// one ledger invocation is the engine's responsibility.
pub trait RecordStore: Send + Sync {
    /// Load a depositor's record, `None` if absent
    fn get(&self, id: &DepositorId) -> Result<Option<LeaseRecord>>;

    /// Persist a depositor's record
    fn put(&self, id: &DepositorId, record: &LeaseRecord) -> Result<()>;

    /// Remove a depositor's record; absent keys are not an error
    fn delete(&self, id: &DepositorId) -> Result<()>;
}

/// RocksDB-backed record store
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Open or create the database under the configured data directory
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        // Tuning from config
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_target_file_size_base(config.rocksdb.target_file_size_mb * 1024 * 1024);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        let cf_descriptors = vec![ColumnFamilyDescriptor::new(
            CF_RECORDS,
            Self::cf_options_records(),
        )];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!("Opened RocksDB record store at {:?}", path);

        Ok(Self { db })
    }

    fn cf_options_records() -> Options {
        let mut opts = Options::default();
        // Records are small and read often, use LZ4 for speed
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf_handle(&self) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(CF_RECORDS)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", CF_RECORDS)))
    }

    /// Close database (graceful shutdown)
    pub fn close(self) -> Result<()> {
        drop(self.db);
        tracing::info!("RocksDB record store closed");
        Ok(())
    }
}

impl fmt::Debug for RocksStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RocksStore").finish_non_exhaustive()
    }
}

impl RecordStore for RocksStore {
    fn get(&self, id: &DepositorId) -> Result<Option<LeaseRecord>> {
        let cf = self.cf_handle()?;

        match self.db.get_cf(&cf, record_key(id))? {
            Some(bytes) => Ok(Some(LeaseRecord::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&self, id: &DepositorId, record: &LeaseRecord) -> Result<()> {
        let cf = self.cf_handle()?;
        self.db.put_cf(&cf, record_key(id), record.encode())?;

        tracing::debug!(
            depositor = %id,
            principal = record.principal,
            "Record persisted"
        );

        Ok(())
    }

    fn delete(&self, id: &DepositorId) -> Result<()> {
        let cf = self.cf_handle()?;
        self.db.delete_cf(&cf, record_key(id))?;

        tracing::debug!(depositor = %id, "Record deleted");

        Ok(())
    }
}

/// In-memory record store for deterministic tests and the demo server
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Vec<u8>, LeaseRecord>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, id: &DepositorId) -> Result<Option<LeaseRecord>> {
        Ok(self.records.read().get(&record_key(id)).copied())
    }

    fn put(&self, id: &DepositorId, record: &LeaseRecord) -> Result<()> {
        self.records.write().insert(record_key(id), *record);
        Ok(())
    }

    fn delete(&self, id: &DepositorId) -> Result<()> {
        self.records.write().remove(&record_key(id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config() -> (Config, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();
        (config, temp_dir)
    }

    fn sample_record() -> LeaseRecord {
        LeaseRecord {
            principal: 1_000_000,
            lease_start: 1_000,
            last_accrual_time: 2_000,
        }
    }

    #[test]
    fn test_record_key_prefix() {
        let key = record_key(&DepositorId::new("alice"));
        assert_eq!(key, b"ijarah_alice");
    }

    #[test]
    fn test_rocks_store_roundtrip() {
        let (config, _temp) = test_config();
        let store = RocksStore::open(&config).unwrap();
        let alice = DepositorId::new("alice");

        assert_eq!(store.get(&alice).unwrap(), None);

        let record = sample_record();
        store.put(&alice, &record).unwrap();
        assert_eq!(store.get(&alice).unwrap(), Some(record));

        store.delete(&alice).unwrap();
        assert_eq!(store.get(&alice).unwrap(), None);
    }

    #[test]
    fn test_rocks_store_survives_reopen() {
        let (config, _temp) = test_config();
        let alice = DepositorId::new("alice");
        let record = sample_record();

        {
            let store = RocksStore::open(&config).unwrap();
            store.put(&alice, &record).unwrap();
            store.close().unwrap();
        }

        let store = RocksStore::open(&config).unwrap();
        assert_eq!(store.get(&alice).unwrap(), Some(record));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        let alice = DepositorId::new("alice");

        assert_eq!(store.get(&alice).unwrap(), None);
        assert!(store.is_empty());

        let record = sample_record();
        store.put(&alice, &record).unwrap();
        assert_eq!(store.get(&alice).unwrap(), Some(record));
        assert_eq!(store.len(), 1);

        store.delete(&alice).unwrap();
        assert_eq!(store.get(&alice).unwrap(), None);
    }

    #[test]
    fn test_delete_absent_is_ok() {
        let store = MemoryStore::new();
        store.delete(&DepositorId::new("ghost")).unwrap();

        let (config, _temp) = test_config();
        let rocks = RocksStore::open(&config).unwrap();
        rocks.delete(&DepositorId::new("ghost")).unwrap();
    }
}

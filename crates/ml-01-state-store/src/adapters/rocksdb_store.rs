//! # RocksDB World State
//!
//! Persistent `KeyValueStore` backed by RocksDB.
//!
//! ## Layout
//!
//! All ledger entries live in the `world_state` column family. Keys are the
//! UTF-8 bytes of the ledger key.
//!
//! ## Conditional Writes
//!
//! RocksDB has no native compare-and-swap. Writes issued through one
//! `RocksDbStore` are serialized by `write_lock`, which makes
//! `compare_and_put` and the guard check of `atomic_batch_write` atomic
//! against every other write on the same handle. Batch puts go through a
//! native RocksDB write batch.
//! Two processes opening the same directory is not supported (RocksDB takes a
//! file lock and the second `open` fails).

use crate::errors::StoreError;
use crate::ports::{KeyValueStore, WriteBatch};
use parking_lot::Mutex;
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, Options, WriteBatch as RocksWriteBatch, WriteOptions, DB,
};
use std::path::Path;
use tracing::info;

/// Column family holding all ledger entries.
pub const CF_WORLD_STATE: &str = "world_state";

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/ledger".to_string(),
            block_cache_size: 64 * 1024 * 1024,  // 64MB
            write_buffer_size: 16 * 1024 * 1024, // 16MB
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,  // 8MB
            write_buffer_size: 4 * 1024 * 1024, // 4MB
            sync_writes: false,
        }
    }
}

/// RocksDB-backed world state.
pub struct RocksDbStore {
    db: DB,
    config: RocksDbConfig,
    write_lock: Mutex<()>,
}

impl RocksDbStore {
    /// Open or create a RocksDB database
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let mut cf_opts = Options::default();
        cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
        let descriptors = vec![ColumnFamilyDescriptor::new(CF_WORLD_STATE, cf_opts)];

        let db = DB::open_cf_descriptors(&opts, &config.path, descriptors).map_err(|e| {
            StoreError::Unavailable(format!("Failed to open RocksDB at {}: {}", config.path, e))
        })?;

        info!(path = %config.path, sync_writes = config.sync_writes, "Opened RocksDB world state");

        Ok(Self {
            db,
            config,
            write_lock: Mutex::new(()),
        })
    }

    /// Open with default tuning at `path`.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let config = RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        };
        Self::open(config)
    }

    fn cf(&self) -> Result<&ColumnFamily, StoreError> {
        self.db.cf_handle(CF_WORLD_STATE).ok_or_else(|| {
            StoreError::Unavailable(format!("missing column family {}", CF_WORLD_STATE))
        })
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }

    fn read_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.db
            .get_cf(self.cf()?, key.as_bytes())
            .map_err(|e| StoreError::read(key, format!("RocksDB get failed: {}", e)))
    }

    fn write_raw(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.db
            .put_cf_opt(self.cf()?, key.as_bytes(), value, &self.write_options())
            .map_err(|e| StoreError::write(key, format!("RocksDB put failed: {}", e)))
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.read_raw(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        self.write_raw(key, value)
    }

    fn compare_and_put(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let current = self.read_raw(key)?;
        if current.as_deref() != expected {
            return Ok(false);
        }
        self.write_raw(key, value)?;
        Ok(true)
    }

    fn atomic_batch_write(&self, batch: &WriteBatch) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        for (key, expected) in batch.guards() {
            if self.read_raw(key)? != *expected {
                return Ok(false);
            }
        }

        let cf = self.cf()?;
        let mut rocks_batch = RocksWriteBatch::default();
        for (key, value) in batch.puts() {
            rocks_batch.put_cf(cf, key.as_bytes(), value);
        }
        self.db
            .write_opt(rocks_batch, &self.write_options())
            .map_err(|e| {
                let keys = batch.keys().collect::<Vec<_>>().join(",");
                StoreError::write(&keys, format!("RocksDB batch write failed: {}", e))
            })?;
        Ok(true)
    }
}

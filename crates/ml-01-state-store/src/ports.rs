//! # Driven Port (SPI)
//!
//! The world-state interface every ledger subsystem depends on.
//!
//! Production: `RocksDbStore` (feature `rocksdb`)
//! Testing: `InMemoryKVStore`

use crate::errors::StoreError;
use std::sync::Arc;

/// Abstract key-value world state.
///
/// Implementations use interior mutability so a single handle can be shared
/// (`Arc<dyn KeyValueStore>`) between the repository, the index service and
/// the certificate registry.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    ///
    /// # Returns
    ///
    /// * `Some(bytes)` - If the key holds a value
    /// * `None` - If the key was never written
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the value at `key`.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Replace the value at `key` only if it currently equals `expected`.
    ///
    /// `expected == None` means "only if the key is absent".
    ///
    /// # Returns
    ///
    /// * `true` - The write was applied
    /// * `false` - The current value differed; nothing was written
    fn compare_and_put(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, StoreError>;

    /// Apply every put in `batch` together, or none of them.
    ///
    /// The guards are checked and the puts applied without any other write
    /// on the same handle in between.
    ///
    /// # Returns
    ///
    /// * `true` - All guards held and every put was applied
    /// * `false` - A guard did not hold; nothing was written
    fn atomic_batch_write(&self, batch: &WriteBatch) -> Result<bool, StoreError>;

    /// Check if a key holds a value.
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Puts committed together, optionally guarded by expected current values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    guards: Vec<(String, Option<Vec<u8>>)>,
    puts: Vec<(String, Vec<u8>)>,
}

impl WriteBatch {
    /// Empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a whole-value replace of `key`.
    #[must_use]
    pub fn put(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.puts.push((key.into(), value.into()));
        self
    }

    /// Only commit if `key` currently holds `expected` (`None` = absent).
    #[must_use]
    pub fn expect(mut self, key: impl Into<String>, expected: Option<Vec<u8>>) -> Self {
        self.guards.push((key.into(), expected));
        self
    }

    /// Guards in insertion order.
    pub fn guards(&self) -> &[(String, Option<Vec<u8>>)] {
        &self.guards
    }

    /// Puts in insertion order.
    pub fn puts(&self) -> &[(String, Vec<u8>)] {
        &self.puts
    }

    /// Keys written by this batch.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.puts.iter().map(|(key, _)| key.as_str())
    }

    /// True if the batch writes nothing.
    pub fn is_empty(&self) -> bool {
        self.puts.is_empty()
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn compare_and_put(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, StoreError> {
        (**self).compare_and_put(key, expected, value)
    }

    fn atomic_batch_write(&self, batch: &WriteBatch) -> Result<bool, StoreError> {
        (**self).atomic_batch_write(batch)
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        (**self).exists(key)
    }
}

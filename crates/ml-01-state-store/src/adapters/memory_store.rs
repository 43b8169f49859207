//! In-memory `KeyValueStore`.

use crate::errors::StoreError;
use crate::ports::{KeyValueStore, WriteBatch};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory world state for testing and single-process runs.
#[derive(Debug, Default)]
pub struct InMemoryKVStore {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryKVStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let data = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            data: RwLock::new(data),
        }
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if no keys are held.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Sorted list of keys currently held.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.data.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn compare_and_put(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, StoreError> {
        let mut data = self.data.write();
        if data.get(key).map(Vec::as_slice) != expected {
            return Ok(false);
        }
        data.insert(key.to_string(), value.to_vec());
        Ok(true)
    }

    fn atomic_batch_write(&self, batch: &WriteBatch) -> Result<bool, StoreError> {
        let mut data = self.data.write();
        let guards_hold = batch
            .guards()
            .iter()
            .all(|(key, expected)| data.get(key) == expected.as_ref());
        if !guards_hold {
            return Ok(false);
        }
        for (key, value) in batch.puts() {
            data.insert(key.clone(), value.clone());
        }
        Ok(true)
    }
}

//! # Mortgage Index Adapters
//!
//! Both variants store the whole id list as one JSON aggregate under a
//! single key and replace it whole on every append. The new aggregate is
//! committed in the same `atomic_batch_write` as the caller's puts.
//!
//! | Variant | Guard on the index | Concurrent appends |
//! |---------|--------------------|--------------------|
//! | `ReadModifyWriteIndex` | none | last writer wins, an id can be lost |
//! | `ConditionalIndex` | value as read | loser fails with `IndexConflict` |

use crate::domain::entities::MortgageIdList;
use crate::domain::errors::RegistryError;
use crate::ports::outbound::MortgageIndex;
use ml_01_state_store::{KeyValueStore, WriteBatch};
use std::sync::Arc;
use tracing::{debug, warn};

/// Read and decode the index, returning the raw bytes alongside.
fn load<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<(Vec<u8>, MortgageIdList), RegistryError> {
    let raw = store
        .get(key)?
        .ok_or_else(|| RegistryError::IndexNotFound {
            key: key.to_string(),
        })?;
    let list = MortgageIdList::from_bytes(&raw).map_err(|e| RegistryError::CorruptIndex {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    Ok((raw, list))
}

fn encode(key: &str, list: &MortgageIdList) -> Result<Vec<u8>, RegistryError> {
    list.to_bytes().map_err(|e| RegistryError::CorruptIndex {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn commit<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    id: &str,
    batch: &WriteBatch,
) -> Result<(), RegistryError> {
    if !store.atomic_batch_write(batch)? {
        warn!(mortgage_id = %id, key = %key, "Mortgage index changed concurrently");
        return Err(RegistryError::IndexConflict {
            mortgage_id: id.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// READ-MODIFY-WRITE
// =============================================================================

/// Unconditional read-append-put.
///
/// Not atomic across appends: two appends that both read before either
/// writes leave only the later writer's id in the index. The earlier
/// mortgage record stays in the store but is never listed.
pub struct ReadModifyWriteIndex<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    key: String,
}

impl<S: KeyValueStore + ?Sized> ReadModifyWriteIndex<S> {
    /// Index stored at `key`.
    pub fn new(store: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

impl<S: KeyValueStore + ?Sized> MortgageIndex for ReadModifyWriteIndex<S> {
    fn list_ids(&self) -> Result<Vec<String>, RegistryError> {
        let (_, list) = load(self.store.as_ref(), &self.key)?;
        Ok(list.ids)
    }

    fn append_id(&self, id: &str, batch: WriteBatch) -> Result<(), RegistryError> {
        let (_, mut list) = load(self.store.as_ref(), &self.key)?;
        list.push(id);
        let batch = batch.put(self.key.clone(), encode(&self.key, &list)?);
        commit(self.store.as_ref(), &self.key, id, &batch)?;
        debug!(mortgage_id = %id, len = list.len(), "Appended to mortgage index");
        Ok(())
    }

    fn key(&self) -> &str {
        &self.key
    }
}

// =============================================================================
// CONDITIONAL
// =============================================================================

/// Append that only lands if the index is unchanged since it was read.
///
/// There is no retry. A lost race surfaces as `IndexConflict`, nothing
/// from the batch is written, and the client resubmits.
pub struct ConditionalIndex<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    key: String,
}

impl<S: KeyValueStore + ?Sized> ConditionalIndex<S> {
    /// Index stored at `key`.
    pub fn new(store: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

impl<S: KeyValueStore + ?Sized> MortgageIndex for ConditionalIndex<S> {
    fn list_ids(&self) -> Result<Vec<String>, RegistryError> {
        let (_, list) = load(self.store.as_ref(), &self.key)?;
        Ok(list.ids)
    }

    fn append_id(&self, id: &str, batch: WriteBatch) -> Result<(), RegistryError> {
        let (raw, mut list) = load(self.store.as_ref(), &self.key)?;
        list.push(id);
        let batch = batch
            .expect(self.key.clone(), Some(raw))
            .put(self.key.clone(), encode(&self.key, &list)?);
        commit(self.store.as_ref(), &self.key, id, &batch)?;
        debug!(mortgage_id = %id, len = list.len(), "Appended to mortgage index");
        Ok(())
    }

    fn key(&self) -> &str {
        &self.key
    }
}

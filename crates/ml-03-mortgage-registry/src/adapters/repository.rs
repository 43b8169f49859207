//! # Mortgage Repository
//!
//! Mortgage records keyed by id, plus the index service. Every write is a
//! whole-record replace. A new record and its index entry land in one
//! atomic write.

use crate::domain::entities::Mortgage;
use crate::domain::errors::RegistryError;
use crate::ports::outbound::MortgageIndex;
use ml_01_state_store::{KeyValueStore, WriteBatch};
use std::sync::Arc;

/// Record storage over the world state.
pub struct MortgageRepository<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    index: Arc<dyn MortgageIndex>,
}

impl<S: KeyValueStore + ?Sized> MortgageRepository<S> {
    /// Repository over `store`, maintaining `index`.
    pub fn new(store: Arc<S>, index: Arc<dyn MortgageIndex>) -> Self {
        Self { store, index }
    }

    /// Load mortgage `id`.
    ///
    /// # Errors
    /// * `MortgageNotFound` - nothing stored under `id`
    /// * `CorruptRecord` - stored bytes do not parse
    /// * `StoreRead` - the read failed
    pub fn get(&self, id: &str) -> Result<Mortgage, RegistryError> {
        let bytes = self
            .store
            .get(id)?
            .ok_or_else(|| RegistryError::MortgageNotFound {
                mortgage_id: id.to_string(),
            })?;
        Mortgage::from_bytes(&bytes).map_err(|e| RegistryError::CorruptRecord {
            key: id.to_string(),
            message: e.to_string(),
        })
    }

    /// True if anything is stored under `id`, well-formed or not.
    pub fn contains(&self, id: &str) -> Result<bool, RegistryError> {
        Ok(self.store.exists(id)?)
    }

    /// Overwrite the existing record of `mortgage`.
    pub fn put(&self, mortgage: &Mortgage) -> Result<(), RegistryError> {
        self.store.put(&mortgage.id, &Self::encode(mortgage)?)?;
        Ok(())
    }

    /// Write a new `mortgage` and append its id to the index.
    ///
    /// Both land or neither does. A missing or corrupt index fails before
    /// anything is written.
    pub fn insert(&self, mortgage: &Mortgage) -> Result<(), RegistryError> {
        let batch = WriteBatch::new().put(mortgage.id.clone(), Self::encode(mortgage)?);
        self.index.append_id(&mortgage.id, batch)
    }

    fn encode(mortgage: &Mortgage) -> Result<Vec<u8>, RegistryError> {
        mortgage.to_bytes().map_err(|e| RegistryError::CorruptRecord {
            key: mortgage.id.clone(),
            message: e.to_string(),
        })
    }

    /// All indexed ids in creation order.
    pub fn list_ids(&self) -> Result<Vec<String>, RegistryError> {
        self.index.list_ids()
    }

    /// The index service in use.
    pub fn index(&self) -> &Arc<dyn MortgageIndex> {
        &self.index
    }
}

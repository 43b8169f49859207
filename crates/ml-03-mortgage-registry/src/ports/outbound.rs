//! # Outbound Ports (Driven Ports / SPI)
//!
//! The mortgage index service.

use crate::domain::errors::RegistryError;
use ml_01_state_store::WriteBatch;

/// Ordered list of every mortgage id ever created.
///
/// Implementations decide how `append_id` behaves under concurrent
/// appends. See `ReadModifyWriteIndex` and `ConditionalIndex`.
pub trait MortgageIndex: Send + Sync {
    /// All ids in insertion order.
    ///
    /// # Errors
    /// * `RegistryError::IndexNotFound` - index never initialized
    /// * `RegistryError::CorruptIndex` - stored bytes do not parse
    /// * `RegistryError::StoreRead` - the read failed
    fn list_ids(&self) -> Result<Vec<String>, RegistryError>;

    /// Append `id` at the end of the index, committing the index update and
    /// every put in `batch` as one atomic write.
    ///
    /// The index is read and decoded before anything is written, so a
    /// missing or corrupt index leaves the store untouched.
    ///
    /// # Errors
    /// Everything `list_ids` returns, plus:
    /// * `RegistryError::StoreWrite` - the write failed, nothing applied
    /// * `RegistryError::IndexConflict` - a guard did not hold, nothing applied
    fn append_id(&self, id: &str, batch: WriteBatch) -> Result<(), RegistryError>;

    /// Ledger key holding the index aggregate.
    fn key(&self) -> &str;
}

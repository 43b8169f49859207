//! # Enrollment Credential Registry
//!
//! One opaque credential per participant, stored under the participant's
//! name. Seeded at bootstrap, read back with `get_ecert`.

use crate::errors::IdentityError;
use ml_01_state_store::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Credential store over the world state.
pub struct EcertRegistry<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
}

impl<S: KeyValueStore + ?Sized> Clone for EcertRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + ?Sized> EcertRegistry<S> {
    /// Registry over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Store `credential` for `name`, replacing any previous value.
    pub fn seed(&self, name: &str, credential: &str) -> Result<(), IdentityError> {
        self.store.put(name, credential.as_bytes())?;
        info!(participant = %name, "Seeded enrollment credential");
        Ok(())
    }

    /// Read the credential stored for `name`.
    ///
    /// # Errors
    /// * `IdentityError::CredentialNotFound` - nothing stored under `name`
    /// * `IdentityError::CorruptCredential` - stored bytes are not UTF-8
    /// * `IdentityError::Store` - the read failed
    pub fn get_ecert(&self, name: &str) -> Result<String, IdentityError> {
        let bytes = self
            .store
            .get(name)?
            .ok_or_else(|| IdentityError::CredentialNotFound {
                name: name.to_string(),
            })?;
        debug!(participant = %name, len = bytes.len(), "Read enrollment credential");
        String::from_utf8(bytes).map_err(|_| IdentityError::CorruptCredential {
            name: name.to_string(),
        })
    }
}

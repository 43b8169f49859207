//! # Registry Bootstrap
//!
//! Prepares an empty ledger: creates the index aggregate and seeds one
//! enrollment credential per participant from a flat
//! `name credential name credential ...` list.
//!
//! The whole list is validated before anything is written. An index that
//! already holds a well-formed aggregate is kept, so restarting against a
//! persistent store does not forget existing mortgages.

use crate::domain::entities::MortgageIdList;
use crate::service::RegistryConfig;
use ml_01_state_store::{KeyValueStore, StoreError};
use ml_02_identity::{EcertRegistry, IdentityError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Fatal bootstrap failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BootstrapError {
    /// Credential list does not split into pairs.
    #[error("Credential list must hold name/credential pairs, got {count} value(s)")]
    OddCredentialList {
        /// Number of values supplied.
        count: usize,
    },

    /// A participant name is empty.
    #[error("Empty participant name in credential pair {pair}")]
    EmptyName {
        /// Zero-based pair position.
        pair: usize,
    },

    /// A participant name collides with the index key.
    #[error("Participant name '{name}' in credential pair {pair} is reserved for the mortgage index")]
    ReservedName {
        /// The rejected name.
        name: String,
        /// Zero-based pair position.
        pair: usize,
    },

    /// The index aggregate could not be created.
    #[error("Error creating mortgage index at '{key}': {source}")]
    IndexInit {
        /// Index ledger key.
        key: String,
        /// Underlying failure.
        #[source]
        source: StoreError,
    },

    /// The index key holds bytes that are not an id list.
    #[error("Existing value at index key '{key}' is not a mortgage index")]
    CorruptIndex {
        /// Index ledger key.
        key: String,
    },

    /// A credential could not be stored.
    #[error("Error storing credential for '{name}': {source}")]
    CredentialSeed {
        /// Participant name.
        name: String,
        /// Underlying failure.
        #[source]
        source: IdentityError,
    },
}

/// What bootstrap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    /// True if a fresh empty index was written.
    pub index_created: bool,
    /// Existing index length when it was kept, zero otherwise.
    pub existing_mortgages: usize,
    /// Credentials written.
    pub identities_seeded: usize,
}

/// One-shot ledger initialization.
pub struct Bootstrap<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    index_key: String,
}

impl<S: KeyValueStore + ?Sized> Bootstrap<S> {
    /// Bootstrap `store` for a registry configured with `config`.
    pub fn new(store: Arc<S>, config: &RegistryConfig) -> Self {
        Self {
            store,
            index_key: config.index_key.clone(),
        }
    }

    /// Validate `args`, then initialize the index and seed credentials.
    pub fn run(&self, args: &[String]) -> Result<BootstrapReport, BootstrapError> {
        let pairs = self.credential_pairs(args)?;

        let (index_created, existing_mortgages) = self.init_index()?;

        let ecerts = EcertRegistry::new(Arc::clone(&self.store));
        for (name, credential) in &pairs {
            ecerts
                .seed(name, credential)
                .map_err(|source| BootstrapError::CredentialSeed {
                    name: name.to_string(),
                    source,
                })?;
        }

        let report = BootstrapReport {
            index_created,
            existing_mortgages,
            identities_seeded: pairs.len(),
        };
        info!(
            index_key = %self.index_key,
            index_created,
            existing_mortgages,
            identities_seeded = report.identities_seeded,
            "Registry bootstrapped"
        );
        Ok(report)
    }

    fn credential_pairs<'a>(
        &self,
        args: &'a [String],
    ) -> Result<Vec<(&'a str, &'a str)>, BootstrapError> {
        if args.len() % 2 != 0 {
            return Err(BootstrapError::OddCredentialList { count: args.len() });
        }
        args.chunks(2)
            .enumerate()
            .map(|(pair, chunk)| {
                let name = chunk[0].trim();
                if name.is_empty() {
                    Err(BootstrapError::EmptyName { pair })
                } else if name == self.index_key {
                    Err(BootstrapError::ReservedName {
                        name: name.to_string(),
                        pair,
                    })
                } else {
                    Ok((name, chunk[1].as_str()))
                }
            })
            .collect()
    }

    fn init_index(&self) -> Result<(bool, usize), BootstrapError> {
        let index_err = |source: StoreError| BootstrapError::IndexInit {
            key: self.index_key.clone(),
            source,
        };

        if let Some(existing) = self.store.get(&self.index_key).map_err(index_err)? {
            return match MortgageIdList::from_bytes(&existing) {
                Ok(list) => {
                    info!(key = %self.index_key, len = list.len(), "Keeping existing mortgage index");
                    Ok((false, list.len()))
                }
                Err(_) => Err(BootstrapError::CorruptIndex {
                    key: self.index_key.clone(),
                }),
            };
        }

        let empty = MortgageIdList::new().to_bytes().map_err(|e| {
            index_err(StoreError::write(&self.index_key, e.to_string()))
        })?;
        self.store.put(&self.index_key, &empty).map_err(index_err)?;
        Ok((true, 0))
    }
}

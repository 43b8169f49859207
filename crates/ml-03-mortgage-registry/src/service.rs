//! # Mortgage Registry Service
//!
//! Wires the permission policy to the repository and the credential
//! registry.
//!
//! ## Create
//!
//! 1. Role check, then uniqueness check. Nothing written on failure.
//! 2. Index read and decoded. A missing or corrupt index fails here.
//! 3. Mortgage record and updated index committed in one atomic write.
//!
//! A failed create leaves no record and no index entry behind.

use crate::adapters::{ConditionalIndex, MortgageRepository, ReadModifyWriteIndex};
use crate::domain::entities::{Mortgage, DEFAULT_INDEX_KEY};
use crate::domain::errors::RegistryError;
use crate::domain::policy;
use crate::ports::inbound::MortgageRegistryApi;
use crate::ports::outbound::MortgageIndex;
use ml_01_state_store::KeyValueStore;
use ml_02_identity::EcertRegistry;
use parking_lot::RwLock;
use shared_types::{Affiliation, CallerIdentity};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Literal liveness response.
pub const PING_RESPONSE: &str = "Hello, world!";

/// How the index aggregate is updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexMode {
    /// Unconditional read-append-put. Concurrent creates can lose an id.
    #[default]
    ReadModifyWrite,
    /// `compare_and_put`. Concurrent creates fail with `IndexConflict`.
    Conditional,
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexMode::ReadModifyWrite => f.write_str("read-modify-write"),
            IndexMode::Conditional => f.write_str("conditional"),
        }
    }
}

impl FromStr for IndexMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read-modify-write" | "rmw" => Ok(IndexMode::ReadModifyWrite),
            "conditional" | "cas" => Ok(IndexMode::Conditional),
            other => Err(format!(
                "unknown index mode '{}' (expected read-modify-write or conditional)",
                other
            )),
        }
    }
}

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Index update strategy.
    pub index_mode: IndexMode,
    /// Ledger key of the index aggregate.
    pub index_key: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            index_mode: IndexMode::default(),
            index_key: DEFAULT_INDEX_KEY.to_string(),
        }
    }
}

/// Operation counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    /// Mortgages created.
    pub mortgages_created: u64,
    /// Successful transfers.
    pub transfers_completed: u64,
    /// Operations rejected by the permission policy.
    pub permission_denials: u64,
    /// Read-only operations answered.
    pub queries_served: u64,
}

/// The mortgage registry.
pub struct MortgageRegistry<S: KeyValueStore + ?Sized + 'static> {
    config: RegistryConfig,
    repository: MortgageRepository<S>,
    ecerts: EcertRegistry<S>,
    stats: RwLock<RegistryStats>,
}

impl<S: KeyValueStore + ?Sized + 'static> MortgageRegistry<S> {
    /// Registry over `store`, with the index variant chosen by `config`.
    pub fn new(store: Arc<S>, config: RegistryConfig) -> Self {
        let index: Arc<dyn MortgageIndex> = match config.index_mode {
            IndexMode::ReadModifyWrite => Arc::new(ReadModifyWriteIndex::new(
                Arc::clone(&store),
                config.index_key.clone(),
            )),
            IndexMode::Conditional => Arc::new(ConditionalIndex::new(
                Arc::clone(&store),
                config.index_key.clone(),
            )),
        };
        Self::with_index(store, config, index)
    }

    /// Registry using a caller-supplied index service.
    pub fn with_index(store: Arc<S>, config: RegistryConfig, index: Arc<dyn MortgageIndex>) -> Self {
        Self {
            config,
            repository: MortgageRepository::new(Arc::clone(&store), index),
            ecerts: EcertRegistry::new(store),
            stats: RwLock::new(RegistryStats::default()),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Snapshot of the operation counters.
    pub fn stats(&self) -> RegistryStats {
        self.stats.read().clone()
    }

    fn record_denial(&self, err: &RegistryError) {
        if let RegistryError::PermissionDenied {
            operation, caller, reason, ..
        } = err
        {
            warn!(operation = %operation, caller = %caller, reason = %reason, "Permission denied");
            self.stats.write().permission_denials += 1;
        }
    }

    fn served(&self) {
        self.stats.write().queries_served += 1;
    }
}

impl<S: KeyValueStore + ?Sized + 'static> MortgageRegistryApi for MortgageRegistry<S> {
    #[instrument(skip(self, caller), fields(caller = %caller.id, role = %caller.affiliation))]
    fn create(&self, caller: &CallerIdentity, mortgage_id: &str) -> Result<Mortgage, RegistryError> {
        if mortgage_id.is_empty() {
            return Err(RegistryError::InvalidMortgageId);
        }
        if let Err(err) = policy::authorize_create(caller) {
            self.record_denial(&err);
            return Err(err);
        }
        if self.repository.contains(mortgage_id)? {
            return Err(RegistryError::AlreadyExists {
                mortgage_id: mortgage_id.to_string(),
            });
        }

        let mortgage = Mortgage::originate(mortgage_id, &caller.id);
        self.repository.insert(&mortgage)?;

        self.stats.write().mortgages_created += 1;
        info!(mortgage_id = %mortgage_id, owner = %mortgage.owner, "Mortgage created");
        Ok(mortgage)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id, role = %caller.affiliation))]
    fn transfer(
        &self,
        caller: &CallerIdentity,
        mortgage_id: &str,
        recipient_id: &str,
        recipient_role: Affiliation,
    ) -> Result<Mortgage, RegistryError> {
        let mut mortgage = self.repository.get(mortgage_id)?;
        if let Err(err) = policy::authorize_transfer(&mortgage, caller, recipient_role) {
            self.record_denial(&err);
            return Err(err);
        }

        mortgage.owner = recipient_id.to_string();
        self.repository.put(&mortgage)?;

        self.stats.write().transfers_completed += 1;
        info!(
            mortgage_id = %mortgage_id,
            from = %caller.id,
            to = %recipient_id,
            "Mortgage transferred"
        );
        Ok(mortgage)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    fn get_details(
        &self,
        caller: &CallerIdentity,
        mortgage_id: &str,
    ) -> Result<Mortgage, RegistryError> {
        let mortgage = self.repository.get(mortgage_id)?;
        if let Err(err) = policy::authorize_read(&mortgage, caller) {
            self.record_denial(&err);
            return Err(err);
        }
        self.served();
        debug!(mortgage_id = %mortgage_id, "Mortgage details read");
        Ok(mortgage)
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    fn list_visible(&self, caller: &CallerIdentity) -> Result<Vec<Mortgage>, RegistryError> {
        let ids = self.repository.list_ids()?;
        let mut visible = Vec::new();
        for id in &ids {
            let mortgage =
                self.repository
                    .get(id)
                    .map_err(|source| RegistryError::RetrievalFailure {
                        mortgage_id: id.clone(),
                        source: Box::new(source),
                    })?;
            if policy::can_view(&mortgage, caller) {
                visible.push(mortgage);
            }
        }
        self.served();
        debug!(indexed = ids.len(), visible = visible.len(), "Listed mortgages");
        Ok(visible)
    }

    #[instrument(skip(self))]
    fn check_unique(&self, mortgage_id: &str) -> Result<bool, RegistryError> {
        let unique = !self.repository.contains(mortgage_id)?;
        self.served();
        debug!(mortgage_id = %mortgage_id, unique, "Uniqueness checked");
        Ok(unique)
    }

    #[instrument(skip(self))]
    fn get_ecert(&self, name: &str) -> Result<String, RegistryError> {
        let ecert = self.ecerts.get_ecert(name)?;
        self.served();
        Ok(ecert)
    }

    fn ping(&self) -> &'static str {
        PING_RESPONSE
    }
}

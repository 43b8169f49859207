//! # Node Container
//!
//! Opens the configured world-state backend and wires the registry,
//! identity resolver, and dispatcher on top of it.

pub mod config;

pub use config::{ConfigError, LoggingConfig, NodeConfig, StorageBackend, StorageConfig};

use anyhow::{Context, Result};
use ml_01_state_store::{InMemoryKVStore, KeyValueStore};
use ml_02_identity::CertAttributeResolver;
use ml_03_mortgage_registry::{Dispatcher, MortgageRegistry};
use std::sync::Arc;
use tracing::info;

/// Type-erased world state shared by every component.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Dispatcher as wired by the node.
pub type NodeDispatcher = Dispatcher<MortgageRegistry<dyn KeyValueStore>, CertAttributeResolver>;

/// Open the backend selected by `config`.
pub fn open_store(config: &StorageConfig) -> Result<SharedStore> {
    match config.backend {
        StorageBackend::InMemory => {
            info!("Using in-memory world state");
            Ok(Arc::new(InMemoryKVStore::new()))
        }
        StorageBackend::RocksDb => open_rocksdb(config),
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(config: &StorageConfig) -> Result<SharedStore> {
    use ml_01_state_store::{RocksDbConfig, RocksDbStore};

    let rocks_config = RocksDbConfig {
        path: config.data_dir.to_string_lossy().to_string(),
        sync_writes: config.sync_writes,
        ..Default::default()
    };
    let store = RocksDbStore::open(rocks_config)
        .with_context(|| format!("Failed to open RocksDB at {:?}", config.data_dir))?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(_config: &StorageConfig) -> Result<SharedStore> {
    Err(ConfigError::RocksDbNotCompiled).context("Cannot open storage backend")
}

/// Everything the node serves from.
pub struct NodeContainer {
    /// Validated configuration.
    pub config: NodeConfig,
    /// World state.
    pub store: SharedStore,
    /// Invocation router.
    pub dispatcher: NodeDispatcher,
}

impl NodeContainer {
    /// Validate `config`, open storage, and wire the registry.
    pub fn new(config: NodeConfig) -> Result<Self> {
        config.validate().context("Invalid node configuration")?;
        let store = open_store(&config.storage)?;
        let registry = MortgageRegistry::new(Arc::clone(&store), config.registry.clone());
        info!(
            index_mode = %config.registry.index_mode,
            index_key = %config.registry.index_key,
            "Mortgage registry wired"
        );
        Ok(Self {
            dispatcher: Dispatcher::new(registry, CertAttributeResolver::new()),
            store,
            config,
        })
    }
}

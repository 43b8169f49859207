//! # Node Configuration
//!
//! Unified configuration for the world-state backend, the registry, and
//! logging.
//!
//! ## Environment
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `ML_STORAGE_BACKEND` | `memory` | `memory` or `rocksdb` |
//! | `ML_DATA_DIR` | `./data/ledger` | RocksDB directory |
//! | `ML_SYNC_WRITES` | `true` | fsync every write (RocksDB) |
//! | `ML_INDEX_MODE` | `read-modify-write` | or `conditional` |
//! | `ML_INDEX_KEY` | `mortIDs` | index aggregate key |
//! | `ML_LOG` / `RUST_LOG` | `info` | tracing filter directive |

use ml_03_mortgage_registry::{IndexMode, RegistryConfig};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeConfig {
    /// World-state backend.
    pub storage: StorageConfig,
    /// Registry behaviour.
    pub registry: RegistryConfig,
    /// Log filtering.
    pub logging: LoggingConfig,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds an unusable value.
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Supplied value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// RocksDB selected in a build without the `rocksdb` feature.
    #[error("RocksDB backend requested but this binary was built without the 'rocksdb' feature")]
    RocksDbNotCompiled,

    /// The index key is empty.
    #[error("Index key must not be empty")]
    EmptyIndexKey,
}

/// World-state backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Process-local map. Lost on exit.
    #[default]
    InMemory,
    /// RocksDB directory at `StorageConfig::data_dir`.
    RocksDb,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Ok(StorageBackend::InMemory),
            "rocksdb" => Ok(StorageBackend::RocksDb),
            other => Err(format!("unknown backend '{}' (expected memory or rocksdb)", other)),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Backend.
    pub backend: StorageBackend,
    /// Data directory (RocksDB only).
    pub data_dir: PathBuf,
    /// fsync every write (RocksDB only).
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: PathBuf::from("./data/ledger"),
            sync_writes: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T::Err: ToString,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        reason: e.to_string(),
        value,
    })
}

impl NodeConfig {
    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = NodeConfig::default();

        if let Some(value) = lookup("ML_STORAGE_BACKEND") {
            config.storage.backend = parse_var("ML_STORAGE_BACKEND", value)?;
        }
        if let Some(value) = lookup("ML_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("ML_SYNC_WRITES") {
            config.storage.sync_writes = parse_var("ML_SYNC_WRITES", value)?;
        }
        if let Some(value) = lookup("ML_INDEX_MODE") {
            config.registry.index_mode = parse_var::<IndexMode>("ML_INDEX_MODE", value)?;
        }
        if let Some(value) = lookup("ML_INDEX_KEY") {
            config.registry.index_key = value;
        }
        if let Some(filter) = lookup("ML_LOG").or_else(|| lookup("RUST_LOG")) {
            config.logging.filter = filter;
        }

        Ok(config)
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reject inconsistent combinations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.index_key.trim().is_empty() {
            return Err(ConfigError::EmptyIndexKey);
        }
        if self.storage.backend == StorageBackend::RocksDb && !cfg!(feature = "rocksdb") {
            return Err(ConfigError::RocksDbNotCompiled);
        }
        Ok(())
    }
}

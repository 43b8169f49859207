//! # Adapters Layer
//!
//! Concrete `KeyValueStore` backends.

pub mod memory_store;

#[cfg(feature = "rocksdb")]
pub mod rocksdb_store;

pub use memory_store::InMemoryKVStore;

#[cfg(feature = "rocksdb")]
pub use rocksdb_store::{RocksDbConfig, RocksDbStore, CF_WORLD_STATE};

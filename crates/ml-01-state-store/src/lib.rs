//! # ML-01 State Store
//!
//! World-state access for the mortgage ledger.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Purpose
//!
//! Every other subsystem reads and writes ledger entries through the
//! `KeyValueStore` port defined here. Keys are opaque strings, values are
//! opaque bytes. An absent key is `Ok(None)`, never an error.
//!
//! ## Backends
//!
//! | Backend | Location | Use |
//! |---------|----------|-----|
//! | `InMemoryKVStore` | `adapters/memory_store.rs` | Tests, single-process runs |
//! | `RocksDbStore` | `adapters/rocksdb_store.rs` | Persistent runs (`rocksdb` feature) |
//!
//! ## Write Semantics
//!
//! - `put` is a whole-value replace. There are no partial writes.
//! - `compare_and_put` and `atomic_batch_write` are atomic with respect to
//!   every other write issued through the same store handle. A batch lands
//!   whole or not at all.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod errors;
pub mod ports;

pub use adapters::*;
pub use errors::StoreError;
pub use ports::{KeyValueStore, WriteBatch};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

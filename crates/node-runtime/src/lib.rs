//! # Node Runtime Library
//!
//! This library exposes the internal modules of the node runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Modules
//!
//! - `container/` - Configuration, storage backend selection, wiring
//! - `shim` - JSON-lines request/response loop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod container;
pub mod shim;

pub use container::{NodeConfig, NodeContainer, NodeDispatcher, SharedStore};
pub use shim::{serve, ServeSummary, StopReason};

//! # Integration Tests
//!
//! Flows that cross the state store, identity, registry, and host shim
//! crates.

pub mod faults;
pub mod lifecycle;
pub mod permissions;

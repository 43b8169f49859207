//! # ML-02 Identity Resolver
//!
//! Resolves the caller of an invocation from the platform-supplied
//! certificate attributes, and stores the enrollment credentials seeded at
//! bootstrap.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Resolution Rules
//!
//! | Attribute | Required | Meaning |
//! |-----------|----------|---------|
//! | `username` | yes, non-empty | Caller identifier |
//! | `role` | yes | `regulator`, `pl`/`primary-lender`, `sl`/`secondary-lender` |
//!
//! A missing attribute or an unrecognised role is an `IdentityError`. There
//! is no fallback role.
//!
//! ## Credential Registry
//!
//! `EcertRegistry` keeps one opaque credential per participant name, stored
//! in the world state under the participant name itself.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod ecert;
pub mod errors;
pub mod ports;

pub use adapters::{CertAttributeResolver, StaticResolver};
pub use ecert::EcertRegistry;
pub use errors::IdentityError;
pub use ports::IdentityResolver;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

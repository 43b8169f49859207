//! # Shared Types Crate
//!
//! This crate contains the caller identity types, the stable error-kind
//! vocabulary, and the `InvocationRequest` / `InvocationResponse` envelope
//! used between the host shim and the mortgage registry.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Envelope Authority**: The caller's identity is resolved from the
//!   envelope's `InvocationContext` only. Function arguments never carry the
//!   caller's own identity.
//! - **Closed Role Set**: `Affiliation` has exactly three variants; unknown
//!   role strings are rejected at the boundary.

pub mod envelope;
pub mod errors;
pub mod identity;

pub use envelope::{
    InvocationContext, InvocationKind, InvocationRequest, InvocationResponse, ATTR_ROLE,
    ATTR_USERNAME,
};
pub use errors::{ErrorKind, ParseAffiliationError};
pub use identity::{Affiliation, CallerIdentity};

//! # Domain Layer
//!
//! Mortgage records, the index aggregate, errors, and the permission policy.
//! No I/O.

pub mod entities;
pub mod errors;
pub mod policy;

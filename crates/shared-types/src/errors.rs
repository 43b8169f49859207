//! # Error Types
//!
//! Error vocabulary shared across subsystems and the host shim.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable, machine-readable failure kind reported for a failed invocation.
///
/// Every registry error maps to exactly one kind. The host shim writes the
/// kind into `InvocationResponse::error_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller identity or role does not permit the operation.
    PermissionDenied,
    /// A mortgage with the requested id already exists.
    AlreadyExists,
    /// Mortgage, index, or credential absent.
    NotFound,
    /// Stored mortgage bytes do not parse.
    CorruptRecord,
    /// Stored index bytes do not parse.
    CorruptIndex,
    /// The ledger rejected a write.
    StoreWriteError,
    /// The ledger failed a read.
    StoreReadError,
    /// Caller certificate attributes could not be resolved.
    IdentityResolutionError,
    /// No operation is registered under the requested function name.
    UnknownFunction,
    /// Listing aborted because one indexed mortgage could not be retrieved.
    RetrievalFailure,
    /// Wrong number of arguments for the requested function.
    InvalidArguments,
    /// Empty or otherwise unusable mortgage id.
    InvalidMortgageId,
    /// Conditional index update lost a race with a concurrent writer.
    IndexConflict,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Role string outside the closed affiliation set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown affiliation: '{0}' (expected regulator, pl or sl)")]
pub struct ParseAffiliationError(pub String);

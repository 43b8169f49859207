//! # Store Errors
//!
//! Failures of the underlying ledger storage engine. Absence of a key is not
//! an error and never appears here.

use thiserror::Error;

/// Errors raised by a `KeyValueStore` backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Reading a key failed.
    #[error("Store read failed for key '{key}': {message}")]
    ReadFailed {
        /// Key being read.
        key: String,
        /// Backend message.
        message: String,
    },

    /// Writing a key failed.
    #[error("Store write failed for key '{key}': {message}")]
    WriteFailed {
        /// Key being written.
        key: String,
        /// Backend message.
        message: String,
    },

    /// The backend could not be opened or is no longer usable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Build a read failure for `key`.
    pub fn read(key: &str, message: impl Into<String>) -> Self {
        StoreError::ReadFailed {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Build a write failure for `key`.
    pub fn write(key: &str, message: impl Into<String>) -> Self {
        StoreError::WriteFailed {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Returns true if the failure happened on the write path.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(self, StoreError::WriteFailed { .. })
    }
}

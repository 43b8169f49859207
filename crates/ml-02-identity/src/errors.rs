//! Identity resolution and credential lookup errors.

use ml_01_state_store::StoreError;
use shared_types::ParseAffiliationError;
use thiserror::Error;

/// Errors raised while resolving a caller or reading a credential.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// A required certificate attribute is absent.
    #[error("Caller certificate has no '{name}' attribute")]
    MissingAttribute {
        /// Attribute name.
        name: String,
    },

    /// The `username` attribute is present but empty.
    #[error("Caller certificate has an empty '{name}' attribute")]
    EmptyAttribute {
        /// Attribute name.
        name: String,
    },

    /// The `role` attribute is outside the closed role set.
    #[error(transparent)]
    UnknownRole(#[from] ParseAffiliationError),

    /// No credential stored for the participant.
    #[error("No enrollment credential stored for '{name}'")]
    CredentialNotFound {
        /// Participant name.
        name: String,
    },

    /// Credential bytes are not valid UTF-8.
    #[error("Enrollment credential for '{name}' is not valid UTF-8")]
    CorruptCredential {
        /// Participant name.
        name: String,
    },

    /// Underlying world-state failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

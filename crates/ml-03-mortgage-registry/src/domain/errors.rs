//! Registry error types.

use ml_01_state_store::StoreError;
use ml_02_identity::IdentityError;
use shared_types::ErrorKind;
use thiserror::Error;

/// Errors surfaced by registry operations and the dispatcher.
///
/// None of these are retried internally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller identity or role does not permit the operation.
    #[error("Permission denied: {operation} by '{caller}': {reason}")]
    PermissionDenied {
        /// Operation name.
        operation: &'static str,
        /// Caller identifier.
        caller: String,
        /// Which rule failed.
        reason: String,
    },

    /// A mortgage with this id already exists.
    #[error("Mortgage already exists: {mortgage_id}")]
    AlreadyExists {
        /// Mortgage id.
        mortgage_id: String,
    },

    /// No mortgage stored under this id.
    #[error("Mortgage not found: {mortgage_id}")]
    MortgageNotFound {
        /// Mortgage id.
        mortgage_id: String,
    },

    /// The index aggregate has not been initialized.
    #[error("Mortgage index not found at key '{key}'")]
    IndexNotFound {
        /// Index ledger key.
        key: String,
    },

    /// No enrollment credential for this participant.
    #[error("No enrollment credential stored for '{name}'")]
    CredentialNotFound {
        /// Participant name.
        name: String,
    },

    /// Stored bytes under `key` are not a well-formed record.
    #[error("Corrupt record at '{key}': {message}")]
    CorruptRecord {
        /// Ledger key.
        key: String,
        /// Decoder message.
        message: String,
    },

    /// Stored index bytes are not a well-formed id list.
    #[error("Corrupt mortgage index at '{key}': {message}")]
    CorruptIndex {
        /// Index ledger key.
        key: String,
        /// Decoder message.
        message: String,
    },

    /// The ledger rejected a write.
    #[error("Store write failed: {0}")]
    StoreWrite(StoreError),

    /// The ledger failed a read.
    #[error("Store read failed: {0}")]
    StoreRead(StoreError),

    /// The caller could not be identified.
    #[error("Identity resolution failed: {0}")]
    IdentityResolution(IdentityError),

    /// No operation registered under this function name.
    #[error("Function of the name '{name}' doesn't exist")]
    UnknownFunction {
        /// Offending function name.
        name: String,
    },

    /// Listing aborted because one indexed mortgage could not be read.
    #[error("Failed to retrieve mortgage {mortgage_id}: {source}")]
    RetrievalFailure {
        /// Mortgage id that failed.
        mortgage_id: String,
        /// Underlying failure.
        #[source]
        source: Box<RegistryError>,
    },

    /// Wrong number of arguments for a function.
    #[error("{function}: expected {expected} argument(s), got {actual}")]
    InvalidArguments {
        /// Function name.
        function: String,
        /// Required argument count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// Mortgage id is empty.
    #[error("Invalid mortgage id provided")]
    InvalidMortgageId,

    /// A concurrent writer changed the index between read and write.
    #[error(
        "Index conflict appending {mortgage_id}: the mortgage record was written but is not indexed; resubmit"
    )]
    IndexConflict {
        /// Mortgage id whose append lost the race.
        mortgage_id: String,
    },
}

impl RegistryError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            RegistryError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            RegistryError::MortgageNotFound { .. }
            | RegistryError::IndexNotFound { .. }
            | RegistryError::CredentialNotFound { .. } => ErrorKind::NotFound,
            RegistryError::CorruptRecord { .. } => ErrorKind::CorruptRecord,
            RegistryError::CorruptIndex { .. } => ErrorKind::CorruptIndex,
            RegistryError::StoreWrite(_) => ErrorKind::StoreWriteError,
            RegistryError::StoreRead(_) => ErrorKind::StoreReadError,
            RegistryError::IdentityResolution(_) => ErrorKind::IdentityResolutionError,
            RegistryError::UnknownFunction { .. } => ErrorKind::UnknownFunction,
            RegistryError::RetrievalFailure { .. } => ErrorKind::RetrievalFailure,
            RegistryError::InvalidArguments { .. } => ErrorKind::InvalidArguments,
            RegistryError::InvalidMortgageId => ErrorKind::InvalidMortgageId,
            RegistryError::IndexConflict { .. } => ErrorKind::IndexConflict,
        }
    }

    /// Shorthand for a permission denial.
    pub fn denied(
        operation: &'static str,
        caller: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RegistryError::PermissionDenied {
            operation,
            caller: caller.into(),
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        if err.is_write() {
            RegistryError::StoreWrite(err)
        } else {
            RegistryError::StoreRead(err)
        }
    }
}

impl From<IdentityError> for RegistryError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::CredentialNotFound { name } => RegistryError::CredentialNotFound { name },
            IdentityError::CorruptCredential { name } => RegistryError::CorruptRecord {
                key: name,
                message: "credential is not valid UTF-8".to_string(),
            },
            IdentityError::Store(store) => store.into(),
            other => RegistryError::IdentityResolution(other),
        }
    }
}

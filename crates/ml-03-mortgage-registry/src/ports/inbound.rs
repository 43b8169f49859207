//! # Inbound Ports (Driving Ports / API)
//!
//! Registry operations. The caller is always passed in explicitly, already
//! resolved from the invocation context.

use crate::domain::entities::Mortgage;
use crate::domain::errors::RegistryError;
use shared_types::{Affiliation, CallerIdentity};

/// Primary API of the mortgage registry.
pub trait MortgageRegistryApi: Send + Sync {
    /// Originate mortgage `mortgage_id`, owned by the caller.
    ///
    /// # Errors
    /// * `InvalidMortgageId` - empty id
    /// * `PermissionDenied` - caller is not a primary lender
    /// * `AlreadyExists` - id already taken
    /// * `IndexNotFound` / `CorruptIndex` - index unusable, nothing written
    /// * `IndexConflict` - conditional index changed concurrently, nothing written
    fn create(&self, caller: &CallerIdentity, mortgage_id: &str)
        -> Result<Mortgage, RegistryError>;

    /// Move `mortgage_id` from the caller to `recipient_id`.
    ///
    /// # Errors
    /// * `MortgageNotFound` - no such mortgage
    /// * `PermissionDenied` - any transfer rule failed, nothing written
    fn transfer(
        &self,
        caller: &CallerIdentity,
        mortgage_id: &str,
        recipient_id: &str,
        recipient_role: Affiliation,
    ) -> Result<Mortgage, RegistryError>;

    /// Full record, owner only.
    fn get_details(
        &self,
        caller: &CallerIdentity,
        mortgage_id: &str,
    ) -> Result<Mortgage, RegistryError>;

    /// Every mortgage the caller owns, in creation order.
    ///
    /// # Errors
    /// * `RetrievalFailure` - an indexed mortgage could not be read
    fn list_visible(&self, caller: &CallerIdentity) -> Result<Vec<Mortgage>, RegistryError>;

    /// `true` if no mortgage is stored under `mortgage_id`.
    fn check_unique(&self, mortgage_id: &str) -> Result<bool, RegistryError>;

    /// Enrollment credential seeded for `name`.
    fn get_ecert(&self, name: &str) -> Result<String, RegistryError>;

    /// Liveness check. No state access.
    fn ping(&self) -> &'static str;
}

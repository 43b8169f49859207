//! # Permission Policy
//!
//! Pure role and ownership checks. Each returns `PermissionDenied` naming
//! the first rule that failed.

use crate::domain::entities::Mortgage;
use crate::domain::errors::RegistryError;
use shared_types::{Affiliation, CallerIdentity};

/// Only primary lenders originate mortgages.
pub fn authorize_create(caller: &CallerIdentity) -> Result<(), RegistryError> {
    if caller.is(Affiliation::PrimaryLender) {
        Ok(())
    } else {
        Err(RegistryError::denied(
            "create_mortgage",
            &caller.id,
            format!("role {} is not {}", caller.affiliation, Affiliation::PrimaryLender),
        ))
    }
}

/// Primary-lender owner to secondary-lender recipient, nothing else.
pub fn authorize_transfer(
    mortgage: &Mortgage,
    caller: &CallerIdentity,
    recipient_role: Affiliation,
) -> Result<(), RegistryError> {
    let reason = if !mortgage.is_owned_by(&caller.id) {
        format!("{} is owned by '{}'", mortgage.id, mortgage.owner)
    } else if !caller.is(Affiliation::PrimaryLender) {
        format!("caller role {} is not {}", caller.affiliation, Affiliation::PrimaryLender)
    } else if recipient_role != Affiliation::SecondaryLender {
        format!(
            "recipient role {} is not {}",
            recipient_role,
            Affiliation::SecondaryLender
        )
    } else {
        return Ok(());
    };
    Err(RegistryError::denied("pl_to_sl", &caller.id, reason))
}

/// Owner-only read. No role override.
pub fn can_view(mortgage: &Mortgage, caller: &CallerIdentity) -> bool {
    mortgage.is_owned_by(&caller.id)
}

/// `can_view` as a `Result`, for single-record reads.
pub fn authorize_read(mortgage: &Mortgage, caller: &CallerIdentity) -> Result<(), RegistryError> {
    if can_view(mortgage, caller) {
        Ok(())
    } else {
        Err(RegistryError::denied(
            "get_mortgage_details",
            &caller.id,
            format!("{} is not owned by the caller", mortgage.id),
        ))
    }
}

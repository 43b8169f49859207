//! # Inbound Port
//!
//! The registry asks this port who is calling. It never reads identity
//! from function arguments.

use crate::errors::IdentityError;
use shared_types::{CallerIdentity, InvocationContext};
use std::sync::Arc;

/// Resolves the caller of one invocation.
pub trait IdentityResolver: Send + Sync {
    /// Resolve the caller's identifier and role from `ctx`.
    ///
    /// # Errors
    /// * `IdentityError::MissingAttribute` - `username` or `role` absent
    /// * `IdentityError::EmptyAttribute` - `username` present but empty
    /// * `IdentityError::UnknownRole` - `role` outside the closed set
    fn resolve_caller(&self, ctx: &InvocationContext) -> Result<CallerIdentity, IdentityError>;
}

impl<R: IdentityResolver + ?Sized> IdentityResolver for Arc<R> {
    fn resolve_caller(&self, ctx: &InvocationContext) -> Result<CallerIdentity, IdentityError> {
        (**self).resolve_caller(ctx)
    }
}

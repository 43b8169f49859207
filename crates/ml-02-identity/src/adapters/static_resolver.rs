//! Fixed-identity resolver for tests.

use crate::errors::IdentityError;
use crate::ports::IdentityResolver;
use shared_types::{CallerIdentity, InvocationContext};

/// Resolver that ignores the context and returns a fixed caller, or a
/// fixed error when built with `failing`.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    outcome: Result<CallerIdentity, IdentityError>,
}

impl StaticResolver {
    /// Always resolve to `caller`.
    pub fn new(caller: CallerIdentity) -> Self {
        Self { outcome: Ok(caller) }
    }

    /// Always fail with `error`.
    pub fn failing(error: IdentityError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

impl IdentityResolver for StaticResolver {
    fn resolve_caller(&self, _ctx: &InvocationContext) -> Result<CallerIdentity, IdentityError> {
        self.outcome.clone()
    }
}

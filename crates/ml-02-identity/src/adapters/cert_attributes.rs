//! Resolver reading the `username` and `role` certificate attributes.

use crate::errors::IdentityError;
use crate::ports::IdentityResolver;
use shared_types::{Affiliation, CallerIdentity, InvocationContext, ATTR_ROLE, ATTR_USERNAME};
use tracing::debug;

/// Production resolver over the platform's certificate attributes.
#[derive(Debug, Clone)]
pub struct CertAttributeResolver {
    username_attribute: String,
    role_attribute: String,
}

impl Default for CertAttributeResolver {
    fn default() -> Self {
        Self {
            username_attribute: ATTR_USERNAME.to_string(),
            role_attribute: ATTR_ROLE.to_string(),
        }
    }
}

impl CertAttributeResolver {
    /// Resolver using the standard `username` and `role` attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver using custom attribute names.
    pub fn with_attributes(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            username_attribute: username.into(),
            role_attribute: role.into(),
        }
    }

    fn required<'a>(
        &self,
        ctx: &'a InvocationContext,
        name: &str,
    ) -> Result<&'a str, IdentityError> {
        ctx.attribute(name)
            .ok_or_else(|| IdentityError::MissingAttribute {
                name: name.to_string(),
            })
    }
}

impl IdentityResolver for CertAttributeResolver {
    fn resolve_caller(&self, ctx: &InvocationContext) -> Result<CallerIdentity, IdentityError> {
        let id = self.required(ctx, &self.username_attribute)?.trim();
        if id.is_empty() {
            return Err(IdentityError::EmptyAttribute {
                name: self.username_attribute.clone(),
            });
        }
        let affiliation: Affiliation = self.required(ctx, &self.role_attribute)?.parse()?;

        debug!(caller = %id, role = %affiliation, "Resolved caller");
        Ok(CallerIdentity::new(id, affiliation))
    }
}

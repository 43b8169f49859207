//! # Invocation Envelope
//!
//! The wrapper for every call the host shim hands to the registry, and the
//! response it writes back.
//!
//! ## Properties
//!
//! - **Correlation**: The response echoes the request's `tx_id`.
//! - **Envelope Authority**: `context` is the sole source of truth for the
//!   caller's identity. `args` never carry it.
//! - **Closed Kinds**: `Invoke` may mutate ledger state, `Query` may not.

use crate::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Certificate attribute carrying the caller identifier.
pub const ATTR_USERNAME: &str = "username";

/// Certificate attribute carrying the caller role.
pub const ATTR_ROLE: &str = "role";

/// Whether the call may mutate ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationKind {
    /// State-changing entry point.
    Invoke,
    /// Read-only entry point.
    Query,
}

/// Caller certificate attributes attached to an invocation by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    /// Raw attribute name to value map.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl InvocationContext {
    /// Context with no attributes. Identity resolution against it fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context carrying the `username` and `role` attributes of a caller.
    pub fn for_caller(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self::new()
            .with_attribute(ATTR_USERNAME, username)
            .with_attribute(ATTR_ROLE, role)
    }

    /// Builder-style attribute insert.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up one attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// One call from the host shim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Transaction id. Generated by the shim when the caller omits it.
    #[serde(default = "Uuid::new_v4")]
    pub tx_id: Uuid,
    /// Invoke or query.
    pub kind: InvocationKind,
    /// Function name.
    pub function: String,
    /// Ordered string arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Caller attributes.
    #[serde(default)]
    pub context: InvocationContext,
}

impl InvocationRequest {
    /// Build an invoke request with a fresh `tx_id`.
    pub fn invoke(
        function: impl Into<String>,
        args: Vec<String>,
        context: InvocationContext,
    ) -> Self {
        Self {
            tx_id: Uuid::new_v4(),
            kind: InvocationKind::Invoke,
            function: function.into(),
            args,
            context,
        }
    }

    /// Build a query request with a fresh `tx_id`.
    pub fn query(
        function: impl Into<String>,
        args: Vec<String>,
        context: InvocationContext,
    ) -> Self {
        Self {
            kind: InvocationKind::Query,
            ..Self::invoke(function, args, context)
        }
    }
}

/// Result of one call, written back to the host shim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    /// Echo of the request's `tx_id`.
    pub tx_id: Uuid,
    /// True if the operation succeeded.
    pub ok: bool,
    /// Operation output, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Accompanying message on success (e.g. the not-unique notice).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// Failure kind. Present iff `ok` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Human-readable failure message. Present iff `ok` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InvocationResponse {
    /// Successful response with an optional payload.
    pub fn success(tx_id: Uuid, payload: Option<String>) -> Self {
        Self {
            tx_id,
            ok: true,
            payload,
            notice: None,
            error_kind: None,
            message: None,
        }
    }

    /// Attach a notice to a successful response.
    #[must_use]
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// Failed response.
    pub fn failure(tx_id: Uuid, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            tx_id,
            ok: false,
            payload: None,
            notice: None,
            error_kind: Some(kind),
            message: Some(message.into()),
        }
    }
}

//! # Mortgage Entities
//!
//! The mortgage record and the index aggregate, with their JSON ledger
//! encodings.

use serde::{Deserialize, Serialize};

/// Ledger key of the index aggregate.
pub const DEFAULT_INDEX_KEY: &str = "mortIDs";

/// Lendee value assigned at creation.
pub const UNDEFINED_LENDEE: &str = "undefined";

/// A tracked mortgage.
///
/// `id` is fixed at creation. `owner` changes only through a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mortgage {
    /// Unique mortgage identifier. Also the record's ledger key.
    #[serde(rename = "mortID")]
    pub id: String,
    /// Borrower. Free text.
    pub lendee: String,
    /// Current holder.
    pub owner: String,
}

impl Mortgage {
    /// New mortgage owned by `owner`, with the lendee left undefined.
    pub fn originate(id: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lendee: UNDEFINED_LENDEE.to_string(),
            owner: owner.into(),
        }
    }

    /// True if `caller_id` holds this mortgage.
    #[must_use]
    pub fn is_owned_by(&self, caller_id: &str) -> bool {
        self.owner == caller_id
    }

    /// JSON ledger encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode from the JSON ledger encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// The index aggregate: every mortgage id ever created, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageIdList {
    /// Ids in insertion order.
    #[serde(rename = "mortIDs")]
    pub ids: Vec<String>,
}

impl MortgageIdList {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` at the end. Duplicates are not checked here.
    pub fn push(&mut self, id: impl Into<String>) {
        self.ids.push(id.into());
    }

    /// True if `id` is listed.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Number of listed ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if no ids are listed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// JSON ledger encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode from the JSON ledger encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

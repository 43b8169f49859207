//! # Caller Identity
//!
//! The closed set of ledger participant roles and the resolved identity of
//! the caller of one invocation.

use crate::errors::ParseAffiliationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Participant role (certificate affiliation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Affiliation {
    /// Oversight authority. Holds no mortgages through the registry.
    Regulator,
    /// Originates mortgages and sells them on.
    PrimaryLender,
    /// Buys mortgages from primary lenders.
    SecondaryLender,
}

impl Affiliation {
    /// All roles, in a fixed order.
    pub const ALL: [Affiliation; 3] = [
        Affiliation::Regulator,
        Affiliation::PrimaryLender,
        Affiliation::SecondaryLender,
    ];

    /// Short attribute value as written into enrollment certificates.
    #[must_use]
    pub fn as_attribute(&self) -> &'static str {
        match self {
            Affiliation::Regulator => "regulator",
            Affiliation::PrimaryLender => "pl",
            Affiliation::SecondaryLender => "sl",
        }
    }
}

impl fmt::Display for Affiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Affiliation::Regulator => "regulator",
            Affiliation::PrimaryLender => "primary-lender",
            Affiliation::SecondaryLender => "secondary-lender",
        };
        f.write_str(s)
    }
}

impl FromStr for Affiliation {
    type Err = ParseAffiliationError;

    /// Accepts both the certificate short form (`pl`, `sl`) and the long
    /// form (`primary-lender`, `secondary-lender`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regulator" => Ok(Affiliation::Regulator),
            "pl" | "primary-lender" | "primary_lender" => Ok(Affiliation::PrimaryLender),
            "sl" | "secondary-lender" | "secondary_lender" => Ok(Affiliation::SecondaryLender),
            _ => Err(ParseAffiliationError(s.to_string())),
        }
    }
}

/// The resolved caller of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Caller identifier (certificate `username` attribute).
    pub id: String,
    /// Caller role.
    pub affiliation: Affiliation,
}

impl CallerIdentity {
    /// Caller `id` acting as `affiliation`.
    pub fn new(id: impl Into<String>, affiliation: Affiliation) -> Self {
        Self {
            id: id.into(),
            affiliation,
        }
    }

    /// Returns true if the caller holds `role`.
    #[must_use]
    pub fn is(&self, role: Affiliation) -> bool {
        self.affiliation == role
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.affiliation)
    }
}

//! # ML-03 Mortgage Registry
//!
//! Tracks ownership of mortgages on the permissioned key-value ledger.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (Domain/Ports/Adapters/Service)
//!
//! ## Lifecycle
//!
//! ```text
//! nonexistent ──create (primary-lender)──▶ owned(P) ──pl_to_sl──▶ owned(S)
//! ```
//!
//! A mortgage is created once, never deleted, and changes owner only
//! through a successful transfer.
//!
//! ## Permission Rules
//!
//! | Operation | Rule |
//! |-----------|------|
//! | Create | caller is a primary lender |
//! | Transfer | caller owns it, caller is a primary lender, recipient is a secondary lender |
//! | Get details | caller owns it |
//! | List | only records the caller owns are returned |
//!
//! ## Ledger Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | mortgage id | `{"mortID":..,"lendee":..,"owner":..}` |
//! | `mortIDs` | `{"mortIDs":[..]}` in creation order |
//! | participant name | enrollment credential |
//!
//! ## Index Concurrency
//!
//! A new record and its index entry are committed in one atomic batch.
//! `ReadModifyWriteIndex` (default) rewrites the index without checking it
//! is unchanged since it was read. Two creates racing on the index can lose
//! one id (last writer wins). `ConditionalIndex` guards the batch on the
//! index value it read and fails the losing create with `IndexConflict`,
//! writing nothing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod bootstrap;
pub mod dispatcher;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{ConditionalIndex, MortgageRepository, ReadModifyWriteIndex};
pub use bootstrap::{Bootstrap, BootstrapError, BootstrapReport};
pub use dispatcher::{DispatchOutput, Dispatcher, InvokeCall, QueryCall};
pub use domain::entities::{Mortgage, MortgageIdList, DEFAULT_INDEX_KEY, UNDEFINED_LENDEE};
pub use domain::errors::RegistryError;
pub use ports::inbound::MortgageRegistryApi;
pub use ports::outbound::MortgageIndex;
pub use service::{IndexMode, MortgageRegistry, RegistryConfig, RegistryStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! # Adapters Layer
//!
//! World-state backed repository and index services.

pub mod index;
pub mod repository;

pub use index::{ConditionalIndex, ReadModifyWriteIndex};
pub use repository::MortgageRepository;

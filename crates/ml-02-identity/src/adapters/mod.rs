//! # Adapters Layer
//!
//! `IdentityResolver` implementations.

pub mod cert_attributes;
pub mod static_resolver;

pub use cert_attributes::CertAttributeResolver;
pub use static_resolver::StaticResolver;

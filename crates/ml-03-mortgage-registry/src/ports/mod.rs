//! # Ports Layer
//!
//! - `inbound`: the registry API driven by the dispatcher
//! - `outbound`: the index service the repository drives

pub mod inbound;
pub mod outbound;

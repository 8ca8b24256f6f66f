//! Error handling
//!
//! Defines error types for the registry, the client connector, and the
//! operator console.

pub mod types;

pub use types::*;

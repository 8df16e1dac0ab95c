//! # Relay Core
//!
//! Token lifecycle and namespaced storage for the relay.
//! This crate contains the domain types, the key-value backend contract,
//! the registry/store/reaper services and the error taxonomy the transport
//! layer maps onto responses.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;

//! # Infrastructure Layer
//!
//! Concrete implementations of the relay's external dependencies.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: Redis client implementing the core `KeyValueBackend` contract,
//!   with connection retry, command retry and cursor-based prefix scans

// Re-export core error types for convenience
pub use relay_core::errors::{BackendError, BackendResult};

/// Cache module - Redis client and operations
pub mod cache;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection attempt exceeded the configured timeout
    #[error("Timeout: {0}")]
    Timeout(String),
}

impl From<InfrastructureError> for BackendError {
    fn from(error: InfrastructureError) -> Self {
        BackendError::new(error.to_string())
    }
}

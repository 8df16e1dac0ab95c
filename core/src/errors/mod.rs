//! Relay error types and error handling.

mod types;

pub use types::{BackendError, BackendResult};

use thiserror::Error;

/// Errors surfaced by the registry, the namespaced store and the relay service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Token does not exist: {token}")]
    TokenNotFound { token: String },

    #[error("Key does not exist: {key}")]
    KeyNotFound { token: String, key: String },

    #[error("Token already in use: {token}")]
    AlreadyExists { token: String },

    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl RelayError {
    /// Whether the failure came from a request-level condition rather than infrastructure
    pub fn is_client_error(&self) -> bool {
        !matches!(self, RelayError::Backend(_))
    }
}

pub type RelayResult<T> = Result<T, RelayError>;

//! Backend fault type shared by every `KeyValueBackend` implementation

use thiserror::Error;

/// A transient infrastructure fault reported by the key-value backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Backend error: {message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

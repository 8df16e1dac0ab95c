//! Request and response payloads

use serde::{Deserialize, Serialize};

/// Parameters accepted by the relay routes
///
/// Every route reads the same three fields from the query string and, for
/// url-encoded bodies, from the form. Absent fields read as empty strings.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RelayParams {
    pub token: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
}

impl RelayParams {
    /// Combine query and form parameters; a field present in the form wins
    pub fn merge(query: Self, form: Option<Self>) -> Self {
        match form {
            Some(form) => Self {
                token: form.token.or(query.token),
                key: form.key.or(query.key),
                value: form.value.or(query.value),
            },
            None => query,
        }
    }

    pub fn token(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }

    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or_default()
    }

    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

/// Body of `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub version: String,
    pub timestamp: String,
}

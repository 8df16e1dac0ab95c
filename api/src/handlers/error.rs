//! Mapping from relay errors to HTTP responses
//!
//! Bodies are plain text and never expose backend details to the client.

use actix_web::{http::StatusCode, HttpResponse};
use tracing::{error, warn};

use relay_core::errors::RelayError;

/// HTTP status for a relay error
pub fn status_for(error: &RelayError) -> StatusCode {
    match error {
        RelayError::TokenNotFound { .. }
        | RelayError::KeyNotFound { .. }
        | RelayError::InvalidToken { .. } => StatusCode::BAD_REQUEST,
        RelayError::AlreadyExists { .. } => StatusCode::CONFLICT,
        RelayError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for(error: &RelayError) -> String {
    match error {
        RelayError::TokenNotFound { .. } => "Token does not exist\n".to_string(),
        RelayError::KeyNotFound { .. } => "Key does not exist\n".to_string(),
        RelayError::AlreadyExists { .. } => "Token already in use".to_string(),
        RelayError::InvalidToken { reason } => format!("Invalid token: {}\n", reason),
        RelayError::Backend(_) => "Internal server error\n".to_string(),
    }
}

/// Build the response for a failed request
pub fn error_response(error: &RelayError) -> HttpResponse {
    if error.is_client_error() {
        warn!("Request rejected: {}", error);
    } else {
        error!("Request failed: {}", error);
    }

    HttpResponse::build(status_for(error))
        .content_type("text/plain; charset=utf-8")
        .body(body_for(error))
}

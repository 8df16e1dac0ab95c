use actix_web::{web, HttpResponse};
use tracing::warn;

use relay_core::repositories::KeyValueBackend;

use crate::app::AppState;
use crate::dto::HealthResponse;

/// Health check endpoint handler
///
/// `200` while the backend answers its ping, `503` otherwise.
pub async fn health_check<B: KeyValueBackend + 'static>(
    state: web::Data<AppState<B>>,
) -> HttpResponse {
    let backend_up = match state.backend.health_check().await {
        Ok(up) => up,
        Err(e) => {
            warn!("Backend health check failed: {}", e);
            false
        }
    };

    let body = HealthResponse {
        status: if backend_up { "healthy" } else { "unhealthy" }.to_string(),
        backend: if backend_up { "up" } else { "down" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if backend_up {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

use actix_web::{web, HttpRequest, HttpResponse};

use relay_core::repositories::KeyValueBackend;

use crate::app::AppState;
use crate::dto::RelayParams;
use crate::handlers::{error_response, relay_params};

/// Handler for GET|POST /registerToken
///
/// # Responses
/// * `201 Created` - body is the registered token
/// * `400 Bad Request` - malformed token
/// * `409 Conflict` - token already registered
/// * `500 Internal Server Error` - backend failure
pub async fn register_token<B: KeyValueBackend + 'static>(
    req: HttpRequest,
    state: web::Data<AppState<B>>,
    query: web::Query<RelayParams>,
    form: Result<web::Form<RelayParams>, actix_web::Error>,
) -> HttpResponse {
    let params = match relay_params(&req, query, form) {
        Ok(params) => params,
        Err(response) => return response,
    };

    match state.relay.handle_register(params.token()).await {
        Ok(token) => HttpResponse::Created()
            .content_type("text/plain; charset=utf-8")
            .body(token),
        Err(e) => error_response(&e),
    }
}

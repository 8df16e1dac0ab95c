use actix_web::{web, HttpRequest, HttpResponse};

use relay_core::repositories::KeyValueBackend;

use crate::app::AppState;
use crate::dto::RelayParams;
use crate::handlers::{error_response, relay_params};

/// Handler for POST|GET /set
///
/// Stores `value` under `(token, key)` and refreshes the token's last use.
/// Responds `200 OK` with an empty body, `400` for an unknown or malformed
/// token or an unreadable form body, `413` for a form body over the limit and
/// `500` on backend failure.
pub async fn set<B: KeyValueBackend + 'static>(
    req: HttpRequest,
    state: web::Data<AppState<B>>,
    query: web::Query<RelayParams>,
    form: Result<web::Form<RelayParams>, actix_web::Error>,
) -> HttpResponse {
    let params = match relay_params(&req, query, form) {
        Ok(params) => params,
        Err(response) => return response,
    };

    match state
        .relay
        .handle_set(params.token(), params.key(), params.value())
        .await
    {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(e) => error_response(&e),
    }
}

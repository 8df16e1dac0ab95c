use actix_web::{web, HttpRequest, HttpResponse};

use relay_core::repositories::KeyValueBackend;

use crate::app::AppState;
use crate::dto::RelayParams;
use crate::handlers::{error_response, relay_params};

/// Handler for GET|POST /get
///
/// Reads never refresh the token's last use.
pub async fn get<B: KeyValueBackend + 'static>(
    req: HttpRequest,
    state: web::Data<AppState<B>>,
    query: web::Query<RelayParams>,
    form: Result<web::Form<RelayParams>, actix_web::Error>,
) -> HttpResponse {
    let params = match relay_params(&req, query, form) {
        Ok(params) => params,
        Err(response) => return response,
    };

    match state.relay.handle_get(params.token(), params.key()).await {
        Ok(value) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(format!("{}\n", value)),
        Err(e) => error_response(&e),
    }
}

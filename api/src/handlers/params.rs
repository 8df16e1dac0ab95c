//! Extraction of relay parameters from the query string and form body

use actix_web::error::UrlencodedError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use tracing::warn;

use crate::dto::RelayParams;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Merge query and form parameters, rejecting form bodies that fail to parse
///
/// A request without a url-encoded body simply has no form. A request that
/// declares one but cannot be read (oversized, undecodable, unknown charset)
/// is answered with 413 or 400 instead of silently falling back to the query.
pub fn relay_params(
    req: &HttpRequest,
    query: web::Query<RelayParams>,
    form: Result<web::Form<RelayParams>, actix_web::Error>,
) -> Result<RelayParams, HttpResponse> {
    let form = match form {
        Ok(form) => Some(form.into_inner()),
        Err(e) => {
            let cause = e.as_error::<UrlencodedError>();
            let declares_form = req.content_type().eq_ignore_ascii_case(FORM_CONTENT_TYPE);

            match cause {
                Some(UrlencodedError::ContentType) if !declares_form => None,
                Some(UrlencodedError::Overflow { size, limit }) => {
                    warn!("Rejected form body of {} bytes (limit {})", size, limit);
                    return Err(plain(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large\n"));
                }
                _ => {
                    warn!("Rejected unreadable form body: {}", e);
                    return Err(plain(StatusCode::BAD_REQUEST, "Malformed form body\n"));
                }
            }
        }
    };

    Ok(RelayParams::merge(query.into_inner(), form))
}

fn plain(status: StatusCode, body: &'static str) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/plain; charset=utf-8")
        .body(body)
}

use actix_web::HttpResponse;

pub const WELCOME: &str =
    "Welcome to relay. Hit up /registerToken to register your first token.\n";

/// Handler for GET /
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(WELCOME)
}

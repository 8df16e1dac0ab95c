//! Application state and factory
//!
//! This module holds the shared state handed to every worker and builds the
//! Actix-web application around it.

use actix_web::{web, App, HttpResponse};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use relay_core::repositories::KeyValueBackend;
use relay_core::services::RelayService;

use crate::routes::{get, health, index, register, set};

/// Default upper bound for url-encoded form bodies
pub const DEFAULT_FORM_LIMIT: usize = 10 * 1024 * 1024;

/// Application state that holds shared services
pub struct AppState<B: KeyValueBackend + 'static> {
    pub relay: Arc<RelayService<B>>,
    /// Backend handle used by the health probe
    pub backend: Arc<B>,
    /// Largest accepted form body in bytes
    pub form_limit: usize,
}

impl<B: KeyValueBackend + 'static> AppState<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            relay: Arc::new(RelayService::new(Arc::clone(&backend))),
            backend,
            form_limit: DEFAULT_FORM_LIMIT,
        }
    }

    pub fn with_form_limit(mut self, form_limit: usize) -> Self {
        self.form_limit = form_limit;
        self
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<B>(
    app_state: web::Data<AppState<B>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody + 'static>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    B: KeyValueBackend + 'static,
{
    let form_config = web::FormConfig::default().limit(app_state.form_limit);

    App::new()
        .app_data(app_state)
        .app_data(form_config)
        .wrap(TracingLogger::default())
        .route("/", web::get().to(index::index))
        .service(
            web::resource("/registerToken")
                .route(web::get().to(register::register_token::<B>))
                .route(web::post().to(register::register_token::<B>)),
        )
        .service(
            web::resource("/set")
                .route(web::post().to(set::set::<B>))
                .route(web::get().to(set::set::<B>)),
        )
        .service(
            web::resource("/get")
                .route(web::get().to(get::get::<B>))
                .route(web::post().to(get::get::<B>)),
        )
        .route("/health", web::get().to(health::health_check::<B>))
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/plain; charset=utf-8")
        .body("Not found\n")
}

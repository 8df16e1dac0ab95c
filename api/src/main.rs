use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use relay_api::{config, create_app, telemetry, AppState};
use relay_core::services::ExpiryReaper;
use relay_infra::cache::RedisClient;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let (config, env_files) = config::load();
    telemetry::init(&config.logging)?;

    for path in &env_files {
        info!("Loaded environment from {}", path.display());
    }
    info!("Starting relay API server ({})", config.environment);

    let backend = Arc::new(
        RedisClient::new(config.cache.clone())
            .await
            .context("failed to connect to Redis")?,
    );

    let reaper = Arc::new(ExpiryReaper::new(Arc::clone(&backend), config.reaper.clone()));
    let reaper_handle = reaper.start_background_task();

    let state = web::Data::new(
        AppState::new(Arc::clone(&backend)).with_form_limit(config.server.max_form_bytes),
    );
    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone()))
        .keep_alive(Duration::from_secs(config.server.keep_alive))
        .client_request_timeout(Duration::from_secs(config.server.request_timeout));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let result = server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await;

    if let Some(handle) = reaper_handle {
        handle.shutdown().await;
    }

    result.context("HTTP server stopped with an error")
}

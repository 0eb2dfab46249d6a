//! # Yatube
//!
//! Entry point of the Actix-web HTTP server.

use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod fixtures;
mod handlers;
mod middleware;
mod observability;
mod render;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(host = %config.host, port = config.port, "Starting Yatube");

    let state = AppState::new(&config).await;
    fixtures::load_all(&state, &config.fixtures).await;

    HttpServer::new(move || {
        App::new()
            // Django-style URLs: `/create` and `/create/` are the same page.
            .wrap(NormalizePath::new(TrailingSlash::Always))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

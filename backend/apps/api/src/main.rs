//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors render through
//! `auth::AuthError`.

mod config;
mod metrics;

use std::sync::Arc;

use auth::domain::repository::SessionRepository;
use auth::{SqliteAuthRepository, auth_router};
use axum::{Router, middleware::from_fn_with_state, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, ServerConfig};
use crate::metrics::{PrometheusObserver, metrics_handler, track_http};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    // Database connection
    let repo = SqliteAuthRepository::connect(&config.database_url, config.db_max_connections).await?;
    repo.migrate().await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    if let Err(e) = repo.cleanup_expired_sessions().await {
        tracing::warn!(
            error = %e,
            "Auth session cleanup failed, continuing anyway"
        );
    }

    let metrics = PrometheusObserver::new()?;

    // Build router
    let app = Router::new()
        .route("/metrics", get(metrics_handler).with_state(metrics.clone()))
        .merge(auth_router(repo, config.auth_config(), Arc::new(metrics.clone())))
        .route_layer(from_fn_with_state(metrics, track_http))
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!(
        addr = %config.http_addr,
        domain = %config.domain,
        tls = config.tls_transport,
        "Listening"
    );

    let listener = TcpListener::bind(config.http_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

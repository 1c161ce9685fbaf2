//! Server wiring: database pool, event hub, router and listener.

pub mod config;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::{Extension, Router};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use vitrin_core::{EventHub, Store};

use crate::api;
use crate::api::stream::StreamSettings;
use crate::middleware::auth::AdminToken;
use config::AppConfig;

/// Large product images arrive base64-encoded in JSON bodies.
const BODY_LIMIT_BYTES: usize = 15 * 1024 * 1024;

/// Run the server until the process is stopped.
pub async fn run(config: AppConfig) -> Result<()> {
    let options = SqliteConnectOptions::from_str(&config.database.url)
        .with_context(|| format!("Invalid database URL: {}", config.database.url))?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(options)
        .await
        .context("Failed to open database")?;

    let store = Store::new(pool);
    store
        .init()
        .await
        .context("Failed to initialize database schema")?;

    // The hub lives as long as the router; all SSE connections register here.
    let hub = EventHub::new();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("API listening on http://{addr}");

    let app = router(store, hub, &config);
    axum::serve(listener, app)
        .await
        .context("Server terminated")?;
    Ok(())
}

/// Build the application router with all shared state attached.
pub fn router(store: Store, hub: EventHub, config: &AppConfig) -> Router {
    api::api_router()
        .layer(Extension(store))
        .layer(Extension(hub))
        .layer(Extension(AdminToken::new(&config.admin.token)))
        .layer(Extension(StreamSettings::from(&config.stream)))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

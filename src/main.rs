//! Weathervane — city weather and forecast HTTP API.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! opens the forecast store, wires the geocoding and weather clients
//! into a resolver, and serves the API with graceful shutdown.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use weathervane::api;
use weathervane::api::routes::ApiState;
use weathervane::config::AppConfig;
use weathervane::geocode::NominatimClient;
use weathervane::provider::OpenMeteoClient;
use weathervane::resolver::ForecastResolver;
use weathervane::store::ForecastStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging();

    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        database = %cfg.database.url,
        "weathervane starting up"
    );

    let store = ForecastStore::connect(&cfg.database.url).await?;
    let geocoder = NominatimClient::new(&cfg.geocoding)?;
    let provider = OpenMeteoClient::new(&cfg.provider)?;
    let resolver = ForecastResolver::new(Box::new(geocoder), Box::new(provider), store);

    let app = api::build_router(Arc::new(ApiState { resolver }));

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", cfg.server.host, cfg.server.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("weathervane shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received.");
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("weathervane=info"));

    let json_logging = std::env::var("WEATHERVANE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}

//! RFID Checkpoint Server
//!
//! REST API for the allowlist, scan evaluation and scan history

use anyhow::{Context, Result};
use checkpoint_server::{create_router, AppState, Config, SqliteStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkpoint_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RFID Checkpoint Server");

    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .ensure_directories()
        .context("Failed to create directories")?;

    info!("Database: {}", config.database_path.display());
    info!("Dashboard: {}", config.dashboard_path.display());

    let store = SqliteStore::open(config.database_path.clone())
        .await
        .context("Failed to initialize storage")?;

    let state = AppState::with_store(Arc::new(store), config.dashboard_path.clone());
    let app = create_router(state);

    let listener = TcpListener::bind(&config.api_address())
        .await
        .with_context(|| format!("Failed to bind to {}", config.api_address()))?;

    info!("Checkpoint Server running on http://{}", config.api_address());

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

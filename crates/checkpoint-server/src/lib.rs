//! RFID Checkpoint Server
//!
//! Keeps an allowlist of tag identifiers, evaluates scans sent by the
//! reader at the door, and records every scan in an append-only ledger.
//! There is no authentication; deploy on a trusted network.
//!
//! ## Endpoints
//!
//! - `POST /api/allow` - Add an identifier to the allowlist
//! - `POST /api/scan` - Evaluate and record a scan
//! - `GET /api/recent?limit=N` - Most recent scans (default 10)
//! - `GET /` - Static dashboard
//! - `GET /health` - Health check

pub mod allowlist;
pub mod config;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod storage;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use allowlist::Allowlist;
pub use config::Config;
pub use handlers::AppState;
pub use ledger::ScanLedger;
pub use storage::{MemoryStore, SqliteStore};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(handlers::dashboard_handler))
        .route("/health", get(handlers::health_handler))
        .route("/api/allow", post(handlers::allow_handler))
        .route("/api/scan", post(handlers::scan_handler))
        .route("/api/recent", get(handlers::recent_handler))
        .with_state(shared_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

//! API request handlers for the checkpoint

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use checkpoint_common::{Error, Identifier, ScanRecord};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::{
    allowlist::Allowlist,
    ledger::{ScanLedger, DEFAULT_RECENT_LIMIT},
    models::{AllowResponse, HealthResponse, RecentQuery, ScanResponse, UidRequest},
    storage::{AllowlistRepository, ScanRepository},
};

/// Shared application state
pub struct AppState {
    pub allowlist: Allowlist,
    pub ledger: ScanLedger,
    pub dashboard_path: PathBuf,
}

impl AppState {
    pub fn new(allowlist: Allowlist, ledger: ScanLedger, dashboard_path: PathBuf) -> Self {
        Self {
            allowlist,
            ledger,
            dashboard_path,
        }
    }

    /// Build state where one store backs both the allowlist and the ledger
    pub fn with_store<S>(store: Arc<S>, dashboard_path: PathBuf) -> Self
    where
        S: AllowlistRepository + ScanRepository,
    {
        let allowlist = Allowlist::new(store.clone());
        let ledger = ScanLedger::new(store);
        Self::new(allowlist, ledger, dashboard_path)
    }
}

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });

        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
            Error::AssetNotFound(_) => StatusCode::NOT_FOUND,
            Error::Storage(_) | Error::Io(_) | Error::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!("Request failed: {}", err);
        }

        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

/// Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    let counts = async {
        let allowlisted = state.allowlist.len().await?;
        let scans = state.ledger.len().await?;
        Ok::<_, Error>((allowlisted, scans))
    };

    match counts.await {
        Ok((allowlisted, scans)) => Json(HealthResponse {
            status: "healthy",
            service: "checkpoint-server",
            allowlisted,
            scans,
        })
        .into_response(),
        Err(e) => ApiError {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: format!("Storage unavailable: {}", e),
        }
        .into_response(),
    }
}

/// Decode a `{"uid": ...}` body regardless of the Content-Type header
///
/// Readers do not always send one. Bodies that are not JSON are a 422.
fn parse_uid_body(body: &Bytes) -> Result<UidRequest, ApiError> {
    UidRequest::from_slice(body).map_err(|e| ApiError {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        message: format!("Invalid JSON body: {}", e),
    })
}

/// Add an identifier to the allowlist
pub async fn allow_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AllowResponse>, ApiError> {
    let payload = parse_uid_body(&body)?;
    debug!("Registering identifier: {:?}", payload.uid);

    let stored_uid = state.allowlist.register(&payload.uid).await?;

    Ok(Json(AllowResponse {
        ok: true,
        stored_uid,
    }))
}

/// Evaluate a scan from the reader and record it
///
/// Malformed identifiers are never an error: they evaluate to `ok: false`
/// and are still written to the ledger.
pub async fn scan_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ScanResponse>, ApiError> {
    let payload = parse_uid_body(&body)?;
    let uid = Identifier::normalize(&payload.uid);

    let ok = state.allowlist.is_allowed(&uid).await?;
    state.ledger.record_scan(uid, ok).await?;

    Ok(Json(ScanResponse { ok }))
}

/// List the most recent scans, newest first
pub async fn recent_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<ScanRecord>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let scans = state.ledger.recent_scans(limit).await?;

    Ok(Json(scans))
}

/// Serve the static dashboard document verbatim
pub async fn dashboard_handler(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let path = &state.dashboard_path;

    match tokio::fs::read(path).await {
        Ok(body) => Ok((
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            body,
        )
            .into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Dashboard asset missing: {}", path.display());
            Err(Error::AssetNotFound(path.clone()).into())
        }
        Err(e) => Err(Error::Io(e).into()),
    }
}

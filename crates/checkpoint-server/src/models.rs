//! Request and response bodies for the checkpoint API

use checkpoint_common::Identifier;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `/api/allow` and `/api/scan`
#[derive(Debug, Default, Deserialize)]
pub struct UidRequest {
    /// Raw identifier as sent by the reader; missing means empty
    #[serde(default, deserialize_with = "lenient_uid")]
    pub uid: String,
}

impl UidRequest {
    /// Parse a raw request body
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }
}

/// Accept any JSON value for `uid`; readers are not trusted to send strings
fn lenient_uid<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Response from registration
#[derive(Debug, Serialize)]
pub struct AllowResponse {
    pub ok: bool,
    pub stored_uid: Identifier,
}

/// Response from scan evaluation
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub ok: bool,
}

/// Query for `/api/recent`
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

/// Health check body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub allowlisted: usize,
    pub scans: usize,
}

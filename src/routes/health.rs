//! Health check endpoints
//!
//! - /health, /healthz - liveness probe, always 200 while the process runs
//! - /version          - build information for deployment verification
//!
//! The health body reports MongoDB connectivity so callers can tell a
//! degraded instance apart from a healthy one; in dev mode a missing
//! database does not count against the status.

use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::routes::{full_body, BoxBody};
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// True while the service is running
    pub healthy: bool,
    /// 'online' when the database is reachable, 'degraded' otherwise
    pub status: &'static str,
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
    pub timestamp: String,
    /// Operating mode
    pub mode: String,
    pub node_id: String,
    /// Database connection status
    pub database: DatabaseHealth,
    /// Whether an AI insight key is configured
    pub insight_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn build_health_response(state: &AppState) -> HealthResponse {
    let args = &state.args;

    let db_connected = state.mongo.is_some();

    let status = if db_connected || args.dev_mode {
        "online"
    } else {
        "degraded"
    };

    let error = if !db_connected && !args.dev_mode {
        Some("MongoDB not connected - dashboard reads will be empty".to_string())
    } else if !db_connected && args.dev_mode {
        Some("Dev mode: MongoDB not connected".to_string())
    } else {
        None
    };

    let uptime = state
        .started_at
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0);

    HealthResponse {
        healthy: true,
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime,
        timestamp: chrono::Utc::now().to_rfc3339(),
        mode: if args.dev_mode {
            "development".to_string()
        } else {
            "production".to_string()
        },
        node_id: args.node_id.to_string(),
        database: DatabaseHealth {
            connected: db_connected,
            name: state.mongo.as_ref().map(|m| m.db_name().to_string()),
        },
        insight_enabled: state.insight.has_api_key(),
        error,
    }
}

/// Handle liveness probe (/health, /healthz)
pub fn health_check(state: Arc<AppState>) -> Response<BoxBody> {
    let response = build_health_response(&state);

    let body = serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"healthy":true,"error":"Serialization failed"}"#.to_string());

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(full_body(body))
        .unwrap()
}

/// Version information for deployment verification
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub commit: &'static str,
    pub build_time: &'static str,
    pub service: &'static str,
}

/// Handle version endpoint (/version)
pub fn version_info() -> Response<BoxBody> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
        build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        service: "pulseboard",
    };

    let body = serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"version":"unknown","commit":"unknown"}"#.to_string());

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(full_body(body))
        .unwrap()
}

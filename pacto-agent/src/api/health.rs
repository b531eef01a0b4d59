//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok")
    pub status: String,
    /// Module name ("pacto-agent")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// "openai" or "ollama"
    pub llm_provider: String,
    pub llm_model: String,
    /// "connected" or "disconnected"
    pub mcp_server_status: String,
    pub mcp_server_url: String,
}

/// GET /health
///
/// Reports the agent's own status and whether pacto-mcp answers its health
/// check. The agent stays "ok" while pacto-mcp is down.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let mcp_server_status = if state.mcp.health().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "pacto-agent".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
        llm_provider: state.llm.name().to_string(),
        llm_model: state.llm.model().to_string(),
        mcp_server_status: mcp_server_status.to_string(),
        mcp_server_url: state.mcp.base_url().to_string(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

//! pacto-agent library - free-text contract intake
//!
//! Turns a free-text description of a service contract into a validated
//! record and a rendered contract, using an LLM for extraction and pacto-mcp
//! for validation, rendering and delivery.

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod services;

pub use error::{ApiError, ApiFailure, ApiResult};
use services::{LlmProvider, McpClient};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Configured LLM backend
    pub llm: Arc<LlmProvider>,
    /// pacto-mcp client
    pub mcp: McpClient,
    /// Recipient of contracts sent by email
    pub recipient: String,
    /// Service start, for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(llm: LlmProvider, mcp: McpClient, recipient: impl Into<String>) -> Self {
        Self {
            llm: Arc::new(llm),
            mcp,
            recipient: recipient.into(),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::contract_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

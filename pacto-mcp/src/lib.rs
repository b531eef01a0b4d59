//! pacto-mcp library - contract validation server
//!
//! Validates candidate contract records against the canonical record,
//! renders the service contract and (simulates) its delivery by mail.

use axum::Router;
use chrono::{DateTime, Utc};
use pacto_common::Validator;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod services;

pub use error::{ApiError, ApiResult};
use services::Mailer;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Validator over the canonical record (read-only, shared)
    pub validator: Arc<Validator>,
    /// Simulated mail transport
    pub mailer: Mailer,
    /// Service start, for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(validator: Validator, mailer: Mailer) -> Self {
        Self {
            validator: Arc::new(validator),
            mailer,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::validation_routes())
        .merge(api::document_routes())
        .merge(api::email_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

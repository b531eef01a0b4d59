//! HTTP API handlers for pacto-mcp

pub mod document;
pub mod email;
pub mod health;
pub mod validate;

pub use document::document_routes;
pub use email::email_routes;
pub use health::health_routes;
pub use validate::validation_routes;

use serde_json::Value;

/// Message used when a body carries no data
pub(crate) const NO_DATA: &str = "No data received";

/// True when the body is a non-empty JSON object
pub(crate) fn has_data(body: &Value) -> bool {
    body.as_object().is_some_and(|fields| !fields.is_empty())
}

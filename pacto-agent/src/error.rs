//! Error types for pacto-agent
//!
//! Failed requests answer with the agent's envelope:
//! `{"status": "error", "code", "message", "data"}` (`email_status` in
//! place of `data` on the email endpoint).

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::services::{LlmError, McpError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Body is not declared as JSON (415)
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The LLM could not turn the text into a record (500)
    #[error("Error extracting data from text: {0}")]
    Extraction(#[source] LlmError),

    /// pacto-mcp unreachable (503), too slow (504) or failing (500)
    #[error(transparent)]
    Mcp(#[from] McpError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Mcp(McpError::Connection(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Mcp(McpError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Mcp(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            ApiError::Extraction(_) => "EXTRACTION_ERROR",
            ApiError::Mcp(McpError::Connection(_)) => "MCP_UNAVAILABLE",
            ApiError::Mcp(McpError::Timeout(_)) => "MCP_TIMEOUT",
            ApiError::Mcp(_) => "MCP_ERROR",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(e) => {
                ApiError::UnsupportedMediaType(e.body_text())
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

/// Failed request with whatever the flow had produced so far
#[derive(Debug)]
pub struct ApiFailure {
    pub error: ApiError,
    payload_key: &'static str,
    payload: Value,
}

impl ApiFailure {
    /// Failure carrying `data: null`
    pub fn new(error: ApiError) -> Self {
        Self {
            error,
            payload_key: "data",
            payload: Value::Null,
        }
    }

    /// Failure on the email endpoint, carrying `email_status: null`
    pub fn email(error: ApiError) -> Self {
        Self {
            payload_key: "email_status",
            ..Self::new(error)
        }
    }

    /// Attach the extracted record
    pub fn with_data(mut self, data: Value) -> Self {
        self.payload = data;
        self
    }
}

impl From<ApiError> for ApiFailure {
    fn from(error: ApiError) -> Self {
        ApiFailure::new(error)
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        ApiFailure::new(rejection.into())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let mut body = json!({
            "status": "error",
            "code": self.error.code(),
            "message": self.error.to_string(),
        });
        body[self.payload_key] = self.payload;

        (self.error.status_code(), Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiFailure>;

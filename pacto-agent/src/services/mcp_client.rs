//! pacto-mcp HTTP client
//!
//! Every call carries the configured timeout. Transport failures are
//! classified so the API layer can answer 503 (unreachable) or 504
//! (timeout); any non-2xx answer is a [`McpError::Status`].

use pacto_common::api::{DocumentResponse, EmailRequest, EmailStatus, ValidationResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// MCP client errors
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Could not connect to the MCP server at {0}")]
    Connection(String),

    #[error("Timeout communicating with the MCP server during {0}")]
    Timeout(&'static str),

    #[error("MCP server {operation} failed with HTTP {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected MCP response during {operation}: {message}")]
    Parse {
        operation: &'static str,
        message: String,
    },

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Client for the pacto-mcp endpoints
#[derive(Debug, Clone)]
pub struct McpClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl McpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, McpError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| McpError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /validate_request
    pub async fn validate(&self, candidate: &Value) -> Result<ValidationResponse, McpError> {
        self.post("/validate_request", "validation", candidate).await
    }

    /// POST /generate_document
    pub async fn generate_document(&self, record: &Value) -> Result<DocumentResponse, McpError> {
        self.post("/generate_document", "document generation", record)
            .await
    }

    /// POST /send_email
    pub async fn send_email(&self, request: &EmailRequest) -> Result<EmailStatus, McpError> {
        self.post("/send_email", "email delivery", request).await
    }

    /// True when GET /health answers 2xx
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self
            .http_client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "MCP health check failed");
                false
            }
        }
    }

    async fn post<B, R>(&self, path: &str, operation: &'static str, body: &B) -> Result<R, McpError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, operation, "Calling MCP server");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), operation, "MCP server returned an error");
            return Err(McpError::Status {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| McpError::Parse {
            operation,
            message: e.to_string(),
        })
    }

    fn classify(&self, operation: &'static str, err: reqwest::Error) -> McpError {
        if err.is_timeout() {
            McpError::Timeout(operation)
        } else if err.is_connect() {
            McpError::Connection(self.base_url.clone())
        } else {
            McpError::Client(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = McpClient::new("http://localhost:8081/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8081");
    }

    #[test]
    fn test_error_messages() {
        let err = McpError::Connection("http://localhost:8081".to_string());
        assert_eq!(
            err.to_string(),
            "Could not connect to the MCP server at http://localhost:8081"
        );
        assert_eq!(
            McpError::Timeout("validation").to_string(),
            "Timeout communicating with the MCP server during validation"
        );
    }
}

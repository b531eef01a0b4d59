//! Shared API request/response types
//!
//! Bodies exchanged between pacto-agent and pacto-mcp. pacto-mcp serializes
//! them, pacto-agent deserializes them through its MCP client.

use crate::validation::ValidationResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ========================================
// Validation
// ========================================

/// Response of `POST /validate_request`
///
/// # Examples
///
/// ```
/// use pacto_common::api::types::ValidationResponse;
/// use pacto_common::ValidationResult;
///
/// let response = ValidationResponse::from_result(ValidationResult::default());
/// let json = serde_json::to_value(&response).unwrap();
/// assert!(json["missing_fields"].is_array());
/// assert!(json["message"].is_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    #[serde(flatten)]
    pub result: ValidationResult,

    /// Human-readable summary
    pub message: String,
}

impl ValidationResponse {
    pub fn from_result(result: ValidationResult) -> Self {
        let message = if result.valid {
            "Validation succeeded"
        } else {
            "Errors or missing fields were found"
        };
        Self {
            result,
            message: message.to_string(),
        }
    }
}

// ========================================
// Document generation
// ========================================

/// Response of `POST /generate_document`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResponse {
    /// Rendered contract, empty on error
    pub document: String,

    /// Always "markdown"
    pub format: String,

    /// "success" or "error"
    pub status: String,

    pub message: String,
}

// ========================================
// Email delivery
// ========================================

/// Request body of `POST /send_email`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    /// Contract document to deliver
    #[serde(default)]
    pub document: String,

    /// Recipient address; the server default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,

    /// Signature text replacing the counterparty's signature line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firma: Option<String>,
}

/// Delivery acknowledgment returned by `POST /send_email`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailStatus {
    /// "SENT" or "ERROR"
    pub status: String,

    pub recipient: String,

    pub message: String,

    /// RFC 3339 time of (simulated) delivery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<Uuid>,
}

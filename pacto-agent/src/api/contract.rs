//! Contract intake endpoints
//!
//! Flow 1 (`/process_contract`): extraction, validation, then either a
//! follow-up question or the rendered contract.
//! Flow 2 (`/send_contract_email`): signed delivery of a rendered contract.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use pacto_common::api::{EmailRequest, EmailStatus, ValidationResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{ApiError, ApiFailure, ApiResult, AppState};

/// Request body of `POST /send_contract_email`
#[derive(Debug, Deserialize)]
pub struct SendContractEmailRequest {
    #[serde(default)]
    pub document: String,
    #[serde(default)]
    pub firma: Option<String>,
}

/// Outcome of `POST /process_contract`
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessContractResponse {
    /// Record valid, contract rendered
    Success {
        message: String,
        data: Value,
        document: String,
    },
    /// Record incomplete or wrong; `question` asks the user for more text
    ValidationError {
        message: String,
        data: Value,
        validation_result: ValidationResponse,
        question: String,
    },
}

/// Response of `POST /send_contract_email`
#[derive(Debug, Serialize)]
pub struct SendContractEmailResponse {
    pub status: String,
    pub message: String,
    pub email_status: EmailStatus,
}

/// POST /process_contract
///
/// **Request body:** `{"text": "..."}`
///
/// # Response
/// - 200 `status: "success"` with the rendered `document`
/// - 200 `status: "validation_error"` with `validation_result` and `question`
/// - 400 missing or blank text
/// - 500 extraction failure or pacto-mcp error
/// - 503/504 pacto-mcp unreachable / timed out
pub async fn process_contract(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ProcessContractResponse>> {
    let Json(body) = payload?;

    let text = match body.get("text") {
        None | Some(Value::Null) => {
            return Err(ApiError::BadRequest("No contract text provided".to_string()).into())
        }
        Some(Value::String(text)) => text.trim(),
        Some(_) => {
            return Err(ApiError::BadRequest("Field 'text' must be a string".to_string()).into())
        }
    };
    if text.is_empty() {
        return Err(ApiError::BadRequest("Contract text is empty".to_string()).into());
    }

    // Step 1: extraction
    info!(chars = text.chars().count(), provider = state.llm.name(), "Extracting contract data");
    let data = state.llm.extract_contract_data(text).await.map_err(|e| {
        error!(error = %e, "Contract data extraction failed");
        ApiFailure::new(ApiError::Extraction(e))
    })?;

    // Step 2: validation
    let validation = state
        .mcp
        .validate(&data)
        .await
        .map_err(|e| ApiFailure::new(e.into()).with_data(data.clone()))?;

    // Step 3: ask for more information
    if !validation.result.valid {
        info!(
            errors = validation.result.errors.len(),
            missing = validation.result.missing_fields.len(),
            "Validation failed, generating question"
        );
        let question = state
            .llm
            .generate_question(&validation.result.missing_fields, &validation.result.errors)
            .await;

        return Ok(Json(ProcessContractResponse::ValidationError {
            message: "The information provided is incomplete or incorrect".to_string(),
            data,
            validation_result: validation,
            question,
        }));
    }

    // Step 4: render the contract
    let document = state
        .mcp
        .generate_document(&data)
        .await
        .map_err(|e| ApiFailure::new(e.into()).with_data(data.clone()))?;
    info!("Contract generated");

    Ok(Json(ProcessContractResponse::Success {
        message: "Contract processed and generated successfully".to_string(),
        data,
        document: document.document,
    }))
}

/// POST /send_contract_email
///
/// **Request body:** `{"document": "...", "firma": "..."}` (`firma` optional)
///
/// Forwards the document to pacto-mcp for delivery to the configured
/// recipient.
pub async fn send_contract_email(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SendContractEmailResponse>, ApiFailure> {
    let Json(body) = payload.map_err(|e| ApiFailure::email(e.into()))?;

    if body.as_object().map_or(true, |fields| fields.is_empty()) {
        return Err(ApiFailure::email(ApiError::BadRequest(
            "No data received".to_string(),
        )));
    }

    let request: SendContractEmailRequest = serde_json::from_value(body).map_err(|e| {
        ApiFailure::email(ApiError::BadRequest(format!("Malformed request: {}", e)))
    })?;

    let document = request.document.trim();
    if document.is_empty() {
        return Err(ApiFailure::email(ApiError::BadRequest(
            "No contract document provided".to_string(),
        )));
    }

    let firma = request.firma.filter(|f| !f.trim().is_empty());
    if firma.is_none() {
        warn!("Sending contract without signature");
    }

    let email_request = EmailRequest {
        document: document.to_string(),
        recipient: Some(state.recipient.clone()),
        firma,
    };
    let email_status = state
        .mcp
        .send_email(&email_request)
        .await
        .map_err(|e| ApiFailure::email(e.into()))?;
    info!(recipient = %email_status.recipient, "Contract sent by email");

    Ok(Json(SendContractEmailResponse {
        status: "success".to_string(),
        message: "Contract sent by email successfully".to_string(),
        email_status,
    }))
}

/// Build contract routes
pub fn contract_routes() -> Router<AppState> {
    Router::new()
        .route("/process_contract", post(process_contract))
        .route("/send_contract_email", post(send_contract_email))
}

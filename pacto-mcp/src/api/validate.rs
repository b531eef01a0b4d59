//! Candidate record validation endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use pacto_common::api::ValidationResponse;
use pacto_common::ValidationResult;
use serde_json::Value;
use tracing::{info, warn};

use super::{has_data, NO_DATA};
use crate::{ApiResult, AppState};

/// POST /validate_request
///
/// Validates a candidate record against the canonical record.
///
/// # Response
/// - 200: `{valid, errors, missing_fields, message}`; `valid == false` is
///   still a 200, the lists say what is wrong
/// - 400: body is not a non-empty JSON object
pub async fn validate_request(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ValidationResponse>)> {
    let Json(candidate) = payload?;

    if !has_data(&candidate) {
        warn!("Validation request without data");
        let response = ValidationResponse {
            result: ValidationResult {
                valid: false,
                errors: vec![NO_DATA.to_string()],
                missing_fields: Vec::new(),
            },
            message: "Empty input data".to_string(),
        };
        return Ok((StatusCode::BAD_REQUEST, Json(response)));
    }

    let result = state.validator.validate(&candidate);
    info!(
        valid = result.valid,
        errors = result.errors.len(),
        missing = result.missing_fields.len(),
        "Validated candidate record"
    );

    Ok((StatusCode::OK, Json(ValidationResponse::from_result(result))))
}

/// Build validation routes
pub fn validation_routes() -> Router<AppState> {
    Router::new().route("/validate_request", post(validate_request))
}

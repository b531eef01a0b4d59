//! Contract delivery endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use pacto_common::api::{EmailRequest, EmailStatus};
use serde_json::Value;
use tracing::{debug, warn};

use super::{has_data, NO_DATA};
use crate::services::apply_signature;
use crate::{ApiError, ApiResult, AppState};

fn rejected(recipient: String, message: &str) -> (StatusCode, Json<EmailStatus>) {
    (
        StatusCode::BAD_REQUEST,
        Json(EmailStatus {
            status: "ERROR".to_string(),
            recipient,
            message: message.to_string(),
            timestamp: None,
            message_id: None,
        }),
    )
}

/// POST /send_email
///
/// **Request body:** `{document, recipient?, firma?}`
///
/// The configured default recipient applies when `recipient` is absent.
/// A `firma` replaces the counterparty's signature line before delivery.
pub async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EmailStatus>)> {
    let Json(body) = payload?;

    if !has_data(&body) {
        warn!("Email request without data");
        return Ok(rejected(String::new(), NO_DATA));
    }

    let request: EmailRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed email request: {}", e)))?;
    let recipient = state.mailer.recipient_for(request.recipient.as_deref());

    if request.document.trim().is_empty() {
        warn!(recipient = %recipient, "Email request without document");
        return Ok(rejected(recipient, "No document provided to send"));
    }

    let document = match request.firma.as_deref().filter(|f| !f.trim().is_empty()) {
        Some(firma) => {
            debug!("Applying counterparty signature");
            apply_signature(&request.document, firma)
        }
        None => request.document,
    };

    Ok((StatusCode::OK, Json(state.mailer.deliver(&recipient, &document))))
}

/// Build email routes
pub fn email_routes() -> Router<AppState> {
    Router::new().route("/send_email", post(send_email))
}

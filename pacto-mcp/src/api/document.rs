//! Contract document generation endpoint

use axum::{
    extract::rejection::JsonRejection, http::StatusCode, routing::post, Json, Router,
};
use chrono::Local;
use pacto_common::api::DocumentResponse;
use serde_json::Value;
use tracing::{info, warn};

use super::{has_data, NO_DATA};
use crate::services::render_contract;
use crate::{ApiResult, AppState};

const FORMAT: &str = "markdown";

/// POST /generate_document
///
/// Renders the service contract for the posted record. Fields the record
/// lacks render as `N/A`; the record is not validated here.
pub async fn generate_document(
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DocumentResponse>)> {
    let Json(record) = payload?;

    if !has_data(&record) {
        warn!("Document request without data");
        let response = DocumentResponse {
            document: String::new(),
            format: FORMAT.to_string(),
            status: "error".to_string(),
            message: NO_DATA.to_string(),
        };
        return Ok((StatusCode::BAD_REQUEST, Json(response)));
    }

    let document = render_contract(&record, Local::now().date_naive());
    info!(bytes = document.len(), "Contract document generated");

    Ok((
        StatusCode::OK,
        Json(DocumentResponse {
            document,
            format: FORMAT.to_string(),
            status: "success".to_string(),
            message: "Contract generated successfully".to_string(),
        }),
    ))
}

/// Build document routes
pub fn document_routes() -> Router<AppState> {
    Router::new().route("/generate_document", post(generate_document))
}

//! Integration tests for pacto-mcp API endpoints
//!
//! Tests cover:
//! - Validation of matching, mismatching and empty candidate records
//! - Contract document generation
//! - Simulated delivery with signature replacement
//! - Health endpoint

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use pacto_common::{CanonicalRecord, Validator};
use pacto_mcp::services::Mailer;
use pacto_mcp::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: app over the official record
fn setup_app() -> axum::Router {
    let state = AppState::new(
        Validator::new(CanonicalRecord::official()),
        Mailer::new("contratos@example.com"),
    );
    build_router(state)
}

/// Test helper: JSON POST request
fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = body.collect().await.expect("Should read body").to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_validate_official_record() {
    let app = setup_app();
    let candidate = CanonicalRecord::official().to_json();

    let response = app
        .oneshot(post_json("/validate_request", &candidate))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["errors"], json!([]));
    assert_eq!(body["missing_fields"], json!([]));
    assert_eq!(body["message"], "Validation succeeded");
}

#[tokio::test]
async fn test_validate_reports_mismatch_and_missing() {
    let app = setup_app();
    let mut candidate = CanonicalRecord::official().to_json();
    candidate["contract"]["valor"] = json!(5200);
    candidate["provider"]
        .as_object_mut()
        .unwrap()
        .remove("telefono");

    let response = app
        .oneshot(post_json("/validate_request", &candidate))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["valid"], false);
    assert_eq!(
        body["errors"],
        json!(["Field 'valor' does not match. Expected: '4800', Received: '5200'"])
    );
    assert_eq!(body["missing_fields"], json!(["provider.telefono"]));
    assert_eq!(body["message"], "Errors or missing fields were found");
}

#[tokio::test]
async fn test_validate_legacy_section_keys() {
    let app = setup_app();
    let official = CanonicalRecord::official().to_json();
    let candidate = json!({
        "proveedor": official["provider"],
        "contrato": official["contract"],
        "contratante": official["counterparty"],
    });

    let response = app
        .oneshot(post_json("/validate_request", &candidate))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn test_validate_empty_body_rejected() {
    for candidate in [json!({}), json!([1, 2]), json!(null)] {
        let response = setup_app()
            .oneshot(post_json("/validate_request", &candidate))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = extract_json(response.into_body()).await;
        assert_eq!(body["valid"], false);
        assert_eq!(body["errors"], json!(["No data received"]));
    }
}

#[tokio::test]
async fn test_validate_malformed_json_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/validate_request")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"provider\": "))
        .unwrap();

    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// =============================================================================
// Document generation
// =============================================================================

#[tokio::test]
async fn test_generate_document() {
    let record = CanonicalRecord::official().to_json();

    let response = setup_app()
        .oneshot(post_json("/generate_document", &record))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["format"], "markdown");
    let document = body["document"].as_str().unwrap();
    assert!(document.contains("**Valor Total:** USD 4,800.00"));
    assert!(document.contains("Laura Sofía Martínez Gómez"));
}

#[tokio::test]
async fn test_generate_document_without_data() {
    let response = setup_app()
        .oneshot(post_json("/generate_document", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["document"], "");
}

// =============================================================================
// Email delivery
// =============================================================================

#[tokio::test]
async fn test_send_email_default_recipient() {
    let response = setup_app()
        .oneshot(post_json("/send_email", &json!({"document": "# Contrato"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "SENT");
    assert_eq!(body["recipient"], "contratos@example.com");
    assert!(body["timestamp"].is_string());
    assert!(body["message_id"].is_string());
}

#[tokio::test]
async fn test_send_email_with_signature_and_recipient() {
    let document = pacto_mcp::services::render_contract(
        &CanonicalRecord::official().to_json(),
        chrono::NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
    );
    let request = json!({
        "document": document,
        "recipient": "legal@technova.co",
        "firma": "/firmado/ Carlos Eduardo Rincón",
    });

    let response = setup_app()
        .oneshot(post_json("/send_email", &request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "SENT");
    assert_eq!(body["recipient"], "legal@technova.co");
}

#[tokio::test]
async fn test_send_email_without_document() {
    let response = setup_app()
        .oneshot(post_json(
            "/send_email",
            &json!({"document": "  ", "recipient": "ana@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["recipient"], "ana@example.com");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "pacto-mcp");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_u64());
}

//! Fake LLM backends and a real pacto-mcp, served on ephemeral ports

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pacto_common::{CanonicalRecord, Validator};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Requests received by a fake, as (path, body)
pub type RecordedRequests = Arc<Mutex<Vec<(String, Value)>>>;

/// Serve `router` on 127.0.0.1 and return its base URL
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Real pacto-mcp over the official record
pub async fn spawn_mcp() -> String {
    let state = pacto_mcp::AppState::new(
        Validator::new(CanonicalRecord::official()),
        pacto_mcp::services::Mailer::new("contratos@example.com"),
    );
    spawn(pacto_mcp::build_router(state)).await
}

/// URL on which nothing listens
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

// =============================================================================
// Ollama
// =============================================================================

/// Fake Ollama server
///
/// JSON-format requests get `extraction`; other requests get `question`,
/// or HTTP 500 when it is `None`.
#[derive(Clone)]
pub struct FakeOllama {
    pub extraction: String,
    pub question: Option<String>,
    /// When false, /api/generate answers 404 and only /api/chat works
    pub generate_available: bool,
    pub requests: RecordedRequests,
}

impl FakeOllama {
    pub fn new(extraction: impl Into<String>, question: Option<&str>) -> Self {
        Self {
            extraction: extraction.into(),
            question: question.map(str::to_string),
            generate_available: true,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn chat_only(mut self) -> Self {
        self.generate_available = false;
        self
    }

    pub async fn spawn(&self) -> String {
        let router = Router::new()
            .route("/api/generate", post(ollama_generate))
            .route("/api/chat", post(ollama_chat))
            .route("/api/tags", get(|| async { Json(json!({"models": []})) }))
            .with_state(self.clone());
        spawn(router).await
    }

    fn reply_for(&self, body: &Value) -> Option<String> {
        if body["format"] == "json" {
            Some(self.extraction.clone())
        } else {
            self.question.clone()
        }
    }

    fn record(&self, path: &str, body: &Value) {
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), body.clone()));
    }
}

async fn ollama_generate(State(fake): State<FakeOllama>, Json(body): Json<Value>) -> Response {
    fake.record("/api/generate", &body);
    if !fake.generate_available {
        return (StatusCode::NOT_FOUND, "model does not support generate").into_response();
    }
    match fake.reply_for(&body) {
        Some(reply) => Json(json!({"model": body["model"], "response": reply, "done": true}))
            .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "model crashed").into_response(),
    }
}

async fn ollama_chat(State(fake): State<FakeOllama>, Json(body): Json<Value>) -> Response {
    fake.record("/api/chat", &body);
    match fake.reply_for(&body) {
        Some(reply) => Json(json!({
            "model": body["model"],
            "message": {"role": "assistant", "content": reply},
            "done": true
        }))
        .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "model crashed").into_response(),
    }
}

// =============================================================================
// OpenAI
// =============================================================================

/// Fake OpenAI chat completions endpoint under `/v1`
#[derive(Clone)]
pub struct FakeOpenAi {
    pub api_key: String,
    pub reply: String,
    pub requests: RecordedRequests,
}

impl FakeOpenAi {
    pub fn new(api_key: &str, reply: impl Into<String>) -> Self {
        Self {
            api_key: api_key.to_string(),
            reply: reply.into(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn spawn(&self) -> String {
        let router = Router::new()
            .route("/v1/chat/completions", post(openai_completions))
            .with_state(self.clone());
        format!("{}/v1", spawn(router).await)
    }
}

async fn openai_completions(
    State(fake): State<FakeOpenAi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let expected = format!("Bearer {}", fake.api_key);
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Incorrect API key provided"}})),
        )
            .into_response();
    }

    fake.requests
        .lock()
        .unwrap()
        .push(("/v1/chat/completions".to_string(), body));

    Json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": fake.reply},
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}

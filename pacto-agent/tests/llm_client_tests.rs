//! Integration tests for the LLM backends
//!
//! Tests cover:
//! - Ollama /api/generate request shape and /api/chat fallback
//! - OpenAI chat completions request shape and authentication
//! - Error classification for unreachable backends

mod helpers;

use helpers::{closed_port_url, FakeOllama, FakeOpenAi};
use pacto_agent::services::llm::{ChatMessage, OllamaClient};
use pacto_agent::services::{LlmError, LlmProvider};
use pacto_common::config::{LlmConfig, LlmProviderKind};
use serde_json::json;

fn ollama_config(url: &str) -> LlmConfig {
    LlmConfig {
        provider: LlmProviderKind::Ollama,
        ollama_api_url: url.to_string(),
        ollama_model: "llama3".to_string(),
        request_timeout_secs: 5,
        ..LlmConfig::default()
    }
}

fn openai_config(url: &str, key: &str) -> LlmConfig {
    LlmConfig {
        provider: LlmProviderKind::OpenAi,
        openai_api_key: Some(key.to_string()),
        openai_api_url: url.to_string(),
        request_timeout_secs: 5,
        ..LlmConfig::default()
    }
}

// =============================================================================
// Ollama
// =============================================================================

#[tokio::test]
async fn test_ollama_generate_request_shape() {
    let fake = FakeOllama::new("{\"provider\": {}}", Some("¿Algo más?"));
    let client = OllamaClient::new(&ollama_config(&fake.spawn().await)).unwrap();

    let messages = vec![ChatMessage::system("reglas"), ChatMessage::user("texto")];
    let reply = client.complete(&messages, 0.1, true).await.unwrap();
    assert_eq!(reply, "{\"provider\": {}}");

    let requests = fake.requests.lock().unwrap();
    let (path, body) = &requests[0];
    assert_eq!(path, "/api/generate");
    assert_eq!(body["model"], "llama3");
    assert_eq!(body["prompt"], "System: reglas\n\nUser: texto");
    assert_eq!(body["stream"], false);
    assert_eq!(body["format"], "json");
    assert!((body["options"]["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
}

#[tokio::test]
async fn test_ollama_falls_back_to_chat() {
    let fake = FakeOllama::new("{}", Some("¿Podrías ampliar la descripción?")).chat_only();
    let client = OllamaClient::new(&ollama_config(&fake.spawn().await)).unwrap();

    let reply = client
        .complete(&[ChatMessage::user("hola")], 0.7, false)
        .await
        .unwrap();
    assert_eq!(reply, "¿Podrías ampliar la descripción?");

    let requests = fake.requests.lock().unwrap();
    let paths: Vec<&str> = requests.iter().map(|(path, _)| path.as_str()).collect();
    assert_eq!(paths, vec!["/api/generate", "/api/chat"]);
    assert_eq!(requests[1].1["messages"], json!([{"role": "user", "content": "hola"}]));
    assert!(requests[1].1.get("format").is_none());
}

#[tokio::test]
async fn test_ollama_reports_generate_status_when_both_fail() {
    let fake = FakeOllama::new("{}", None).chat_only();
    let client = OllamaClient::new(&ollama_config(&fake.spawn().await)).unwrap();

    let err = client
        .complete(&[ChatMessage::user("hola")], 0.7, false)
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_ollama_probe() {
    let fake = FakeOllama::new("{}", None);
    let up = OllamaClient::new(&ollama_config(&fake.spawn().await)).unwrap();
    assert!(up.probe().await);

    let down = OllamaClient::new(&ollama_config(&closed_port_url().await)).unwrap();
    assert!(!down.probe().await);
}

#[tokio::test]
async fn test_unreachable_ollama_is_connection_error() {
    let provider = LlmProvider::from_config(&ollama_config(&closed_port_url().await)).unwrap();

    let err = provider.extract_contract_data("texto").await.unwrap_err();
    assert!(matches!(err, LlmError::Connection { provider: "ollama", .. }));
}

// =============================================================================
// OpenAI
// =============================================================================

#[tokio::test]
async fn test_openai_extraction() {
    let reply = json!({
        "provider": {"nombre": "Laura"},
        "contract": {"valor": "4,800"}
    });
    let fake = FakeOpenAi::new("sk-test", reply.to_string());
    let provider = LlmProvider::from_config(&openai_config(&fake.spawn().await, "sk-test")).unwrap();
    assert_eq!(provider.name(), "openai");

    let record = provider.extract_contract_data("Contrato con Laura").await.unwrap();
    assert_eq!(record["provider"]["nombre"], "Laura");
    assert_eq!(record["contract"]["valor"].as_f64(), Some(4800.0));

    let requests = fake.requests.lock().unwrap();
    let body = &requests[0].1;
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["response_format"], json!({"type": "json_object"}));
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("Contrato con Laura"));
}

#[tokio::test]
async fn test_openai_question_without_json_format() {
    let fake = FakeOpenAi::new("sk-test", "  ¿Cuál es el valor del contrato?  ");
    let provider = LlmProvider::from_config(&openai_config(&fake.spawn().await, "sk-test")).unwrap();

    let question = provider
        .generate_question(&["contract.valor".to_string()], &[])
        .await;
    assert_eq!(question, "¿Cuál es el valor del contrato?");

    let requests = fake.requests.lock().unwrap();
    assert!(requests[0].1.get("response_format").is_none());
}

#[tokio::test]
async fn test_openai_bad_key_is_status_error() {
    let fake = FakeOpenAi::new("sk-right", "{}");
    let provider = LlmProvider::from_config(&openai_config(&fake.spawn().await, "sk-wrong")).unwrap();

    let err = provider.extract_contract_data("texto").await.unwrap_err();
    assert!(matches!(err, LlmError::Status { provider: "openai", status: 401, .. }));

    let question = provider
        .generate_question(&["contract.valor".to_string()], &[])
        .await;
    assert!(question.ends_with("proporciona: contract.valor."));
}

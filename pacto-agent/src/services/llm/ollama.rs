//! Ollama client
//!
//! Completions go to `/api/generate` with the chat flattened into a single
//! prompt. Servers or models that refuse it (non-200) get the same request
//! on `/api/chat`.

use pacto_common::config::LlmConfig;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use super::prompts::flatten;
use super::{ChatMessage, LlmError};

const PROVIDER: &str = "ollama";
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatReply>,
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Ollama API client
pub struct OllamaClient {
    http_client: reqwest::Client,
    api_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            api_url: config.ollama_api_url.trim_end_matches('/').to_string(),
            model: config.ollama_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Check that the server answers `/api/tags`
    pub async fn probe(&self) -> bool {
        let url = format!("{}/api/tags", self.api_url);
        match self
            .http_client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(status = %response.status(), url = %url, "Ollama probe failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, url = %url, "Cannot reach Ollama, is it running?");
                false
            }
        }
    }

    /// One completion; `json` asks the model for JSON output
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        json: bool,
    ) -> Result<String, LlmError> {
        let options = json!({ "temperature": temperature });
        let format = json.then_some("json");

        let generate_url = format!("{}/api/generate", self.api_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt: flatten(messages),
            stream: false,
            options: options.clone(),
            format,
        };

        tracing::debug!(model = %self.model, json, "Requesting Ollama generate");
        let response = self
            .http_client
            .post(&generate_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(PROVIDER, &self.api_url, e))?;

        if response.status().is_success() {
            let reply: GenerateResponse = response
                .json()
                .await
                .map_err(|e| LlmError::Parse(e.to_string()))?;
            return reply
                .response
                .ok_or_else(|| LlmError::Parse("Ollama generate reply has no 'response'".to_string()));
        }

        let generate_status = response.status();
        let generate_body = response.text().await.unwrap_or_default();
        tracing::debug!(
            status = %generate_status,
            "Ollama generate refused, retrying on /api/chat"
        );

        let chat_url = format!("{}/api/chat", self.api_url);
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options,
            format,
        };
        let response = self
            .http_client
            .post(&chat_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(PROVIDER, &self.api_url, e))?;

        if !response.status().is_success() {
            return Err(LlmError::Status {
                provider: PROVIDER,
                status: generate_status.as_u16(),
                body: generate_body,
            });
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;
        reply
            .message
            .and_then(|message| message.content)
            .or(reply.response)
            .ok_or_else(|| LlmError::Parse("Ollama chat reply has no content".to_string()))
    }
}

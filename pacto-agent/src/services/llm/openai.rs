//! OpenAI chat completions client

use pacto_common::config::LlmConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ChatMessage, LlmError};

const PROVIDER: &str = "openai";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// OpenAI API client
pub struct OpenAiClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .openai_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::Config("OPENAI_API_KEY is not set".to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!(
                "{}/chat/completions",
                config.openai_api_url.trim_end_matches('/')
            ),
            api_key,
            model: config.openai_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One chat completion; `json` requests a JSON object response
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        json: bool,
    ) -> Result<String, LlmError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature,
            response_format: json.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        tracing::debug!(model = %self.model, json, "Requesting OpenAI chat completion");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(PROVIDER, &self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Parse("OpenAI response has no message content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_rejected() {
        let config = LlmConfig::default();
        assert!(matches!(OpenAiClient::new(&config), Err(LlmError::Config(_))));

        let config = LlmConfig {
            openai_api_key: Some(" ".to_string()),
            ..LlmConfig::default()
        };
        assert!(OpenAiClient::new(&config).is_err());
    }

    #[test]
    fn test_endpoint_from_base_url() {
        let config = LlmConfig {
            openai_api_key: Some("sk-test".to_string()),
            openai_api_url: "http://localhost:9999/v1/".to_string(),
            ..LlmConfig::default()
        };
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.endpoint, "http://localhost:9999/v1/chat/completions");
        assert_eq!(client.model(), "gpt-4o-mini");
    }
}

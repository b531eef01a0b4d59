//! LLM backends
//!
//! The agent talks to one of two backends, chosen at startup from `[llm]
//! provider`. Both offer the same two operations:
//!
//! - [`LlmProvider::extract_contract_data`]: free text to candidate record
//! - [`LlmProvider::generate_question`]: validation findings to a follow-up
//!   question, never failing (a templated question is the fallback)

pub mod ollama;
pub mod openai;
pub mod parse;
pub mod prompts;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use pacto_common::config::{LlmConfig, LlmProviderKind};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::question::fallback_question;

const EXTRACTION_TEMPERATURE: f32 = 0.1;
const QUESTION_TEMPERATURE: f32 = 0.7;

/// LLM client errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Cannot connect to {provider} at {url}")]
    Connection { provider: &'static str, url: String },

    #[error("Timeout waiting for {0}")]
    Timeout(&'static str),

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected model response: {0}")]
    Parse(String),

    #[error("LLM configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl LlmError {
    /// Classify a transport error from `provider` at `url`
    pub(crate) fn from_reqwest(provider: &'static str, url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(provider)
        } else if err.is_connect() {
            LlmError::Connection {
                provider,
                url: url.to_string(),
            }
        } else {
            LlmError::Client(err.to_string())
        }
    }
}

/// Chat message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl Role {
    /// Label used when messages are flattened into one prompt
    pub fn label(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "User",
        }
    }
}

/// One chat message, serialized as `{role, content}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Configured LLM backend
pub enum LlmProvider {
    OpenAi(OpenAiClient),
    Ollama(OllamaClient),
}

impl LlmProvider {
    /// Build the backend selected by `config.provider`
    ///
    /// Fails when OpenAI is selected without an API key.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let provider = match config.provider {
            LlmProviderKind::OpenAi => LlmProvider::OpenAi(OpenAiClient::new(config)?),
            LlmProviderKind::Ollama => LlmProvider::Ollama(OllamaClient::new(config)?),
        };
        info!(provider = provider.name(), model = provider.model(), "LLM provider initialized");
        Ok(provider)
    }

    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi(_) => LlmProviderKind::OpenAi.as_str(),
            LlmProvider::Ollama(_) => LlmProviderKind::Ollama.as_str(),
        }
    }

    pub fn model(&self) -> &str {
        match self {
            LlmProvider::OpenAi(client) => client.model(),
            LlmProvider::Ollama(client) => client.model(),
        }
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        json: bool,
    ) -> Result<String, LlmError> {
        match self {
            LlmProvider::OpenAi(client) => client.chat(messages, temperature, json).await,
            LlmProvider::Ollama(client) => client.complete(messages, temperature, json).await,
        }
    }

    /// Extract a candidate contract record from free text
    ///
    /// The reply must contain a JSON object; a textual `contract.valor` is
    /// coerced to a number.
    pub async fn extract_contract_data(&self, text: &str) -> Result<Value, LlmError> {
        let messages = prompts::extraction_messages(text);
        let reply = self
            .complete(&messages, EXTRACTION_TEMPERATURE, true)
            .await?;
        debug!(chars = reply.len(), "Extraction reply received");

        let mut record = parse::parse_json_reply(&reply)?;
        if !record.is_object() {
            return Err(LlmError::Parse(format!(
                "Expected a JSON object, got: {}",
                record
            )));
        }
        parse::coerce_contract_amount(&mut record);
        Ok(record)
    }

    /// Ask the model for a question covering the validation findings
    ///
    /// Any backend failure, or an empty answer, yields the templated
    /// fallback question instead.
    pub async fn generate_question(&self, missing_fields: &[String], errors: &[String]) -> String {
        let messages = prompts::question_messages(missing_fields, errors);

        match self.complete(&messages, QUESTION_TEMPERATURE, false).await {
            Ok(reply) => {
                let question = parse::clean_question(&reply);
                if question.is_empty() {
                    warn!("Model returned an empty question, using fallback");
                    fallback_question(missing_fields)
                } else {
                    question
                }
            }
            Err(e) => {
                warn!(error = %e, "Question generation failed, using fallback");
                fallback_question(missing_fields)
            }
        }
    }
}

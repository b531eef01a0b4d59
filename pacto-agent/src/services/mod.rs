//! Backends used by the agent: the LLM and pacto-mcp

pub mod llm;
pub mod mcp_client;
pub mod question;

pub use llm::{LlmError, LlmProvider};
pub use mcp_client::{McpClient, McpError};
pub use question::fallback_question;

//! Bootstrap configuration for the pacto services
//!
//! Both binaries read the same TOML file; each uses the sections it needs.
//!
//! # Config file resolution (first match wins)
//!
//! 1. `--config` command-line argument
//! 2. `PACTO_CONFIG` environment variable
//! 3. `~/.config/pacto/pacto.toml` (platform config directory)
//! 4. `/etc/pacto/pacto.toml`
//! 5. Compiled defaults (no file)
//!
//! Explicitly named files (1, 2) must exist. A missing file at 3 or 4 is
//! not an error.
//!
//! # Environment overrides
//!
//! Applied on top of the file: `LLM_PROVIDER`, `OPENAI_API_KEY`,
//! `OPENAI_MODEL`, `OLLAMA_API_URL`, `OLLAMA_MODEL`, `MCP_SERVER_URL`.

use crate::record::CanonicalRecord;
use crate::validation::MissingValuePolicy;
use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "PACTO_CONFIG";

const CONFIG_FILE_NAME: &str = "pacto.toml";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub mcp: McpConfig,
    pub agent: AgentConfig,
    pub llm: LlmConfig,
    pub mail: MailConfig,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

/// Validation server (pacto-mcp) settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct McpConfig {
    pub host: String,
    /// Default: 8081
    pub port: u16,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8081,
        }
    }
}

/// Intake agent (pacto-agent) settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub host: String,
    /// Default: 8082
    pub port: u16,
    /// Base URL of pacto-mcp
    pub mcp_server_url: String,
    /// Timeout for each call to pacto-mcp
    pub mcp_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8082,
            mcp_server_url: "http://localhost:8081".to_string(),
            mcp_timeout_secs: 10,
        }
    }
}

/// Supported LLM backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum LlmProviderKind {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "ollama")]
    Ollama,
}

impl LlmProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProviderKind::OpenAi => "openai",
            LlmProviderKind::Ollama => "ollama",
        }
    }
}

impl fmt::Display for LlmProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LlmProviderKind::OpenAi),
            "ollama" => Ok(LlmProviderKind::Ollama),
            other => Err(Error::InvalidInput(format!(
                "Unsupported LLM provider: {}. Options: 'openai' or 'ollama'",
                other
            ))),
        }
    }
}

/// LLM backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    /// Required when provider = "openai"
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_api_url: String,
    pub ollama_api_url: String,
    pub ollama_model: String,
    /// Timeout for a single completion request
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::default(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_api_url: "https://api.openai.com/v1".to_string(),
            ollama_api_url: "http://localhost:11434".to_string(),
            ollama_model: "mistral".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Simulated mail delivery settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Recipient used when a request names none
    pub default_recipient: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            default_recipient: "contratos@example.com".to_string(),
        }
    }
}

/// Validation engine settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub missing_policy: MissingValuePolicy,
    /// TOML file with the canonical record; built-in official data if unset
    pub canonical_record: Option<PathBuf>,
}

impl ValidationConfig {
    /// Canonical record selected by this configuration
    pub fn canonical_record(&self) -> Result<CanonicalRecord> {
        match &self.canonical_record {
            Some(path) => CanonicalRecord::load(path),
            None => Ok(CanonicalRecord::official()),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Resolve, load and apply environment overrides
    ///
    /// Returns the configuration and the file it came from (`None` when
    /// running on compiled defaults).
    pub fn resolve(cli_arg: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let source = resolve_config_path(cli_arg);
        let mut config = match &source {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok((config, source))
    }

    /// Apply overrides from a variable lookup (normally the process
    /// environment). Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = get("LLM_PROVIDER") {
            self.llm.provider = provider.parse()?;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.llm.openai_api_key = Some(key);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.llm.openai_model = model;
        }
        if let Some(url) = get("OLLAMA_API_URL") {
            self.llm.ollama_api_url = url;
        }
        if let Some(model) = get("OLLAMA_MODEL") {
            self.llm.ollama_model = model;
        }
        if let Some(url) = get("MCP_SERVER_URL") {
            self.agent.mcp_server_url = url;
        }
        Ok(())
    }
}

/// Locate the config file per the resolution order above
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3/4: user then system config file
    let user_config = dirs::config_dir().map(|d| d.join("pacto").join(CONFIG_FILE_NAME));
    let system_config = PathBuf::from("/etc/pacto").join(CONFIG_FILE_NAME);

    user_config
        .into_iter()
        .chain(std::iter::once(system_config))
        .find(|path| path.exists())
}

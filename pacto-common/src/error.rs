//! Common error types for pacto

use thiserror::Error;

/// Common result type for pacto operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across pacto services
///
/// Validation outcomes are never reported through this type: missing and
/// mismatching fields are data in a `ValidationResult`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML document could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

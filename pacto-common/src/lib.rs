//! # Pacto Common Library
//!
//! Shared code for the pacto services including:
//! - Canonical contract record and its field schema
//! - Field normalization, comparison and record validation
//! - API request/response types exchanged between pacto-mcp and pacto-agent
//! - Configuration loading

pub mod api;
pub mod config;
pub mod error;
pub mod record;
pub mod validation;

pub use error::{Error, Result};
pub use record::{CanonicalRecord, CanonicalValue, FieldSpec, FieldType, SectionName};
pub use validation::{MissingValuePolicy, ValidationResult, Validator};

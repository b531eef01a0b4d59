//! Record validator
//!
//! Walks every field of the canonical record and classifies the candidate's
//! value as missing, matching or mismatching. Failures are data in the
//! returned [`ValidationResult`]; validation itself never fails.

use super::compare::{compare, Comparison};
use crate::record::CanonicalRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Which candidate values count as "not provided"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Only an absent key or `null` is missing. Empty strings, zero and
    /// empty lists are compared like any other value.
    #[default]
    AbsentOrNull,
    /// Any falsy value is missing: `null`, `false`, `0`, `""`, `[]`, `{}`
    Falsy,
}

impl MissingValuePolicy {
    pub fn is_missing(&self, value: &Value) -> bool {
        match self {
            MissingValuePolicy::AbsentOrNull => value.is_null(),
            MissingValuePolicy::Falsy => is_falsy(value),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Verdict for one candidate record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff `errors` and `missing_fields` are both empty
    pub valid: bool,
    /// One diagnostic per mismatching field, in canonical order
    pub errors: Vec<String>,
    /// Dotted paths (`provider.documento`) or bare section names
    pub missing_fields: Vec<String>,
}

impl ValidationResult {
    fn new(errors: Vec<String>, missing_fields: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty() && missing_fields.is_empty(),
            errors,
            missing_fields,
        }
    }
}

/// Validates candidate records against one canonical record
///
/// Cheap to clone; the canonical record is shared and never mutated, so a
/// validator can be used from any number of threads at once.
#[derive(Debug, Clone)]
pub struct Validator {
    record: Arc<CanonicalRecord>,
    policy: MissingValuePolicy,
}

impl Validator {
    pub fn new(record: CanonicalRecord) -> Self {
        Self {
            record: Arc::new(record),
            policy: MissingValuePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MissingValuePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn record(&self) -> &CanonicalRecord {
        &self.record
    }

    pub fn policy(&self) -> MissingValuePolicy {
        self.policy
    }

    /// Validate a candidate record
    ///
    /// Sections are visited in order provider, contract, counterparty. A
    /// section that is absent, not a mapping, or empty is reported once by
    /// its bare name and its fields are skipped. Candidate fields without a
    /// canonical counterpart are ignored.
    pub fn validate(&self, candidate: &Value) -> ValidationResult {
        let mut errors = Vec::new();
        let mut missing_fields = Vec::new();

        for section in self.record.sections() {
            let fields = match section.name.lookup(candidate) {
                Some(fields) if !fields.is_empty() => fields,
                _ => {
                    debug!(section = %section.name, "Section missing from candidate");
                    missing_fields.push(section.name.to_string());
                    continue;
                }
            };

            for field in &section.fields {
                let path = format!("{}.{}", section.name, field.spec.name);

                let value = match fields.get(field.spec.name) {
                    Some(value) if !self.policy.is_missing(value) => value,
                    _ => {
                        debug!(field = %path, "Field missing from candidate");
                        missing_fields.push(path);
                        continue;
                    }
                };

                match compare(field.spec.name, value, &field.value, field.spec.field_type) {
                    Comparison::Match => {
                        debug!(field = %path, "Field matches");
                    }
                    Comparison::Mismatch(diagnostic) => {
                        debug!(field = %path, field_type = ?field.spec.field_type, "Field mismatch");
                        errors.push(diagnostic);
                    }
                }
            }
        }

        ValidationResult::new(errors, missing_fields)
    }
}

//! Model output parsing
//!
//! Models wrap JSON in Markdown fences, prepend chatter, or quote their
//! answers. These helpers recover the payload.

use once_cell::sync::Lazy;
use pacto_common::validation::normalize::parse_amount;
use regex::Regex;
use serde_json::Value;

use super::LlmError;

/// Outermost `{...}` span, across lines
static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("JSON object pattern is valid"));

const PREVIEW_CHARS: usize = 200;

/// Keep only the lines inside ```` ``` ```` fences when the reply opens with one
pub fn strip_code_fences(content: &str) -> String {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut inside = false;
    let mut kept = Vec::new();
    for line in trimmed.lines() {
        if line.trim().starts_with("```") {
            inside = !inside;
            continue;
        }
        if inside {
            kept.push(line);
        }
    }
    kept.join("\n")
}

/// Parse a model reply as JSON
///
/// Falls back to the first-to-last brace span when the whole reply does not
/// parse.
pub fn parse_json_reply(content: &str) -> Result<Value, LlmError> {
    let cleaned = strip_code_fences(content);
    if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
        return Ok(value);
    }

    let span = JSON_OBJECT.find(&cleaned).ok_or_else(|| {
        LlmError::Parse(format!("No JSON found in model reply: {}", preview(&cleaned)))
    })?;

    serde_json::from_str(span.as_str()).map_err(|e| {
        LlmError::Parse(format!(
            "Invalid JSON in model reply ({}): {}",
            e,
            preview(&cleaned)
        ))
    })
}

/// Turn a textual `contract.valor` into a number
///
/// `,`, `$` and `USD` are stripped before parsing; text that still does not
/// parse becomes `0`. `null` and numbers are left alone.
pub fn coerce_contract_amount(record: &mut Value) {
    for key in ["contract", "contrato"] {
        let Some(amount) = record
            .get_mut(key)
            .and_then(Value::as_object_mut)
            .and_then(|section| section.get_mut("valor"))
        else {
            continue;
        };

        let parsed = match &*amount {
            Value::Null | Value::Number(_) => continue,
            Value::String(text) => parse_amount(text).and_then(serde_json::Number::from_f64),
            _ => None,
        };
        *amount = Value::Number(parsed.unwrap_or_else(|| 0.into()));
    }
}

/// Trim a generated question and drop surrounding double quotes
pub fn clean_question(content: &str) -> String {
    let trimmed = content.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

//! Field normalization
//!
//! One pure function per semantic field type, turning a raw JSON value into
//! a form that can be compared with `==`. None of these functions fail:
//! unparseable input degrades to the original text (dates) or to zero
//! (amounts).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Output format of `normalize_date`
const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepted input date formats, in priority order
const ACCEPTED_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Identity document type prefixes. PASAPORTE precedes PA so the longer
/// token wins.
static DOCUMENT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(CC|CE|TI|NIT|PASAPORTE|PA)\s*").expect("document prefix pattern is valid")
});

/// Text a scalar value is compared by
///
/// Strings are returned as-is, numbers and booleans with their JSON
/// rendering, arrays and objects as compact JSON. `None` for `null`.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Human-readable rendering of a raw value for diagnostics
///
/// Strings are not quoted; arrays render as `[a, b]`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(display_value).collect();
            format!("[{}]", items.join(", "))
        }
        other => value_text(other).unwrap_or_default(),
    }
}

/// Lower-case and collapse whitespace runs to single spaces, trimmed
///
/// `""` for `null` or empty input. Idempotent.
pub fn normalize_text(value: &Value) -> String {
    value_text(value)
        .map(|text| collapse_lowercase(&text))
        .unwrap_or_default()
}

fn collapse_lowercase(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalize a date to `YYYY-MM-DD`
///
/// Input already shaped like `YYYY-MM-DD` (10 characters, dashes at
/// positions 5 and 8) is returned untouched. Otherwise the accepted formats
/// are tried in order; if none parses, the original text is returned.
pub fn normalize_date(value: &Value) -> String {
    let Some(raw) = value_text(value) else {
        return String::new();
    };

    if has_canonical_date_shape(&raw) {
        return raw;
    }

    let trimmed = raw.trim();
    ACCEPTED_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(|date| date.format(CANONICAL_DATE_FORMAT).to_string())
        .unwrap_or(raw)
}

fn has_canonical_date_shape(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.len() == 10 && chars[4] == '-' && chars[7] == '-'
}

/// Normalize an identity document number
///
/// Drops a leading type prefix (`CC`, `CE`, `TI`, `NIT`, `PASAPORTE`, `PA`,
/// any case, optional whitespace after it), then keeps only digits, `.` and
/// `-`. `"CC 52.871.993"` becomes `"52.871.993"`.
pub fn normalize_document(value: &Value) -> String {
    let Some(raw) = value_text(value) else {
        return String::new();
    };

    DOCUMENT_PREFIX
        .replace(raw.trim(), "")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Parse a textual amount such as `"$4,800 USD"`
///
/// `,`, `$` and `USD` are stripped (in that order) before parsing.
pub fn parse_amount(text: &str) -> Option<f64> {
    text.replace(',', "")
        .replace('$', "")
        .replace("USD", "")
        .trim()
        .parse::<f64>()
        .ok()
}

/// Normalize a monetary amount to a float
///
/// Numbers pass through, strings go through [`parse_amount`]. Anything
/// unparseable is `0.0`.
pub fn normalize_currency(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => parse_amount(text).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// `normalize_text` applied element-wise; non-list input yields no items
pub fn normalize_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(normalize_text).collect(),
        _ => Vec::new(),
    }
}

//! Per-field comparison policy
//!
//! Decides whether a candidate value matches its canonical value under the
//! tolerance rule of the field's semantic type:
//!
//! | Type          | Rule                                                        |
//! |---------------|-------------------------------------------------------------|
//! | `document`    | normalized documents equal, else normalized texts equal     |
//! | `date`        | normalized dates equal                                      |
//! | `name`        | normalized texts equal, or one contains the other, or the   |
//! |               | words of one appear in order among the words of the other   |
//! | `currency`    | amounts differ by less than [`CURRENCY_TOLERANCE`]          |
//! | `string_list` | every canonical item contains or is contained by some item  |
//! | `plain_text`  | normalized texts equal                                      |

use super::normalize::{
    display_value, normalize_currency, normalize_date, normalize_document, normalize_string_list,
    normalize_text,
};
use crate::record::{CanonicalValue, FieldType};
use serde_json::Value;

/// Amounts closer than this are the same amount (rounding and formatting
/// noise, not a discount)
pub const CURRENCY_TOLERANCE: f64 = 1.0;

/// Outcome of comparing one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Match,
    /// Mismatch with a diagnostic naming the field and both raw values
    Mismatch(String),
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match)
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Comparison::Match => None,
            Comparison::Mismatch(diagnostic) => Some(diagnostic),
        }
    }
}

/// Compare a candidate value with its canonical value
pub fn compare(
    field_name: &str,
    candidate: &Value,
    canonical: &CanonicalValue,
    field_type: FieldType,
) -> Comparison {
    let canonical = canonical.to_json();

    let matched = match field_type {
        FieldType::Document => documents_match(candidate, &canonical),
        FieldType::Date => normalize_date(candidate) == normalize_date(&canonical),
        FieldType::Name => names_match(candidate, &canonical),
        FieldType::Currency => {
            (normalize_currency(candidate) - normalize_currency(&canonical)).abs()
                < CURRENCY_TOLERANCE
        }
        FieldType::StringList => lists_match(candidate, &canonical),
        FieldType::PlainText => normalize_text(candidate) == normalize_text(&canonical),
    };

    if matched {
        Comparison::Match
    } else {
        Comparison::Mismatch(mismatch_diagnostic(field_name, candidate, &canonical))
    }
}

/// Diagnostic for a field whose candidate value did not match
pub fn mismatch_diagnostic(field_name: &str, candidate: &Value, canonical: &Value) -> String {
    format!(
        "Field '{}' does not match. Expected: '{}', Received: '{}'",
        field_name,
        display_value(canonical),
        display_value(candidate)
    )
}

fn documents_match(candidate: &Value, canonical: &Value) -> bool {
    normalize_document(candidate) == normalize_document(canonical)
        // Documents typed without the usual punctuation
        || normalize_text(candidate) == normalize_text(canonical)
}

fn names_match(candidate: &Value, canonical: &Value) -> bool {
    let candidate = normalize_text(candidate);
    let canonical = normalize_text(canonical);
    candidate == canonical
        || contains_either_way(&candidate, &canonical)
        // "Carlos Rincón" against "Carlos Eduardo Rincón"
        || words_in_order(&candidate, &canonical)
        || words_in_order(&canonical, &candidate)
}

/// Every word of `shorter` appears among the words of `longer`, in order.
/// Both inputs are already normalized (single spaces).
fn words_in_order(shorter: &str, longer: &str) -> bool {
    if shorter.is_empty() || longer.is_empty() {
        return false;
    }
    let mut longer_words = longer.split(' ');
    shorter
        .split(' ')
        .all(|word| longer_words.any(|candidate| candidate == word))
}

fn lists_match(candidate: &Value, canonical: &Value) -> bool {
    let candidate_items = normalize_string_list(candidate);
    normalize_string_list(canonical).iter().all(|expected| {
        candidate_items
            .iter()
            .any(|item| item == expected || contains_either_way(item, expected))
    })
}

/// Substring containment in either direction. Empty text never counts as
/// contained, otherwise a blank candidate would satisfy anything.
fn contains_either_way(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

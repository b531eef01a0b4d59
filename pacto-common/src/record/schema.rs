//! Field schema of the contract record
//!
//! The comparison policy for a field depends on its semantic type, so every
//! field of the three record sections is declared here with its type. The
//! declaration order is the order in which fields are validated and reported.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Top-level sections of a contract record, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    /// The contractor providing the service
    Provider,
    /// Project, value, dates and deliverables
    Contract,
    /// The hiring company
    Counterparty,
}

impl SectionName {
    /// All sections in validation order
    pub const ALL: [SectionName; 3] = [
        SectionName::Provider,
        SectionName::Contract,
        SectionName::Counterparty,
    ];

    /// Key used for this section in records and field paths
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::Provider => "provider",
            SectionName::Contract => "contract",
            SectionName::Counterparty => "counterparty",
        }
    }

    /// Spanish key emitted by older extraction prompts, accepted on input only
    pub fn legacy_key(&self) -> &'static str {
        match self {
            SectionName::Provider => "proveedor",
            SectionName::Contract => "contrato",
            SectionName::Counterparty => "contratante",
        }
    }

    /// Field schema of this section
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            SectionName::Provider => PROVIDER_FIELDS,
            SectionName::Contract => CONTRACT_FIELDS,
            SectionName::Counterparty => COUNTERPARTY_FIELDS,
        }
    }

    /// Look up the schema entry for `field` in this section
    pub fn field(&self, field: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.name == field)
    }

    /// Find this section's mapping inside a JSON record
    ///
    /// Tries the English key first, then the legacy Spanish key. Values that
    /// are not JSON objects are skipped, and an empty object only wins when
    /// neither key holds any fields.
    pub fn lookup<'a>(&self, record: &'a Value) -> Option<&'a Map<String, Value>> {
        let mut sections = [self.as_str(), self.legacy_key()]
            .into_iter()
            .filter_map(|key| record.get(key).and_then(Value::as_object));
        let first = sections.next()?;
        if first.is_empty() {
            Some(sections.find(|fields| !fields.is_empty()).unwrap_or(first))
        } else {
            Some(first)
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic type of a field; selects its normalization and comparison rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Case and whitespace insensitive exact match
    PlainText,
    /// Person or representative name; partial names match by containment
    Name,
    /// Calendar date in one of the accepted input formats
    Date,
    /// Identity document with optional type prefix (CC, NIT, ...)
    Document,
    /// Monetary amount, possibly formatted with separators and symbols
    Currency,
    /// Unordered list of free-text items
    StringList,
}

/// Association of a field name with its semantic type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
}

const fn field(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec { name, field_type }
}

pub const PROVIDER_FIELDS: &[FieldSpec] = &[
    field("nombre", FieldType::Name),
    field("documento", FieldType::Document),
    field("correo", FieldType::PlainText),
    field("telefono", FieldType::PlainText),
];

pub const CONTRACT_FIELDS: &[FieldSpec] = &[
    field("proyecto", FieldType::PlainText),
    field("servicio", FieldType::PlainText),
    field("valor", FieldType::Currency),
    field("moneda", FieldType::PlainText),
    field("fecha_inicio", FieldType::Date),
    field("fecha_fin", FieldType::Date),
    field("entregables", FieldType::StringList),
];

pub const COUNTERPARTY_FIELDS: &[FieldSpec] = &[
    field("empresa", FieldType::PlainText),
    field("nit", FieldType::PlainText),
    field("representante_legal", FieldType::Name),
    field("cargo", FieldType::PlainText),
    field("direccion", FieldType::PlainText),
    field("correo", FieldType::PlainText),
];

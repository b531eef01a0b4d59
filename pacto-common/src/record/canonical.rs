//! Canonical contract record
//!
//! The ground truth every candidate record is validated against. Built once
//! at startup, either from the built-in official data or from a TOML file,
//! and shared read-only afterwards.

use super::schema::{FieldSpec, FieldType, SectionName};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::info;

/// Value of a canonical field
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    /// Plain text, names, dates and identity documents
    Text(String),
    /// Monetary amount
    Amount(f64),
    /// Ordered list of items
    List(Vec<String>),
}

impl CanonicalValue {
    /// JSON form of the value, as it would appear in a candidate record
    ///
    /// Whole amounts are emitted as integers so they render as `4800`
    /// rather than `4800.0`.
    pub fn to_json(&self) -> Value {
        match self {
            CanonicalValue::Text(text) => Value::String(text.clone()),
            CanonicalValue::Amount(amount) => {
                if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
                    Value::from(*amount as i64)
                } else {
                    Value::from(*amount)
                }
            }
            CanonicalValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl From<&str> for CanonicalValue {
    fn from(text: &str) -> Self {
        CanonicalValue::Text(text.to_string())
    }
}

/// One canonical field: its schema entry and its ground-truth value
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalField {
    pub spec: FieldSpec,
    pub value: CanonicalValue,
}

/// One canonical section with its fields in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSection {
    pub name: SectionName,
    pub fields: Vec<CanonicalField>,
}

/// The canonical record: three sections, every schema field present
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    sections: Vec<CanonicalSection>,
}

impl CanonicalRecord {
    /// Built-in official contract data
    pub fn official() -> Self {
        use CanonicalValue::{Amount, List};

        let provider = vec![
            "Laura Sofía Martínez Gómez".into(),
            "CC 52.871.993".into(),
            "laura.martinez@example.com".into(),
            "+57 310 555 9080".into(),
        ];
        let contract = vec![
            "Optimización del Proceso de Conciliación".into(),
            "Consultoría en automatización de procesos y conciliación contable".into(),
            Amount(4800.0),
            "USD".into(),
            "2026-01-15".into(),
            "2026-04-15".into(),
            List(vec![
                "Diagnóstico inicial".to_string(),
                "plan de automatización".to_string(),
                "piloto".to_string(),
                "informe final".to_string(),
            ]),
        ];
        let counterparty = vec![
            "TechNova S.A.S.".into(),
            "901.456.789-1".into(),
            "Carlos Eduardo Rincón".into(),
            "CEO".into(),
            "Cra. 45 #100–32, Bogotá".into(),
            "contratos@technova.co".into(),
        ];

        Self {
            sections: vec![
                build_section(SectionName::Provider, provider),
                build_section(SectionName::Contract, contract),
                build_section(SectionName::Counterparty, counterparty),
            ],
        }
    }

    /// Load a canonical record from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let record = Self::from_toml_str(&content)?;
        info!("Canonical record loaded from {}", path.display());
        Ok(record)
    }

    /// Parse a canonical record from TOML text
    ///
    /// Expects `[provider]`, `[contract]` and `[counterparty]` tables holding
    /// every schema field. Amounts must be numbers, lists arrays of strings,
    /// everything else strings (TOML dates are accepted for date fields).
    /// Unknown sections or fields are rejected.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: toml::Table = toml::from_str(content)?;

        if let Some(unknown) = document
            .keys()
            .find(|key| !SectionName::ALL.iter().any(|s| s.as_str() == key.as_str()))
        {
            return Err(Error::Config(format!(
                "Unknown canonical record section [{}]",
                unknown
            )));
        }

        let mut sections = Vec::with_capacity(SectionName::ALL.len());
        for name in SectionName::ALL {
            let table = document
                .get(name.as_str())
                .and_then(toml::Value::as_table)
                .ok_or_else(|| {
                    Error::Config(format!("Canonical record is missing section [{}]", name))
                })?;

            if let Some(unknown) = table.keys().find(|key| name.field(key.as_str()).is_none()) {
                return Err(Error::Config(format!(
                    "Unknown canonical field {}.{}",
                    name, unknown
                )));
            }

            let mut fields = Vec::with_capacity(name.fields().len());
            for spec in name.fields() {
                let raw = table.get(spec.name).ok_or_else(|| {
                    Error::Config(format!(
                        "Canonical record is missing field {}.{}",
                        name, spec.name
                    ))
                })?;
                let value = canonical_value_from_toml(raw, spec.field_type).ok_or_else(|| {
                    Error::Config(format!(
                        "Canonical field {}.{} has the wrong kind of value for {:?}",
                        name, spec.name, spec.field_type
                    ))
                })?;
                fields.push(CanonicalField { spec: *spec, value });
            }
            sections.push(CanonicalSection { name, fields });
        }

        Ok(Self { sections })
    }

    /// Sections in validation order
    pub fn sections(&self) -> &[CanonicalSection] {
        &self.sections
    }

    /// Canonical value of `section.field`, if the schema declares it
    pub fn get(&self, section: SectionName, field: &str) -> Option<&CanonicalValue> {
        self.sections
            .iter()
            .find(|s| s.name == section)?
            .fields
            .iter()
            .find(|f| f.spec.name == field)
            .map(|f| &f.value)
    }

    /// JSON form of the whole record, shaped like a candidate record
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        for section in &self.sections {
            let fields: Map<String, Value> = section
                .fields
                .iter()
                .map(|f| (f.spec.name.to_string(), f.value.to_json()))
                .collect();
            root.insert(section.name.to_string(), Value::Object(fields));
        }
        Value::Object(root)
    }
}

fn build_section(name: SectionName, values: Vec<CanonicalValue>) -> CanonicalSection {
    debug_assert_eq!(name.fields().len(), values.len());
    let fields = name
        .fields()
        .iter()
        .zip(values)
        .map(|(spec, value)| CanonicalField { spec: *spec, value })
        .collect();
    CanonicalSection { name, fields }
}

fn canonical_value_from_toml(raw: &toml::Value, field_type: FieldType) -> Option<CanonicalValue> {
    match (field_type, raw) {
        (FieldType::Currency, toml::Value::Integer(n)) => Some(CanonicalValue::Amount(*n as f64)),
        (FieldType::Currency, toml::Value::Float(n)) if n.is_finite() => {
            Some(CanonicalValue::Amount(*n))
        }
        (FieldType::StringList, toml::Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(CanonicalValue::List),
        // Local dates only; a time part could never match a candidate date
        (FieldType::Date, toml::Value::Datetime(date))
            if date.date.is_some() && date.time.is_none() && date.offset.is_none() =>
        {
            Some(CanonicalValue::Text(date.to_string()))
        }
        (FieldType::Currency | FieldType::StringList, _) => None,
        (_, toml::Value::String(text)) => Some(CanonicalValue::Text(text.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RECORD_TOML: &str = r#"
        [provider]
        nombre = "Ana Pérez"
        documento = "CE 1.234.567"
        correo = "ana@example.com"
        telefono = "+57 300 000 0000"

        [contract]
        proyecto = "Migración"
        servicio = "Consultoría"
        valor = 1250.5
        moneda = "COP"
        fecha_inicio = 2026-02-01
        fecha_fin = "2026-03-01"
        entregables = ["informe", "piloto"]

        [counterparty]
        empresa = "Acme S.A.S."
        nit = "900.000.000-1"
        representante_legal = "Juan Gómez"
        cargo = "Gerente"
        direccion = "Calle 1 #2-3"
        correo = "legal@acme.co"
    "#;

    #[test]
    fn test_official_record_covers_schema() {
        let record = CanonicalRecord::official();
        for section in SectionName::ALL {
            for spec in section.fields() {
                assert!(
                    record.get(section, spec.name).is_some(),
                    "missing {}.{}",
                    section,
                    spec.name
                );
            }
        }
        assert_eq!(
            record.get(SectionName::Contract, "valor"),
            Some(&CanonicalValue::Amount(4800.0))
        );
    }

    #[test]
    fn test_from_toml_str() {
        let record = CanonicalRecord::from_toml_str(RECORD_TOML).unwrap();

        assert_eq!(
            record.get(SectionName::Contract, "fecha_inicio"),
            Some(&CanonicalValue::Text("2026-02-01".to_string()))
        );
        assert_eq!(
            record.get(SectionName::Contract, "valor"),
            Some(&CanonicalValue::Amount(1250.5))
        );
        assert_eq!(
            record.get(SectionName::Contract, "entregables"),
            Some(&CanonicalValue::List(vec!["informe".into(), "piloto".into()]))
        );
    }

    #[test]
    fn test_from_toml_rejects_missing_field() {
        let content = RECORD_TOML.replace("telefono = \"+57 300 000 0000\"", "");
        let err = CanonicalRecord::from_toml_str(&content).unwrap_err();
        assert!(err.to_string().contains("provider.telefono"));
    }

    #[test]
    fn test_from_toml_rejects_wrong_kind() {
        let content = RECORD_TOML.replace("valor = 1250.5", "valor = \"1250.5\"");
        let err = CanonicalRecord::from_toml_str(&content).unwrap_err();
        assert!(err.to_string().contains("contract.valor"));
    }

    #[test]
    fn test_from_toml_rejects_non_finite_amount() {
        for amount in ["nan", "inf", "-inf"] {
            let content = RECORD_TOML.replace("valor = 1250.5", &format!("valor = {}", amount));
            let err = CanonicalRecord::from_toml_str(&content).unwrap_err();
            assert!(err.to_string().contains("contract.valor"), "accepted {}", amount);
        }
    }

    #[test]
    fn test_from_toml_rejects_date_with_time() {
        for date in ["2026-02-01T10:00:00", "2026-02-01T10:00:00Z", "10:00:00"] {
            let content =
                RECORD_TOML.replace("fecha_inicio = 2026-02-01", &format!("fecha_inicio = {}", date));
            let err = CanonicalRecord::from_toml_str(&content).unwrap_err();
            assert!(err.to_string().contains("contract.fecha_inicio"), "accepted {}", date);
        }
    }

    #[test]
    fn test_from_toml_rejects_unknown_field() {
        let content = RECORD_TOML.replace("[counterparty]", "[counterparty]\nfax = \"123\"");
        let err = CanonicalRecord::from_toml_str(&content).unwrap_err();
        assert!(err.to_string().contains("counterparty.fax"));
    }

    #[test]
    fn test_to_json_shape() {
        let json = CanonicalRecord::official().to_json();
        assert_eq!(json["contract"]["valor"], json!(4800));
        assert_eq!(json["provider"]["documento"], json!("CC 52.871.993"));
        assert_eq!(json["contract"]["entregables"].as_array().map(Vec::len), Some(4));
    }
}

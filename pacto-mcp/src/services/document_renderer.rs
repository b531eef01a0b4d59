//! Service contract rendering
//!
//! Turns a (validated) contract record into the Spanish Markdown contract
//! delivered to the parties. Missing values render as `N/A`; the renderer
//! never fails.

use chrono::{Datelike, NaiveDate};
use pacto_common::validation::normalize::{parse_amount, value_text};
use pacto_common::SectionName;
use serde_json::{Map, Value};

const NOT_AVAILABLE: &str = "N/A";

/// Markdown hard line break
const LINE_BREAK: &str = "  ";

/// Underscore line the parties sign on
pub const SIGNATURE_LINE: &str = "_________________________";

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Field accessor over one record section
struct SectionView<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> SectionView<'a> {
    fn of(record: &'a Value, section: SectionName) -> Self {
        Self {
            fields: section.lookup(record),
        }
    }

    fn raw(&self, field: &str) -> Option<&'a Value> {
        self.fields.and_then(|fields| fields.get(field))
    }

    fn text(&self, field: &str) -> String {
        self.text_or(field, NOT_AVAILABLE)
    }

    fn text_or(&self, field: &str, default: &str) -> String {
        self.raw(field)
            .and_then(value_text)
            .unwrap_or_else(|| default.to_string())
    }
}

/// Render the service contract for `record`, dated `generated_on`
pub fn render_contract(record: &Value, generated_on: NaiveDate) -> String {
    let provider = SectionView::of(record, SectionName::Provider);
    let contract = SectionView::of(record, SectionName::Contract);
    let counterparty = SectionView::of(record, SectionName::Counterparty);

    let amount = contract
        .raw("valor")
        .map(format_amount)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let deliverables = render_deliverables(contract.raw("entregables"));

    format!(
        "# CONTRATO DE PRESTACIÓN DE SERVICIOS

## PARTES

### CONTRATANTE
**Empresa:** {empresa}{br}
**NIT:** {nit}{br}
**Representante Legal:** {representante} ({cargo}){br}
**Dirección:** {direccion}{br}
**Correo:** {correo_contratante}

### CONTRATISTA (PROVEEDOR)
**Nombre:** {nombre}{br}
**Documento:** {documento}{br}
**Correo:** {correo_proveedor}{br}
**Teléfono:** {telefono}

---

## OBJETO DEL CONTRATO

El presente contrato tiene por objeto la prestación del siguiente servicio:

**Proyecto:** {proyecto}{br}
**Servicio:** {servicio}

---

## DURACIÓN Y VALOR

**Fecha de Inicio:** {fecha_inicio}{br}
**Fecha de Finalización:** {fecha_fin}{br}
**Valor Total:** {moneda} {amount}

---

## ENTREGABLES

{deliverables}

---

## CLÁUSULAS

### 1. OBLIGACIONES DEL CONTRATISTA
El contratista se compromete a:
- Ejecutar el servicio conforme a los términos acordados
- Entregar los entregables en las fechas establecidas
- Mantener la confidencialidad de la información recibida

### 2. OBLIGACIONES DEL CONTRATANTE
El contratante se compromete a:
- Proporcionar la información necesaria para la ejecución del servicio
- Realizar los pagos conforme al cronograma acordado
- Colaborar activamente en el desarrollo del proyecto

### 3. PAGO
El pago se realizará según el cronograma acordado entre las partes.

### 4. CONFIDENCIALIDAD
Ambas partes se comprometen a mantener la confidencialidad de la información intercambiada.

### 5. TERMINACIÓN
El contrato podrá ser terminado por mutuo acuerdo o por incumplimiento de cualquiera de las partes.

---

## FIRMAS

**CONTRATANTE**

{representante}{br}
{cargo}{br}
{empresa}

{signature}{br}
Firma

**CONTRATISTA**

{nombre}

{signature}{br}
Firma

---

*Contrato generado el {generated}*
",
        empresa = counterparty.text("empresa"),
        nit = counterparty.text("nit"),
        representante = counterparty.text("representante_legal"),
        cargo = counterparty.text("cargo"),
        direccion = counterparty.text("direccion"),
        correo_contratante = counterparty.text("correo"),
        nombre = provider.text("nombre"),
        documento = provider.text("documento"),
        correo_proveedor = provider.text("correo"),
        telefono = provider.text("telefono"),
        proyecto = contract.text("proyecto"),
        servicio = contract.text("servicio"),
        fecha_inicio = contract.text("fecha_inicio"),
        fecha_fin = contract.text("fecha_fin"),
        moneda = contract.text_or("moneda", "USD"),
        amount = amount,
        deliverables = deliverables,
        signature = SIGNATURE_LINE,
        generated = spanish_date(generated_on),
        br = LINE_BREAK,
    )
}

/// Amount with thousands separators and two decimals: `4,800.00`
///
/// Numeric strings (`"$4,800 USD"`) are parsed first; any other text is
/// rendered unchanged.
pub fn format_amount(value: &Value) -> String {
    let amount = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_amount(text),
        _ => None,
    };

    match amount {
        Some(amount) if amount.is_finite() => group_thousands(amount),
        _ => value_text(value).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

fn render_deliverables(value: Option<&Value>) -> String {
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(value_text)
            .map(|item| format!("- {}", item))
            .collect(),
        Some(other) => value_text(other).map(|item| format!("- {}", item)).into_iter().collect(),
        None => Vec::new(),
    };

    if items.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        items.join("\n")
    }
}

/// `15 de enero de 2026`
pub fn spanish_date(date: NaiveDate) -> String {
    format!(
        "{:02} de {} de {}",
        date.day(),
        MONTHS_ES[date.month0() as usize],
        date.year()
    )
}

//! Prompts sent to the LLM backends
//!
//! Prompts are in Spanish, like the contract texts they process. The
//! extraction prompt asks for the record under the `provider`, `contract`
//! and `counterparty` keys the validator expects.

use super::ChatMessage;

const EXTRACTION_SYSTEM: &str = r#"Eres un asistente experto en extraer información de contratos desde texto libre.
Tu tarea es analizar el texto proporcionado y extraer la siguiente información estructurada:

1. provider (el contratista o proveedor):
   - nombre: Nombre completo de la persona
   - documento: Número de documento de identidad (INCLUYE el prefijo si está presente: CC, CE, TI, NIT, etc. Ejemplo: "CC 52.871.993" no solo "52.871.993")
   - correo: Correo electrónico
   - telefono: Número de teléfono

2. contract (el contrato):
   - proyecto: Nombre del proyecto
   - servicio: Descripción del servicio
   - valor: Valor numérico (solo el número)
   - moneda: Moneda (USD, COP, etc.)
   - fecha_inicio: Fecha de inicio en formato YYYY-MM-DD
   - fecha_fin: Fecha de fin en formato YYYY-MM-DD
   - entregables: Lista de entregables (array de strings)

3. counterparty (el contratante):
   - empresa: Nombre de la empresa
   - nit: NIT de la empresa
   - representante_legal: Nombre del representante legal
   - cargo: Cargo del representante legal
   - direccion: Dirección de la empresa
   - correo: Correo electrónico de la empresa

IMPORTANTE:
- Si algún campo no está presente en el texto, usa null
- Normaliza las fechas al formato YYYY-MM-DD
- Extrae valores numéricos sin símbolos de moneda
- Para documentos de identidad: SI el texto menciona "CC", "CE", "TI", "NIT" u otro prefijo antes del número, INCLÚYELO en el campo documento
- Retorna SOLO un JSON válido, sin texto adicional"#;

const EXTRACTION_SHAPE: &str = r#"{
    "provider": {
        "nombre": "...",
        "documento": "...",
        "correo": "...",
        "telefono": "..."
    },
    "contract": {
        "proyecto": "...",
        "servicio": "...",
        "valor": 0,
        "moneda": "USD",
        "fecha_inicio": "YYYY-MM-DD",
        "fecha_fin": "YYYY-MM-DD",
        "entregables": []
    },
    "counterparty": {
        "empresa": "...",
        "nit": "...",
        "representante_legal": "...",
        "cargo": "...",
        "direccion": "...",
        "correo": "..."
    }
}"#;

const QUESTION_SYSTEM: &str = "Eres un asistente que ayuda a completar información de contratos.
Tu tarea es generar una pregunta amigable y natural en español que solicite la información faltante o incorrecta.
La pregunta debe ser clara y en lenguaje natural (no mencionar campos técnicos).";

const QUESTION_RULES: &str = "IMPORTANTE:
- La pregunta debe ser en lenguaje natural, como si hablaras con una persona
- No uses términos técnicos como \"provider.nombre\" o \"contract.valor\"
- Pide al usuario que amplíe su texto con la información necesaria para completar el contrato
- Mantén un tono profesional pero amigable
- Retorna SOLO la pregunta, sin explicaciones adicionales";

/// Messages asking the model to extract a contract record from `text`
pub fn extraction_messages(text: &str) -> Vec<ChatMessage> {
    let user = format!(
        "Extrae la información del siguiente texto sobre un contrato:\n\n{}\n\nRetorna SOLO un JSON con esta estructura exacta:\n{}",
        text, EXTRACTION_SHAPE
    );
    vec![ChatMessage::system(EXTRACTION_SYSTEM), ChatMessage::user(user)]
}

/// Messages asking the model for a follow-up question
pub fn question_messages(missing_fields: &[String], errors: &[String]) -> Vec<ChatMessage> {
    let mut findings = Vec::new();
    if !missing_fields.is_empty() {
        findings.push(format!("Campos faltantes: {}", missing_fields.join(", ")));
    }
    if !errors.is_empty() {
        findings.push(format!("Errores encontrados: {}", errors.join(", ")));
    }

    let user = format!(
        "Basándote en la siguiente información, genera una pregunta natural en español para solicitar los datos faltantes o corregir los errores:\n\n{}\n\n{}",
        findings.join("\n"),
        QUESTION_RULES
    );
    vec![ChatMessage::system(QUESTION_SYSTEM), ChatMessage::user(user)]
}

/// Flatten chat messages into a single completion prompt
///
/// Each message becomes `Role: content`; messages are separated by a
/// blank line.
pub fn flatten(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|message| format!("{}: {}", message.role.label(), message.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

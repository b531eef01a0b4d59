//! Contract delivery
//!
//! Signing replaces the counterparty's signature line with the supplied
//! signature text. Delivery itself is simulated: nothing leaves the process,
//! the acknowledgment carries a timestamp and a fresh message id.

use chrono::Utc;
use pacto_common::api::EmailStatus;
use tracing::info;
use uuid::Uuid;

use super::document_renderer::SIGNATURE_LINE;

const COUNTERPARTY_BLOCK: &str = "**CONTRATANTE**";
const PROVIDER_BLOCK: &str = "**CONTRATISTA**";

/// Replace the first signature line inside the `**CONTRATANTE**` block
///
/// Only lines after the block heading and before `**CONTRATISTA**` are
/// considered. The document is returned unchanged when no such line exists.
pub fn apply_signature(document: &str, signature: &str) -> String {
    let mut lines: Vec<&str> = document.split('\n').collect();
    let mut in_counterparty = false;

    for line in lines.iter_mut() {
        if line.contains(COUNTERPARTY_BLOCK) {
            in_counterparty = true;
        } else if in_counterparty && line.contains(SIGNATURE_LINE) {
            *line = signature;
            break;
        } else if in_counterparty && line.contains(PROVIDER_BLOCK) {
            break;
        }
    }

    lines.join("\n")
}

/// Simulated mail transport
#[derive(Debug, Clone)]
pub struct Mailer {
    default_recipient: String,
}

impl Mailer {
    pub fn new(default_recipient: impl Into<String>) -> Self {
        Self {
            default_recipient: default_recipient.into(),
        }
    }

    pub fn default_recipient(&self) -> &str {
        &self.default_recipient
    }

    /// Resolve the recipient for a request, falling back to the default
    pub fn recipient_for(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(self.default_recipient.as_str())
            .to_string()
    }

    /// "Send" `document` to `recipient`
    pub fn deliver(&self, recipient: &str, document: &str) -> EmailStatus {
        let message_id = Uuid::new_v4();
        info!(
            recipient = %recipient,
            message_id = %message_id,
            bytes = document.len(),
            "Contract delivered (simulated)"
        );

        EmailStatus {
            status: "SENT".to_string(),
            recipient: recipient.to_string(),
            message: format!("Contract sent successfully to {}", recipient),
            timestamp: Some(Utc::now().to_rfc3339()),
            message_id: Some(message_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNED_BLOCKS: &str = "## FIRMAS\n\n**CONTRATANTE**\n\nCarlos\nCEO\nTechNova\n\n_________________________  \nFirma\n\n**CONTRATISTA**\n\nLaura\n\n_________________________  \nFirma\n";

    #[test]
    fn test_signature_replaces_counterparty_line_only() {
        let signed = apply_signature(SIGNED_BLOCKS, "/firmado/ Carlos Rincón");

        assert!(signed.contains("TechNova\n\n/firmado/ Carlos Rincón\nFirma\n\n**CONTRATISTA**"));
        assert_eq!(signed.matches(SIGNATURE_LINE).count(), 1);
        assert!(signed.ends_with("Laura\n\n_________________________  \nFirma\n"));
    }

    #[test]
    fn test_signature_not_applied_outside_counterparty_block() {
        let document = "**CONTRATANTE**\n\nCarlos\n\n**CONTRATISTA**\n\n_________________________\n";
        assert_eq!(apply_signature(document, "firma"), document);

        let no_blocks = "_________________________\n";
        assert_eq!(apply_signature(no_blocks, "firma"), no_blocks);
    }

    #[test]
    fn test_recipient_fallback() {
        let mailer = Mailer::new("contratos@example.com");
        assert_eq!(mailer.recipient_for(None), "contratos@example.com");
        assert_eq!(mailer.recipient_for(Some("  ")), "contratos@example.com");
        assert_eq!(mailer.recipient_for(Some("ana@example.com")), "ana@example.com");
    }

    #[test]
    fn test_deliver_acknowledgment() {
        let status = Mailer::new("x@example.com").deliver("ana@example.com", "doc");
        assert_eq!(status.status, "SENT");
        assert_eq!(status.recipient, "ana@example.com");
        assert_eq!(status.message, "Contract sent successfully to ana@example.com");
        assert!(status.timestamp.is_some());
        assert!(status.message_id.is_some());
    }
}

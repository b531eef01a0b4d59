//! Templated follow-up question

/// Fields named in the fallback question
const MAX_LISTED_FIELDS: usize = 3;

/// Question used when the model cannot produce one
///
/// Lists at most the first three missing fields, in order.
pub fn fallback_question(missing_fields: &[String]) -> String {
    let listed: Vec<&str> = missing_fields
        .iter()
        .take(MAX_LISTED_FIELDS)
        .map(String::as_str)
        .collect();

    format!(
        "Necesito más información para completar el contrato. Por favor, proporciona: {}.",
        listed.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_lists_first_three_fields() {
        let question = fallback_question(&fields(&[
            "provider.correo",
            "contract.valor",
            "contract.fecha_fin",
            "counterparty",
        ]));
        assert_eq!(
            question,
            "Necesito más información para completar el contrato. Por favor, proporciona: provider.correo, contract.valor, contract.fecha_fin."
        );
    }

    #[test]
    fn test_single_field() {
        assert!(fallback_question(&fields(&["counterparty"])).ends_with("proporciona: counterparty."));
    }
}

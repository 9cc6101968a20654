//! Advisory checks of the invariants the backend promises about a result.
//! The client trusts the backend, but an incoherent replacement log or a
//! leaked token is worth surfacing to the operator.

use std::collections::HashMap;

use crate::types::{AnonymizationResult, PhiReplacement};

/// A consistency key that maps to more than one distinct replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsistencyViolation {
    pub consistency_key: String,
    pub replacements: Vec<String>,
}

/// Find consistency keys whose rows disagree on the replacement text. Keys
/// are reported in order of first appearance.
pub fn consistency_violations(log: &[PhiReplacement]) -> Vec<ConsistencyViolation> {
    let mut seen: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut key_order: Vec<&str> = Vec::new();

    for row in log {
        let replacements = seen.entry(row.consistency_key.as_str()).or_insert_with(|| {
            key_order.push(row.consistency_key.as_str());
            Vec::new()
        });
        if !replacements.contains(&row.replacement.as_str()) {
            replacements.push(row.replacement.as_str());
        }
    }

    key_order
        .into_iter()
        .filter_map(|key| {
            let replacements = &seen[key];
            if replacements.len() > 1 {
                Some(ConsistencyViolation {
                    consistency_key: key.to_string(),
                    replacements: replacements.iter().map(|r| r.to_string()).collect(),
                })
            } else {
                None
            }
        })
        .collect()
}

/// Original tokens that still occur verbatim in the anonymized text.
/// Duplicates are collapsed; order of first appearance is kept.
pub fn residual_tokens(result: &AnonymizationResult) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for row in &result.replacement_log {
        if row.original_token.is_empty() {
            continue;
        }
        if result.anonymized_text.contains(&row.original_token)
            && !found.contains(&row.original_token)
        {
            found.push(row.original_token.clone());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: &str, original: &str, replacement: &str, key: &str) -> PhiReplacement {
        PhiReplacement {
            category: category.to_string(),
            original_token: original.to_string(),
            replacement: replacement.to_string(),
            consistency_key: key.to_string(),
        }
    }

    #[test]
    fn test_coherent_log_has_no_violations() {
        // The same person referenced twice with differing spans still maps
        // to one replacement.
        let log = vec![
            row("Name", "John Doe", "[PATIENT_NAME_1]", "[PATIENT_NAME_1]"),
            row("Name", "John", "[PATIENT_NAME_1]", "[PATIENT_NAME_1]"),
            row("Date", "01/02/1980", "[DATE_1]", "[DATE_1]"),
        ];
        assert!(consistency_violations(&log).is_empty());
    }

    #[test]
    fn test_conflicting_replacements_are_reported() {
        let log = vec![
            row("Name", "John Doe", "[PATIENT_NAME_1]", "[PATIENT_NAME_1]"),
            row("Name", "John", "[PATIENT_NAME_2]", "[PATIENT_NAME_1]"),
        ];
        let violations = consistency_violations(&log);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].consistency_key, "[PATIENT_NAME_1]");
        assert_eq!(
            violations[0].replacements,
            vec!["[PATIENT_NAME_1]".to_string(), "[PATIENT_NAME_2]".to_string()]
        );
    }

    #[test]
    fn test_residual_tokens_finds_leaks() {
        let result = AnonymizationResult {
            replacement_log: vec![
                row("Name", "John Doe", "[PATIENT_NAME_1]", "[PATIENT_NAME_1]"),
                row("Date", "01/05/2024", "[DATE_1]", "[DATE_1]"),
            ],
            anonymized_text: "Patient John Doe seen on [DATE_1].".to_string(),
            provider_used: "anthropic".to_string(),
            processing_time_seconds: 1.2,
            original_text: None,
        };
        assert_eq!(residual_tokens(&result), vec!["John Doe".to_string()]);
    }

    #[test]
    fn test_clean_result_has_no_residue() {
        let result = AnonymizationResult {
            replacement_log: vec![row(
                "Name",
                "John Doe",
                "[PATIENT_NAME_1]",
                "[PATIENT_NAME_1]",
            )],
            anonymized_text: "Patient [PATIENT_NAME_1] seen on [DATE_1].".to_string(),
            provider_used: "anthropic".to_string(),
            processing_time_seconds: 0.8,
            original_text: Some("Patient John Doe seen on 01/05/2024.".to_string()),
        };
        assert!(residual_tokens(&result).is_empty());
    }
}

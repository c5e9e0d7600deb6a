//! Suspicion lexicon check

use crate::dataset::Record;
use taxon_common::config::SuspicionRule;

/// Comma-joined fields whose lowercased value contains a configured term
///
/// Reported in lexicon order. Terms are expected lowercase already.
pub fn suspicious_fields(record: &Record, rules: &[SuspicionRule]) -> String {
    rules
        .iter()
        .filter(|rule| {
            record.get(&rule.field).is_some_and(|value| {
                let lowered = value.to_lowercase();
                rule.terms.iter().any(|term| lowered.contains(term.as_str()))
            })
        })
        .map(|rule| rule.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

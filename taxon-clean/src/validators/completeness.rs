//! Field-completeness check

use crate::dataset::Record;

/// Comma-joined required fields that are absent or whitespace-only
///
/// Order follows `required`; empty string when nothing is missing.
pub fn missing_fields(record: &Record, required: &[&str]) -> String {
    required
        .iter()
        .copied()
        .filter(|field| record.is_blank(field))
        .collect::<Vec<_>>()
        .join(", ")
}

//! Row issue summary

/// Pipe-joined `"Missing: X | Suspicious: Y | Taxonomy: Z"`, omitting empty segments
pub fn summarize_issues(review_fields: &str, suspicious_fields: &str, taxonomy_issues: &str) -> String {
    [
        ("Missing", review_fields),
        ("Suspicious", suspicious_fields),
        ("Taxonomy", taxonomy_issues),
    ]
    .iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(label, value)| format!("{}: {}", label, value))
    .collect::<Vec<_>>()
    .join(" | ")
}

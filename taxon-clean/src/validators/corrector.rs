//! Conservative auto-correction of ORDER, FAMILY and GENUS
//!
//! Local values are overwritten only when the authority match is of the
//! required type and at least the minimum confidence. Every overwrite is
//! recorded as a `FieldCorrection`.

use crate::authority::LookupOutcome;
use crate::dataset::Record;
use crate::types::TaxonRank;
use std::fmt;
use taxon_common::config::CorrectionConfig;
use tracing::debug;

/// Validation status recorded when the authority could not be queried
pub const LOOKUP_ERROR_STATUS: &str = "GBIF error";

/// Validation status recorded when the authority omits a match type
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Thresholds an authority answer must meet before it overwrites local fields
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionPolicy {
    /// Required match type, compared exactly
    pub match_type: String,
    /// Minimum confidence on a 0-100 scale, inclusive
    pub min_confidence: f64,
}

impl Default for CorrectionPolicy {
    fn default() -> Self {
        CorrectionConfig::default().into()
    }
}

impl From<CorrectionConfig> for CorrectionPolicy {
    fn from(config: CorrectionConfig) -> Self {
        Self {
            match_type: config.match_type,
            min_confidence: config.min_confidence,
        }
    }
}

impl CorrectionPolicy {
    /// Whether an answer with this match type and confidence may be applied
    ///
    /// A missing confidence counts as 0.
    pub fn accepts(&self, match_type: Option<&str>, confidence: Option<f64>) -> bool {
        match_type == Some(self.match_type.as_str())
            && confidence.unwrap_or(0.0) >= self.min_confidence
    }
}

/// One overwritten field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCorrection {
    pub rank: TaxonRank,
    /// Previous value, trimmed (empty when absent)
    pub old: String,
    pub new: String,
}

impl fmt::Display for FieldCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: '{}' → '{}'", self.rank, self.old, self.new)
    }
}

/// Terminal correction state for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionOutcome {
    /// Species missing or generic; never corrected
    Skipped,
    LookupError,
    NoConfidentMatch,
    /// Confident match; may hold no corrections if everything already agreed
    Corrected(Vec<FieldCorrection>),
}

impl CorrectionOutcome {
    /// Text written to the correction_note column
    pub fn note(&self) -> String {
        match self {
            CorrectionOutcome::Skipped => "Skipped - generic name".to_string(),
            CorrectionOutcome::LookupError => "GBIF lookup error".to_string(),
            CorrectionOutcome::NoConfidentMatch => "No confident match".to_string(),
            CorrectionOutcome::Corrected(changes) => changes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    /// Number of fields overwritten
    pub fn changed_fields(&self) -> usize {
        match self {
            CorrectionOutcome::Corrected(changes) => changes.len(),
            _ => 0,
        }
    }
}

/// Record after the correction stage
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub record: Record,
    pub outcome: CorrectionOutcome,
    /// Authority match type, `"Unknown"`, or `"GBIF error"`; `None` when no query was made
    pub validation_status: Option<String>,
}

/// Apply the authority answer to `record` under `policy`
pub fn auto_correct(
    mut record: Record,
    lookup: &LookupOutcome,
    policy: &CorrectionPolicy,
) -> Correction {
    let matched = match lookup {
        LookupOutcome::MissingSpecies | LookupOutcome::GenericSpecies => {
            return Correction {
                record,
                outcome: CorrectionOutcome::Skipped,
                validation_status: None,
            }
        }
        LookupOutcome::Failed(_) => {
            return Correction {
                record,
                outcome: CorrectionOutcome::LookupError,
                validation_status: Some(LOOKUP_ERROR_STATUS.to_string()),
            }
        }
        LookupOutcome::Found(matched) => matched,
    };

    let validation_status = Some(
        matched
            .match_type
            .clone()
            .unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
    );

    if !policy.accepts(matched.match_type.as_deref(), matched.confidence) {
        return Correction {
            record,
            outcome: CorrectionOutcome::NoConfidentMatch,
            validation_status,
        };
    }

    let mut changes = Vec::new();
    for rank in TaxonRank::ALL {
        let new = matched.rank_value(rank).map(str::trim).unwrap_or("");
        if new.is_empty() {
            continue;
        }
        let old = record.get(rank.column()).map(str::trim).unwrap_or("");
        if old.to_lowercase() != new.to_lowercase() {
            changes.push(FieldCorrection {
                rank,
                old: old.to_string(),
                new: new.to_string(),
            });
        }
    }

    for change in &changes {
        debug!(field = %change.rank, old = %change.old, new = %change.new, "Correcting field");
        record.set(change.rank.column(), change.new.clone());
    }

    Correction {
        record,
        outcome: CorrectionOutcome::Corrected(changes),
        validation_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::{AuthorityError, AuthorityMatch};

    fn answer(match_type: &str, confidence: f64) -> AuthorityMatch {
        AuthorityMatch {
            match_type: Some(match_type.to_string()),
            confidence: Some(confidence),
            order: Some("Carnivora".to_string()),
            family: Some(" Ursidae ".to_string()),
            genus: Some("Ursus".to_string()),
            ..Default::default()
        }
    }

    fn bear() -> Record {
        Record::from_pairs([
            ("Species", "Ursus arctos"),
            ("ORDER", "carnivora"),
            ("FAMILY", "Canidae"),
        ])
    }

    #[test]
    fn test_confident_match_overwrites_differing_fields() {
        let lookup = LookupOutcome::Found(answer("EXACT", 98.0));
        let result = auto_correct(bear(), &lookup, &CorrectionPolicy::default());

        assert_eq!(result.validation_status.as_deref(), Some("EXACT"));
        assert_eq!(result.record.get("ORDER"), Some("carnivora"));
        assert_eq!(result.record.get("FAMILY"), Some("Ursidae"));
        assert_eq!(result.record.get("GENUS"), Some("Ursus"));
        assert_eq!(
            result.outcome.note(),
            "FAMILY: 'Canidae' → 'Ursidae'; GENUS: '' → 'Ursus'"
        );
        assert_eq!(result.outcome.changed_fields(), 2);
    }

    #[test]
    fn test_confidence_threshold_is_inclusive() {
        let policy = CorrectionPolicy::default();
        assert!(policy.accepts(Some("EXACT"), Some(90.0)));
        assert!(!policy.accepts(Some("EXACT"), Some(89.9)));
        assert!(!policy.accepts(Some("EXACT"), None));
        assert!(!policy.accepts(Some("exact"), Some(99.0)));
        assert!(!policy.accepts(None, Some(99.0)));
    }

    #[test]
    fn test_low_confidence_leaves_record_untouched() {
        let lookup = LookupOutcome::Found(answer("EXACT", 89.0));
        let result = auto_correct(bear(), &lookup, &CorrectionPolicy::default());

        assert_eq!(result.record, bear());
        assert_eq!(result.outcome, CorrectionOutcome::NoConfidentMatch);
        assert_eq!(result.outcome.note(), "No confident match");
        assert_eq!(result.validation_status.as_deref(), Some("EXACT"));
    }

    #[test]
    fn test_fuzzy_match_not_applied() {
        let lookup = LookupOutcome::Found(answer("FUZZY", 99.0));
        let result = auto_correct(bear(), &lookup, &CorrectionPolicy::default());
        assert_eq!(result.outcome, CorrectionOutcome::NoConfidentMatch);
        assert_eq!(result.validation_status.as_deref(), Some("FUZZY"));
    }

    #[test]
    fn test_missing_match_type_reports_unknown() {
        let lookup = LookupOutcome::Found(AuthorityMatch::default());
        let result = auto_correct(bear(), &lookup, &CorrectionPolicy::default());
        assert_eq!(result.validation_status.as_deref(), Some("Unknown"));
        assert_eq!(result.outcome, CorrectionOutcome::NoConfidentMatch);
    }

    #[test]
    fn test_skip_and_error_states() {
        let policy = CorrectionPolicy::default();

        let skipped = auto_correct(bear(), &LookupOutcome::GenericSpecies, &policy);
        assert_eq!(skipped.outcome.note(), "Skipped - generic name");
        assert_eq!(skipped.validation_status, None);

        let missing = auto_correct(Record::new(), &LookupOutcome::MissingSpecies, &policy);
        assert_eq!(missing.outcome, CorrectionOutcome::Skipped);

        let failed = auto_correct(
            bear(),
            &LookupOutcome::Failed(AuthorityError::Parse("eof".into())),
            &policy,
        );
        assert_eq!(failed.outcome.note(), "GBIF lookup error");
        assert_eq!(failed.validation_status.as_deref(), Some("GBIF error"));
        assert_eq!(failed.record, bear());
    }

    #[test]
    fn test_agreeing_answer_yields_empty_log() {
        let record = Record::from_pairs([
            ("ORDER", "Carnivora"),
            ("FAMILY", "ursidae"),
            ("GENUS", "Ursus"),
        ]);
        let lookup = LookupOutcome::Found(answer("EXACT", 100.0));
        let result = auto_correct(record.clone(), &lookup, &CorrectionPolicy::default());
        assert_eq!(result.outcome, CorrectionOutcome::Corrected(vec![]));
        assert_eq!(result.outcome.note(), "");
        assert_eq!(result.record, record);
    }

    #[test]
    fn test_blank_authority_value_never_overwrites() {
        let mut matched = answer("EXACT", 95.0);
        matched.family = Some("  ".to_string());
        let result = auto_correct(bear(), &LookupOutcome::Found(matched), &CorrectionPolicy::default());
        assert_eq!(result.record.get("FAMILY"), Some("Canidae"));
    }
}

//! Cleaning workflow
//!
//! Each record goes through: completeness check → suspicion check →
//! authority lookup (once) → hierarchy validation → auto-correction →
//! summary. The orchestrator collects the enriched records into the output
//! dataset and fixes the output column order.

pub mod pipeline;
pub mod statistics;

pub use pipeline::{CleanRun, Pipeline, PipelineConfig};
pub use statistics::RunStatistics;

use crate::dataset::Record;
use crate::types::{
    CORRECTION_NOTE, NEEDS_REVIEW, REVIEW_FIELDS, ROW_ISSUE_SUMMARY, SPECIES_VALIDATION_STATUS,
    SUSPICIOUS_FIELDS, TAXONOMY_HIERARCHY_ISSUES,
};
use crate::validators::{CorrectionOutcome, HierarchyOutcome};

/// Derived values computed for one record
#[derive(Debug, Clone, PartialEq)]
pub struct RowAnnotations {
    pub review_fields: String,
    pub suspicious_fields: String,
    pub hierarchy: HierarchyOutcome,
    pub correction: CorrectionOutcome,
    pub species_validation_status: Option<String>,
    pub row_issue_summary: String,
    pub needs_review: bool,
}

impl RowAnnotations {
    pub fn taxonomy_hierarchy_issues(&self) -> String {
        self.hierarchy.to_string()
    }

    pub fn correction_note(&self) -> String {
        self.correction.note()
    }
}

/// Record after all stages, with its annotations kept typed
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    /// Input record, with GENUS derived and any corrections applied
    pub record: Record,
    pub annotations: RowAnnotations,
}

impl EnrichedRecord {
    /// Flatten into a dataset row, overwriting any stale derived cells
    pub fn into_record(self) -> Record {
        let taxonomy_issues = self.annotations.taxonomy_hierarchy_issues();
        let note = self.annotations.correction_note();
        let EnrichedRecord {
            mut record,
            annotations,
        } = self;

        record.set(REVIEW_FIELDS, annotations.review_fields);
        record.set(SUSPICIOUS_FIELDS, annotations.suspicious_fields);
        record.set(TAXONOMY_HIERARCHY_ISSUES, taxonomy_issues);
        record.set(
            SPECIES_VALIDATION_STATUS,
            annotations.species_validation_status.unwrap_or_default(),
        );
        record.set(ROW_ISSUE_SUMMARY, annotations.row_issue_summary);
        record.set(NEEDS_REVIEW, annotations.needs_review.to_string());
        record.set(CORRECTION_NOTE, note);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxonRank;

    #[test]
    fn test_into_record_writes_every_derived_cell() {
        let enriched = EnrichedRecord {
            record: Record::from_pairs([("Species", "Ursus arctos"), ("needs_review", "stale")]),
            annotations: RowAnnotations {
                review_fields: "AGE".into(),
                suspicious_fields: String::new(),
                hierarchy: HierarchyOutcome::Checked(vec![TaxonRank::Order, TaxonRank::Genus]),
                correction: CorrectionOutcome::NoConfidentMatch,
                species_validation_status: Some("FUZZY".into()),
                row_issue_summary: "Missing: AGE | Taxonomy: ORDER mismatch, GENUS mismatch"
                    .into(),
                needs_review: true,
            },
        };

        let record = enriched.into_record();
        assert_eq!(record.cell(REVIEW_FIELDS), "AGE");
        assert_eq!(record.cell(SUSPICIOUS_FIELDS), "");
        assert_eq!(
            record.cell(TAXONOMY_HIERARCHY_ISSUES),
            "ORDER mismatch, GENUS mismatch"
        );
        assert_eq!(record.cell(SPECIES_VALIDATION_STATUS), "FUZZY");
        assert_eq!(record.cell(NEEDS_REVIEW), "true");
        assert_eq!(record.cell(CORRECTION_NOTE), "No confident match");
        assert_eq!(record.cell("Species"), "Ursus arctos");
    }

    #[test]
    fn test_skipped_record_has_blank_status() {
        let enriched = EnrichedRecord {
            record: Record::new(),
            annotations: RowAnnotations {
                review_fields: "Species".into(),
                suspicious_fields: String::new(),
                hierarchy: HierarchyOutcome::MissingSpecies,
                correction: CorrectionOutcome::Skipped,
                species_validation_status: None,
                row_issue_summary: "Missing: Species | Taxonomy: Missing species".into(),
                needs_review: true,
            },
        };

        let record = enriched.into_record();
        assert_eq!(record.cell(SPECIES_VALIDATION_STATUS), "");
        assert_eq!(record.cell(TAXONOMY_HIERARCHY_ISSUES), "Missing species");
        assert_eq!(record.cell(CORRECTION_NOTE), "Skipped - generic name");
    }
}

//! Run statistics
//!
//! Display: "N records: R flagged for review, C corrected (F fields), ..."

use super::EnrichedRecord;
use crate::validators::{CorrectionOutcome, HierarchyOutcome};
use serde::{Deserialize, Serialize};

/// Counters accumulated over one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Records in the input dataset
    pub total: usize,
    /// Records that finished all stages
    pub processed: usize,
    pub flagged_for_review: usize,
    /// Records with at least one field overwritten
    pub corrected: usize,
    /// Individual field overwrites
    pub fields_corrected: usize,
    /// Missing or generic species; never sent to the authority
    pub skipped: usize,
    pub lookup_errors: usize,
    pub no_confident_match: usize,
    pub proxy_matches: usize,
    /// Records with at least one rank mismatch
    pub hierarchy_mismatches: usize,
}

impl RunStatistics {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Fold one finished record into the counters
    pub fn record(&mut self, enriched: &EnrichedRecord) {
        let annotations = &enriched.annotations;
        self.processed += 1;

        if annotations.needs_review {
            self.flagged_for_review += 1;
        }

        match &annotations.correction {
            CorrectionOutcome::Skipped => self.skipped += 1,
            CorrectionOutcome::LookupError => self.lookup_errors += 1,
            CorrectionOutcome::NoConfidentMatch => self.no_confident_match += 1,
            CorrectionOutcome::Corrected(changes) => {
                if !changes.is_empty() {
                    self.corrected += 1;
                    self.fields_corrected += changes.len();
                }
            }
        }

        match &annotations.hierarchy {
            HierarchyOutcome::ProxyMatch => self.proxy_matches += 1,
            HierarchyOutcome::Checked(mismatches) if !mismatches.is_empty() => {
                self.hierarchy_mismatches += 1
            }
            _ => {}
        }
    }

    /// Records that reached the authority
    pub fn authority_queries(&self) -> usize {
        self.processed - self.skipped
    }

    pub fn display_string(&self) -> String {
        format!(
            "{} of {} records: {} flagged for review, {} corrected ({} fields), \
             {} skipped, {} lookup errors, {} without confident match",
            self.processed,
            self.total,
            self.flagged_for_review,
            self.corrected,
            self.fields_corrected,
            self.skipped,
            self.lookup_errors,
            self.no_confident_match
        )
    }
}

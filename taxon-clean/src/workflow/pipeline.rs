//! Pipeline Orchestrator
//!
//! Runs every record of a dataset through the cleaning stages, strictly one
//! record at a time, and assembles the enriched output dataset.
//!
//! # Error Handling
//! - A dataset without a `Species` column is rejected before any record runs
//! - Authority failures are isolated per record and degrade to sentinel text
//!
//! # Example
//! ```rust,ignore
//! let pipeline = Pipeline::new(CachedAuthority::new(gbif), PipelineConfig::default());
//! let run = pipeline.run(dataset).await?;
//! write_csv(&run.dataset, &output_path)?;
//! ```

use super::{EnrichedRecord, RowAnnotations, RunStatistics};
use crate::authority::{lookup_species, TaxonomyAuthority};
use crate::dataset::{Dataset, Record};
use crate::error::{CleanError, CleanResult};
use crate::types::{
    genus_from_species, CORRECTION_NOTE, DERIVED_COLUMNS, GENUS, REQUIRED_FIELDS, SPECIES,
};
use crate::validators::{
    auto_correct, missing_fields, summarize_issues, suspicious_fields, validate_hierarchy,
    CorrectionPolicy,
};
use chrono::Utc;
use taxon_common::config::{SuspicionRule, TomlConfig};
use taxon_common::events::{CleanerEvent, EventBus};
use tracing::{debug, info};
use uuid::Uuid;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fields reported when blank, in reporting order
    pub required_fields: Vec<String>,
    /// Ordered suspicion lexicon
    pub suspicion_rules: Vec<SuspicionRule>,
    pub correction_policy: CorrectionPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_toml(&TomlConfig::default())
    }
}

impl PipelineConfig {
    pub fn from_toml(config: &TomlConfig) -> Self {
        Self {
            required_fields: REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
            suspicion_rules: config.suspicion_rules(),
            correction_policy: config.correction.clone().into(),
        }
    }
}

/// Output of one completed run
#[derive(Debug, Clone)]
pub struct CleanRun {
    pub run_id: Uuid,
    /// Input schema plus derived columns, `correction_note` last
    pub dataset: Dataset,
    pub statistics: RunStatistics,
}

/// Pipeline orchestrator
pub struct Pipeline<A> {
    authority: A,
    config: PipelineConfig,
    event_bus: Option<EventBus>,
}

impl<A: TaxonomyAuthority> Pipeline<A> {
    /// Create new pipeline with configuration
    pub fn new(authority: A, config: PipelineConfig) -> Self {
        Self {
            authority,
            config,
            event_bus: None,
        }
    }

    /// Create pipeline that reports progress on `event_bus`
    pub fn with_events(authority: A, config: PipelineConfig, event_bus: EventBus) -> Self {
        Self {
            authority,
            config,
            event_bus: Some(event_bus),
        }
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every record of `dataset` through all stages
    ///
    /// # Errors
    /// Only `CleanError::MissingColumn` when the `Species` column is absent.
    /// Per-record authority failures never abort the run.
    pub async fn run(&self, dataset: Dataset) -> CleanResult<CleanRun> {
        if !dataset.has_column(SPECIES) {
            return Err(CleanError::MissingColumn(SPECIES.to_string()));
        }

        let run_id = Uuid::new_v4();
        let total = dataset.len();
        info!(
            run_id = %run_id,
            records = total,
            authority = self.authority.name(),
            "Cleaning run started"
        );

        self.emit(CleanerEvent::RunStarted {
            run_id,
            total_records: total,
            timestamp: Utc::now(),
        });

        let mut dataset = dataset;
        if !dataset.has_column(GENUS) {
            derive_genus_column(&mut dataset);
        }

        let mut output = Dataset::new(dataset.columns().to_vec());
        for column in DERIVED_COLUMNS {
            output.ensure_column(column);
        }
        output.move_column_to_end(CORRECTION_NOTE);

        let mut statistics = RunStatistics::new(total);
        for (index, record) in dataset.into_rows().into_iter().enumerate() {
            let enriched = self.process_record(record).await;
            statistics.record(&enriched);

            self.emit(CleanerEvent::RecordProcessed {
                run_id,
                processed: index + 1,
                total_records: total,
                needs_review: enriched.annotations.needs_review,
                timestamp: Utc::now(),
            });

            output.push(enriched.into_record());
        }

        info!(run_id = %run_id, "{}", statistics.display_string());

        self.emit(CleanerEvent::RunCompleted {
            run_id,
            total_records: total,
            flagged_for_review: statistics.flagged_for_review,
            corrected: statistics.corrected,
            lookup_errors: statistics.lookup_errors,
            timestamp: Utc::now(),
        });

        Ok(CleanRun {
            run_id,
            dataset: output,
            statistics,
        })
    }

    /// Run one record through all stages
    ///
    /// The authority is queried at most once; the same answer feeds both the
    /// hierarchy check and the correction stage.
    pub async fn process_record(&self, record: Record) -> EnrichedRecord {
        let required: Vec<&str> = self.config.required_fields.iter().map(String::as_str).collect();
        let review_fields = missing_fields(&record, &required);
        let suspicious_fields = suspicious_fields(&record, &self.config.suspicion_rules);

        let lookup = lookup_species(&self.authority, record.get(SPECIES)).await;
        let hierarchy = validate_hierarchy(&record, &lookup);
        let correction = auto_correct(record, &lookup, &self.config.correction_policy);

        let row_issue_summary =
            summarize_issues(&review_fields, &suspicious_fields, &hierarchy.to_string());
        let needs_review = !row_issue_summary.is_empty();

        debug!(
            species = ?correction.record.get(SPECIES),
            hierarchy = %hierarchy,
            note = %correction.outcome.note(),
            needs_review,
            "Record processed"
        );

        EnrichedRecord {
            record: correction.record,
            annotations: RowAnnotations {
                review_fields,
                suspicious_fields,
                hierarchy,
                correction: correction.outcome,
                species_validation_status: correction.validation_status,
                row_issue_summary,
                needs_review,
            },
        }
    }

    fn emit(&self, event: CleanerEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit_lossy(event);
        }
    }
}

/// Add a GENUS column holding the first token of each record's species
fn derive_genus_column(dataset: &mut Dataset) {
    for record in dataset.rows_mut() {
        let genus = record
            .get(SPECIES)
            .and_then(genus_from_species)
            .unwrap_or("")
            .to_string();
        record.set(GENUS, genus);
    }
    dataset.ensure_column(GENUS);
}

//! Error types for taxon-clean
//!
//! Only dataset-level problems surface here. Per-record authority failures
//! are carried as `AuthorityError` values and degraded inside the pipeline.

use thiserror::Error;

/// Run-level error type
#[derive(Debug, Error)]
pub enum CleanError {
    /// A column the run cannot start without is absent
    #[error("The dataset must contain a '{0}' column")]
    MissingColumn(String),

    /// Header row names the same column twice
    #[error("Duplicate column in header: {0}")]
    DuplicateColumn(String),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// taxon-common error
    #[error("Common error: {0}")]
    Common(#[from] taxon_common::Error),
}

/// Result type for run-level operations
pub type CleanResult<T> = Result<T, CleanError>;

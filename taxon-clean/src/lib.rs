//! taxon-clean library interface
//!
//! Validates and corrects taxonomic records in specimen inventories against a
//! species-name authority, flags data-quality issues and produces an annotated
//! dataset.

pub mod authority;
pub mod config;
pub mod dataset;
pub mod error;
pub mod types;
pub mod validators;
pub mod workflow;

pub use crate::error::{CleanError, CleanResult};
pub use crate::workflow::{CleanRun, Pipeline, PipelineConfig};

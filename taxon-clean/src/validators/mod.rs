//! Row-level checks
//!
//! # Validators
//! 1. **completeness** - blank required fields
//! 2. **suspicion** - low-confidence terms in selected fields
//! 3. **hierarchy** - local ORDER/FAMILY/GENUS against the authority
//! 4. **corrector** - conservative overwrite of local ranks from the authority
//! 5. **summary** - one issue string and review flag per row

pub mod completeness;
pub mod corrector;
pub mod hierarchy;
pub mod summary;
pub mod suspicion;

pub use completeness::missing_fields;
pub use corrector::{auto_correct, Correction, CorrectionOutcome, CorrectionPolicy, FieldCorrection};
pub use hierarchy::{compare_field, validate_hierarchy, HierarchyOutcome};
pub use summary::summarize_issues;
pub use suspicion::suspicious_fields;

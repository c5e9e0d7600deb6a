//! Shared column names and taxonomy vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scientific name column; the only column a dataset must have
pub const SPECIES: &str = "Species";
pub const ORDER: &str = "ORDER";
pub const FAMILY: &str = "FAMILY";
pub const GENUS: &str = "GENUS";

// Derived columns, in the order they are appended to the schema
pub const REVIEW_FIELDS: &str = "review_fields";
pub const SUSPICIOUS_FIELDS: &str = "suspicious_fields";
pub const TAXONOMY_HIERARCHY_ISSUES: &str = "taxonomy_hierarchy_issues";
pub const SPECIES_VALIDATION_STATUS: &str = "species_validation_status";
pub const ROW_ISSUE_SUMMARY: &str = "row_issue_summary";
pub const NEEDS_REVIEW: &str = "needs_review";
pub const CORRECTION_NOTE: &str = "correction_note";

pub const DERIVED_COLUMNS: [&str; 7] = [
    REVIEW_FIELDS,
    SUSPICIOUS_FIELDS,
    TAXONOMY_HIERARCHY_ISSUES,
    SPECIES_VALIDATION_STATUS,
    ROW_ISSUE_SUMMARY,
    NEEDS_REVIEW,
    CORRECTION_NOTE,
];

/// Fields checked for blank values, in reporting order
pub const REQUIRED_FIELDS: [&str; 11] = [
    "Original Catalog Number",
    ORDER,
    FAMILY,
    "SUBFAMILY",
    SPECIES,
    "Common Name",
    "AGE",
    "CONDITION",
    "COMPLETENESS",
    "RANK",
    "PHOTO?",
];

/// Substrings marking a species value as not resolved to an exact species
pub const GENERIC_MARKERS: [&str; 4] = ["sp.", "cf.", "undetermined", "unknown"];

/// Taxonomic ranks reconciled against the authority, in check order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxonRank {
    Order,
    Family,
    Genus,
}

impl TaxonRank {
    pub const ALL: [TaxonRank; 3] = [TaxonRank::Order, TaxonRank::Family, TaxonRank::Genus];

    /// Dataset column holding this rank
    pub fn column(self) -> &'static str {
        match self {
            TaxonRank::Order => ORDER,
            TaxonRank::Family => FAMILY,
            TaxonRank::Genus => GENUS,
        }
    }
}

impl fmt::Display for TaxonRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// How a species value relates to authority lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesName<'a> {
    /// Absent or whitespace-only
    Missing,
    /// Contains a generic marker
    Generic,
    /// Usable as an authority query (trimmed)
    Resolvable(&'a str),
}

impl<'a> SpeciesName<'a> {
    pub fn classify(value: Option<&'a str>) -> Self {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return SpeciesName::Missing;
        };
        if is_generic(value) {
            SpeciesName::Generic
        } else {
            SpeciesName::Resolvable(value)
        }
    }
}

/// True when the value contains any generic marker (case-insensitive)
pub fn is_generic(value: &str) -> bool {
    let lowered = value.to_lowercase();
    GENERIC_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// First whitespace-delimited token of a species value
pub fn genus_from_species(species: &str) -> Option<&str> {
    species.split_whitespace().next()
}

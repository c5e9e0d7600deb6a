//! Hierarchy validation against the authority answer

use crate::authority::LookupOutcome;
use crate::dataset::Record;
use crate::types::TaxonRank;
use std::fmt;

/// Compare a local value with the authority's value
///
/// `None` when either side is absent (no verdict), otherwise whether the
/// trimmed, lowercased values are identical.
pub fn compare_field(local: Option<&str>, authority: Option<&str>) -> Option<bool> {
    let (local, authority) = (local?, authority?);
    Some(local.trim().to_lowercase() == authority.trim().to_lowercase())
}

/// Outcome of checking one record's ranks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyOutcome {
    MissingSpecies,
    GenericSpecies,
    LookupFailed,
    ProxyMatch,
    /// Ranks that disagree with the authority, in check order (empty = consistent)
    Checked(Vec<TaxonRank>),
}

impl HierarchyOutcome {
    pub fn is_consistent(&self) -> bool {
        matches!(self, HierarchyOutcome::Checked(mismatches) if mismatches.is_empty())
    }
}

impl fmt::Display for HierarchyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HierarchyOutcome::MissingSpecies => f.write_str("Missing species"),
            HierarchyOutcome::GenericSpecies => f.write_str("Generic/Undetermined species"),
            HierarchyOutcome::LookupFailed => f.write_str("GBIF error"),
            HierarchyOutcome::ProxyMatch => f.write_str("Proxy match"),
            HierarchyOutcome::Checked(mismatches) => {
                let labels: Vec<String> = mismatches
                    .iter()
                    .map(|rank| format!("{} mismatch", rank))
                    .collect();
                f.write_str(&labels.join(", "))
            }
        }
    }
}

/// Check ORDER, FAMILY and GENUS of `record` against the lookup result
pub fn validate_hierarchy(record: &Record, lookup: &LookupOutcome) -> HierarchyOutcome {
    let matched = match lookup {
        LookupOutcome::MissingSpecies => return HierarchyOutcome::MissingSpecies,
        LookupOutcome::GenericSpecies => return HierarchyOutcome::GenericSpecies,
        LookupOutcome::Failed(_) => return HierarchyOutcome::LookupFailed,
        LookupOutcome::Found(matched) => matched,
    };

    if matched.proxy {
        return HierarchyOutcome::ProxyMatch;
    }

    HierarchyOutcome::Checked(
        TaxonRank::ALL
            .into_iter()
            .filter(|rank| {
                compare_field(record.get(rank.column()), matched.rank_value(*rank)) == Some(false)
            })
            .collect(),
    )
}

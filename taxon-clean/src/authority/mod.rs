//! Species-name authority
//!
//! The authority answers a scientific name with its best-match classification.
//! Callers get an explicit `Result` and decide themselves whether a failure
//! degrades or propagates.

pub mod cache;
pub mod gbif_client;

pub use cache::CachedAuthority;
pub use gbif_client::GbifClient;

use crate::types::{SpeciesName, TaxonRank};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Authority lookup failures; all are treated alike by the pipeline
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorityError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Best-match answer for one scientific name
///
/// Field names follow the GBIF species-match payload. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityMatch {
    /// EXACT, FUZZY, HIGHERRANK, NONE, ...
    #[serde(default)]
    pub match_type: Option<String>,
    /// 0-100
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub genus: Option<String>,
    /// Approximate fallback rather than a direct hit
    #[serde(default)]
    pub proxy: bool,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub canonical_name: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub usage_key: Option<u64>,
}

impl AuthorityMatch {
    /// Authority value for a rank, `None` when absent
    pub fn rank_value(&self, rank: TaxonRank) -> Option<&str> {
        match rank {
            TaxonRank::Order => self.order.as_deref(),
            TaxonRank::Family => self.family.as_deref(),
            TaxonRank::Genus => self.genus.as_deref(),
        }
    }
}

/// External species-name authority
#[async_trait]
pub trait TaxonomyAuthority: Send + Sync {
    /// Authority name for logging
    fn name(&self) -> &'static str;

    /// Look up the best match for an exact scientific name
    async fn match_name(&self, name: &str) -> Result<AuthorityMatch, AuthorityError>;
}

#[async_trait]
impl<T: TaxonomyAuthority + ?Sized> TaxonomyAuthority for std::sync::Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn match_name(&self, name: &str) -> Result<AuthorityMatch, AuthorityError> {
        (**self).match_name(name).await
    }
}

/// Result of resolving one record's species against the authority
///
/// Computed once per record and shared by every stage that needs the answer.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Species absent or blank; no query was made
    MissingSpecies,
    /// Species carries a generic marker; no query was made
    GenericSpecies,
    Found(AuthorityMatch),
    Failed(AuthorityError),
}

/// Query the authority for a species value unless it is missing or generic
pub async fn lookup_species<A>(authority: &A, species: Option<&str>) -> LookupOutcome
where
    A: TaxonomyAuthority + ?Sized,
{
    match SpeciesName::classify(species) {
        SpeciesName::Missing => LookupOutcome::MissingSpecies,
        SpeciesName::Generic => LookupOutcome::GenericSpecies,
        SpeciesName::Resolvable(name) => match authority.match_name(name).await {
            Ok(matched) => LookupOutcome::Found(matched),
            Err(e) => {
                warn!(
                    authority = authority.name(),
                    species = %name,
                    error = %e,
                    "Authority lookup failed"
                );
                LookupOutcome::Failed(e)
            }
        },
    }
}

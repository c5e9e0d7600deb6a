//! Configuration loading and config file resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "TAXON_CLEAN_CONFIG";

/// Default GBIF species-matching endpoint
pub const DEFAULT_AUTHORITY_URL: &str = "https://api.gbif.org/v1/species/match";

/// Per-call authority timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Minimum confidence (0-100) before an authority answer may overwrite local fields
pub const DEFAULT_MIN_CONFIDENCE: f64 = 90.0;

/// Match type required before an authority answer may overwrite local fields
pub const DEFAULT_MATCH_TYPE: &str = "EXACT";

/// Standard user-agent for outgoing HTTP requests
pub fn get_user_agent() -> String {
    format!("taxon-clean/{}", env!("CARGO_PKG_VERSION"))
}

/// Top-level TOML configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub authority: AuthorityConfig,
    pub correction: CorrectionConfig,
    /// Ordered suspicion lexicon; empty means the built-in lexicon
    pub suspicion: Vec<SuspicionRule>,
}

/// Logging section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Species-name authority section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorityConfig {
    /// Base URL of the name-matching endpoint; the name goes in the `name` query parameter
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
    /// Throttle for outgoing lookups (0 = unlimited)
    pub requests_per_second: u32,
    /// Memoize successful answers per distinct species name within a run
    pub cache_lookups: bool,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            requests_per_second: 0,
            cache_lookups: true,
        }
    }
}

/// Auto-correction thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    pub min_confidence: f64,
    pub match_type: String,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            match_type: DEFAULT_MATCH_TYPE.to_string(),
        }
    }
}

/// One field of the suspicion lexicon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspicionRule {
    pub field: String,
    /// Substrings matched against the lowercased field value
    pub terms: Vec<String>,
}

impl SuspicionRule {
    pub fn new(field: &str, terms: &[&str]) -> Self {
        Self {
            field: field.to_string(),
            terms: terms.iter().map(|t| t.to_lowercase()).collect(),
        }
    }
}

/// Built-in suspicion lexicon, in reporting order
pub fn default_suspicion_rules() -> Vec<SuspicionRule> {
    vec![
        SuspicionRule::new("Species", &["undetermined", "unknown", "sp.", "cf."]),
        SuspicionRule::new("Common Name", &["undetermined", "unknown"]),
        SuspicionRule::new("AGE", &["indeterminate", "unknown"]),
        SuspicionRule::new("CONDITION", &["poor", "fair"]),
        SuspicionRule::new("COMPLETENESS", &["fragment", "element"]),
    ]
}

impl TomlConfig {
    /// Suspicion lexicon to apply: the configured rules, or the built-in ones
    pub fn suspicion_rules(&self) -> Vec<SuspicionRule> {
        if self.suspicion.is_empty() {
            default_suspicion_rules()
        } else {
            self.suspicion
                .iter()
                .map(|rule| SuspicionRule {
                    field: rule.field.clone(),
                    terms: rule.terms.iter().map(|t| t.to_lowercase()).collect(),
                })
                .collect()
        }
    }
}

/// Where the config file path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine,
    Environment,
    PlatformDefault,
}

/// Config file resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. Platform config directory (only if the file exists)
///
/// Returns `None` when no file applies and built-in defaults should be used.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<(PathBuf, ConfigSource)> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some((path.to_path_buf(), ConfigSource::CommandLine));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some((PathBuf::from(path), ConfigSource::Environment));
        }
    }

    // Priority 3: Platform default, only when present
    default_config_path()
        .filter(|p| p.exists())
        .map(|p| (p, ConfigSource::PlatformDefault))
}

/// Platform config file location (~/.config/taxon-clean/config.toml on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("taxon-clean").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Parse TOML config text
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    let config: TomlConfig =
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &TomlConfig) -> Result<()> {
    if config.authority.timeout_secs == 0 {
        return Err(Error::Config(
            "authority.timeout_secs must be greater than zero".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&config.correction.min_confidence) {
        return Err(Error::Config(format!(
            "correction.min_confidence must be within 0-100, got {}",
            config.correction.min_confidence
        )));
    }
    if let Some(rule) = config.suspicion.iter().find(|r| r.field.trim().is_empty()) {
        return Err(Error::Config(format!(
            "suspicion rule with terms {:?} has an empty field name",
            rule.terms
        )));
    }
    Ok(())
}

/// Resolve and load configuration, falling back to defaults when no file applies
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    match resolve_config_path(cli_arg) {
        Some((path, source)) => {
            info!("Loading configuration from {} ({:?})", path.display(), source);
            load_toml_config(&path)
        }
        None => {
            debug!("No configuration file found, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Write config atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

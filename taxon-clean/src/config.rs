//! Configuration resolution for taxon-clean
//!
//! Authority URL priority: CLI → ENV → TOML → built-in default.

use taxon_common::config::{TomlConfig, DEFAULT_AUTHORITY_URL};
use tracing::{info, warn};

/// Environment variable overriding the authority endpoint
pub const AUTHORITY_URL_ENV_VAR: &str = "TAXON_CLEAN_GBIF_URL";

/// Resolve the authority base URL from CLI, environment and TOML
pub fn resolve_authority_url(cli_url: Option<&str>, toml_config: &TomlConfig) -> String {
    let cli_url = cli_url.filter(|u| is_valid_url(u));
    let env_url = std::env::var(AUTHORITY_URL_ENV_VAR)
        .ok()
        .filter(|u| is_valid_url(u));
    let toml_url = toml_config
        .authority
        .base_url
        .as_deref()
        .filter(|u| is_valid_url(u));

    let mut sources = Vec::new();
    if cli_url.is_some() {
        sources.push("command line");
    }
    if env_url.is_some() {
        sources.push("environment");
    }
    if toml_url.is_some() {
        sources.push("TOML");
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "Authority URL found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    if let Some(url) = cli_url {
        info!("Authority URL from command line: {}", url);
        return url.to_string();
    }

    if let Some(url) = env_url {
        info!("Authority URL from environment variable: {}", url);
        return url;
    }

    if let Some(url) = toml_url {
        info!("Authority URL from TOML config: {}", url);
        return url.to_string();
    }

    DEFAULT_AUTHORITY_URL.to_string()
}

/// Non-empty http(s) URL
pub fn is_valid_url(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}

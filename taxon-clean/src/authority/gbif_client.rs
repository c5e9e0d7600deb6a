//! GBIF species-match client
//!
//! Queries `GET <base_url>?name=<scientific name>` and decodes the best match.
//! One attempt per call with a fixed timeout; there is no retry.
//!
//! # API Reference
//! - Endpoint: https://api.gbif.org/v1/species/match
//! - Documentation: https://techdocs.gbif.org/en/openapi/v1/species

use super::{AuthorityError, AuthorityMatch, TaxonomyAuthority};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use std::num::NonZeroU32;
use std::time::Duration;
use taxon_common::config::{get_user_agent, AuthorityConfig, DEFAULT_AUTHORITY_URL};
use tracing::debug;

type DirectRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// GBIF name-matching client
pub struct GbifClient {
    /// HTTP client with the per-call timeout applied
    client: Client,
    base_url: String,
    timeout_secs: u64,
    /// Present only when a request rate was configured
    rate_limiter: Option<DirectRateLimiter>,
}

impl GbifClient {
    /// Create a client against `base_url`
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, AuthorityError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| AuthorityError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout_secs: timeout.as_secs(),
            rate_limiter: None,
        })
    }

    /// Create a client from the `[authority]` config section
    ///
    /// `base_url` overrides the configured URL (already resolved by the caller).
    pub fn from_config(
        config: &AuthorityConfig,
        base_url: Option<String>,
    ) -> Result<Self, AuthorityError> {
        let user_agent = config.user_agent.clone().unwrap_or_else(get_user_agent);
        let base_url = base_url
            .or_else(|| config.base_url.clone())
            .unwrap_or_else(|| DEFAULT_AUTHORITY_URL.to_string());

        let client = Self::new(
            base_url,
            Duration::from_secs(config.timeout_secs),
            &user_agent,
        )?;
        Ok(client.with_rate_limit(config.requests_per_second))
    }

    /// Throttle lookups to `per_second` requests (0 disables throttling)
    pub fn with_rate_limit(mut self, per_second: u32) -> Self {
        self.rate_limiter = NonZeroU32::new(per_second)
            .map(|rate| RateLimiter::direct(Quota::per_second(rate)));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TaxonomyAuthority for GbifClient {
    fn name(&self) -> &'static str {
        "GBIF"
    }

    async fn match_name(&self, name: &str) -> Result<AuthorityMatch, AuthorityError> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        debug!(name = %name, url = %self.base_url, "Querying GBIF species match");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthorityError::Timeout(self.timeout_secs)
                } else {
                    AuthorityError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthorityError::Api(status.as_u16(), body));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                AuthorityError::Timeout(self.timeout_secs)
            } else {
                AuthorityError::Network(e.to_string())
            }
        })?;

        let matched: AuthorityMatch = serde_json::from_str(&body)
            .map_err(|e| AuthorityError::Parse(e.to_string()))?;

        debug!(
            name = %name,
            match_type = ?matched.match_type,
            confidence = ?matched.confidence,
            "GBIF match received"
        );

        Ok(matched)
    }
}

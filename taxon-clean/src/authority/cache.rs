//! Per-run memoization of authority answers
//!
//! Keyed by the trimmed scientific name. Only successful answers are kept, so
//! a transient failure for one record does not decide the outcome of later
//! records with the same name.

use super::{AuthorityError, AuthorityMatch, TaxonomyAuthority};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// Authority wrapper that answers repeated names from memory
pub struct CachedAuthority<A> {
    inner: A,
    entries: Mutex<HashMap<String, AuthorityMatch>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<A: TaxonomyAuthority> CachedAuthority<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Lookups answered from memory
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups forwarded to the wrapped authority
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: TaxonomyAuthority> TaxonomyAuthority for CachedAuthority<A> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn match_name(&self, name: &str) -> Result<AuthorityMatch, AuthorityError> {
        let key = name.trim();

        if let Some(found) = self.entries.lock().await.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(name = %key, "Authority cache hit");
            return Ok(found.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let answer = self.inner.match_name(key).await?;
        self.entries
            .lock()
            .await
            .insert(key.to_string(), answer.clone());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    /// Answers every name, failing the first call for names listed in `fail_once`
    struct CountingAuthority {
        calls: StdMutex<Vec<String>>,
        fail_once: StdMutex<Vec<String>>,
    }

    impl CountingAuthority {
        fn new(fail_once: &[&str]) -> Self {
            Self {
                calls: StdMutex::new(Vec::new()),
                fail_once: StdMutex::new(fail_once.iter().map(|s| s.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl TaxonomyAuthority for CountingAuthority {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn match_name(&self, name: &str) -> Result<AuthorityMatch, AuthorityError> {
            self.calls.lock().unwrap().push(name.to_string());
            let mut fail_once = self.fail_once.lock().unwrap();
            if let Some(pos) = fail_once.iter().position(|n| n == name) {
                fail_once.remove(pos);
                return Err(AuthorityError::Timeout(10));
            }
            Ok(AuthorityMatch {
                match_type: Some("EXACT".to_string()),
                canonical_name: Some(name.to_string()),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_repeated_name_served_from_cache() {
        let cache = CachedAuthority::new(CountingAuthority::new(&[]));

        let first = cache.match_name("Ursus arctos").await.unwrap();
        let second = cache.match_name("  Ursus arctos ").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.inner().calls.lock().unwrap().len(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[tokio::test]
    async fn test_failures_not_cached() {
        let cache = CachedAuthority::new(CountingAuthority::new(&["Canis lupus"]));

        assert!(cache.match_name("Canis lupus").await.is_err());
        assert!(cache.match_name("Canis lupus").await.is_ok());
        assert!(cache.match_name("Canis lupus").await.is_ok());

        assert_eq!(cache.inner().calls.lock().unwrap().len(), 2);
        assert_eq!(cache.hits(), 1);
    }
}

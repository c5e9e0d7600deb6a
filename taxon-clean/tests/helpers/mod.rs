//! Test Helper Utilities
//!
//! Shared utilities for testing taxon-clean

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use tokio::net::TcpListener;
use taxon_clean::authority::{AuthorityError, AuthorityMatch, TaxonomyAuthority};
use taxon_clean::dataset::{Dataset, Record};

/// Scripted authority that records every name it is asked about
///
/// Names without a scripted answer get a `NONE` match.
pub struct ScriptedAuthority {
    answers: HashMap<String, Result<AuthorityMatch, AuthorityError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedAuthority {
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn answer(mut self, name: &str, matched: AuthorityMatch) -> Self {
        self.answers.insert(name.to_string(), Ok(matched));
        self
    }

    pub fn fail(mut self, name: &str, error: AuthorityError) -> Self {
        self.answers.insert(name.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TaxonomyAuthority for ScriptedAuthority {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn match_name(&self, name: &str) -> Result<AuthorityMatch, AuthorityError> {
        self.calls.lock().unwrap().push(name.to_string());
        self.answers.get(name).cloned().unwrap_or_else(|| {
            Ok(AuthorityMatch {
                match_type: Some("NONE".to_string()),
                confidence: Some(100.0),
                ..Default::default()
            })
        })
    }
}

/// Authority answer with match type, confidence and ranks
pub fn matched(
    match_type: &str,
    confidence: f64,
    order: &str,
    family: &str,
    genus: &str,
) -> AuthorityMatch {
    AuthorityMatch {
        match_type: Some(match_type.to_string()),
        confidence: Some(confidence),
        order: Some(order.to_string()),
        family: Some(family.to_string()),
        genus: Some(genus.to_string()),
        ..Default::default()
    }
}

/// Columns of a typical mammal inventory export
pub const INVENTORY_COLUMNS: [&str; 12] = [
    "Original Catalog Number",
    "ORDER",
    "FAMILY",
    "SUBFAMILY",
    "GENUS",
    "Species",
    "Common Name",
    "AGE",
    "CONDITION",
    "COMPLETENESS",
    "RANK",
    "PHOTO?",
];

/// Fully populated specimen row, with `overrides` applied on top
pub fn specimen(catalog: &str, species: &str, overrides: &[(&str, &str)]) -> Record {
    let mut record = Record::from_pairs([
        ("Original Catalog Number", catalog),
        ("ORDER", "Carnivora"),
        ("FAMILY", "Ursidae"),
        ("SUBFAMILY", "Ursinae"),
        ("GENUS", "Ursus"),
        ("Species", species),
        ("Common Name", "Brown bear"),
        ("AGE", "adult"),
        ("CONDITION", "good"),
        ("COMPLETENESS", "complete skull"),
        ("RANK", "species"),
        ("PHOTO?", "yes"),
    ]);
    for (field, value) in overrides {
        record.set(*field, *value);
    }
    record
}

pub fn inventory(rows: Vec<Record>) -> Dataset {
    Dataset::with_rows(INVENTORY_COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
}

/// Serve `router` on an ephemeral local port
///
/// Returns the base URL of the species-match route (`/v1/species/match`).
pub async fn spawn_mock_gbif(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/v1/species/match", addr)
}

/// Local URL with nothing listening on it
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1/species/match", addr)
}

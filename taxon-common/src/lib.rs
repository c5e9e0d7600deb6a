//! # Taxon Common Library
//!
//! Shared code for the taxonomy cleaner crates including:
//! - Error types
//! - Configuration file model and resolution
//! - Progress event types and the EventBus

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};

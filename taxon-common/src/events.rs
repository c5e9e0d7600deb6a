//! Progress event system for cleaning runs
//!
//! Provides the shared event definitions and an EventBus built on
//! `tokio::sync::broadcast`. Events are a side channel for progress display;
//! nothing in the cleaning result depends on them being received.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted while a cleaning run is in progress
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CleanerEvent {
    /// Run accepted its dataset and is about to process records
    RunStarted {
        run_id: Uuid,
        total_records: usize,
        timestamp: DateTime<Utc>,
    },

    /// One record finished all stages
    RecordProcessed {
        run_id: Uuid,
        /// Records processed so far (1-based)
        processed: usize,
        total_records: usize,
        needs_review: bool,
        timestamp: DateTime<Utc>,
    },

    /// Every record has been processed
    RunCompleted {
        run_id: Uuid,
        total_records: usize,
        flagged_for_review: usize,
        corrected: usize,
        lookup_errors: usize,
        timestamp: DateTime<Utc>,
    },
}

impl CleanerEvent {
    /// Run this event belongs to
    pub fn run_id(&self) -> Uuid {
        match self {
            CleanerEvent::RunStarted { run_id, .. }
            | CleanerEvent::RecordProcessed { run_id, .. }
            | CleanerEvent::RunCompleted { run_id, .. } => *run_id,
        }
    }

    /// Completed fraction of the run (0.0-1.0)
    pub fn progress(&self) -> f64 {
        match self {
            CleanerEvent::RunStarted { total_records, .. } => {
                if *total_records == 0 {
                    1.0
                } else {
                    0.0
                }
            }
            CleanerEvent::RecordProcessed {
                processed,
                total_records,
                ..
            } => {
                if *total_records == 0 {
                    1.0
                } else {
                    *processed as f64 / *total_records as f64
                }
            }
            CleanerEvent::RunCompleted { .. } => 1.0,
        }
    }
}

/// Central event distribution bus
///
/// Publishing never blocks; slow subscribers observe `Lagged` and skip ahead.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CleanerEvent>,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<CleanerEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, returning the number of subscribers reached
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: CleanerEvent,
    ) -> Result<usize, broadcast::error::SendError<CleanerEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: CleanerEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

//! In-memory implementation of `EventSink`.
//!
//! `InMemoryEventLog` keeps every emitted event in a `Vec` behind a `Mutex`,
//! sequence-numbered in emission order. Consumers take a `snapshot()` and
//! read forward from the last sequence they saw — the log is append-only
//! and entries are never modified or dropped.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::info;

use operon_contracts::event::CoordinationEvent;

use crate::traits::EventSink;

/// One entry in the event log.
#[derive(Debug, Clone)]
pub struct SequencedEvent {
    /// Monotonically increasing position in the log, starting at 0.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub event: CoordinationEvent,
}

/// An append-only, sequence-numbered event log.
#[derive(Default)]
pub struct InMemoryEventLog {
    entries: Arc<Mutex<Vec<SequencedEvent>>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries emitted so far, in sequence order.
    pub fn snapshot(&self) -> Vec<SequencedEvent> {
        self.entries.lock().expect("event log lock poisoned").clone()
    }

    /// Number of entries emitted so far.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("event log lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for InMemoryEventLog {
    fn emit(&self, event: CoordinationEvent) {
        let mut entries = self.entries.lock().expect("event log lock poisoned");
        let sequence = entries.len() as u64;

        info!(kind = event.kind(), sequence, "coordination event");

        entries.push(SequencedEvent {
            sequence,
            timestamp: Utc::now(),
            event,
        });
    }
}

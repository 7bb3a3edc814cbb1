//! Event emission
//!
//! Events are plain strings of the form `NAME:field1,field2,...`.
//! Delivery is best effort; the ledger never reads events back.

use serde::{Deserialize, Serialize};

/// Append-only event log interface
pub trait EventSink {
    /// Append an already formatted event
    fn push(&mut self, event: String);

    /// Format and append an event
    fn emit(&mut self, name: &str, fields: &[String]) {
        self.push(format_event(name, fields));
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn push(&mut self, event: String) {
        (**self).push(event)
    }
}

/// Build the string form of an event
pub fn format_event(name: &str, fields: &[String]) -> String {
    format!("{}:{}", name, fields.join(","))
}

/// In-memory event log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<String>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in emission order
    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if no event was emitted
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consume the log
    pub fn into_events(self) -> Vec<String> {
        self.events
    }
}

impl EventSink for EventLog {
    fn push(&mut self, event: String) {
        self.events.push(event);
    }
}

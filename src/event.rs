//! The event record type carried through the [`EventBus`](crate::event_bus::EventBus).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single event: a string type tag, a payload, and provenance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_type: String,
    pub timestamp: i64,
    pub source: String,
    pub data: Value,
}

impl Event {
    /// Build an event with the given type, source, and payload.
    pub fn new(event_type: impl Into<String>, timestamp: i64, source: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp,
            source: source.into(),
            data,
        }
    }
}

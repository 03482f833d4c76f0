//! A component that queues events for later flush into the world's bus.

use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::component::ComponentType;
use crate::entity::EntityId;
use crate::event::Event;
use crate::event_bus::EventBus;

/// The well-known tag under which [`World::flush_event_buffers`]
/// (see `world.rs`) looks up buffer components on every entity.
pub const ENTITY_EVENT_BUFFER_TYPE: &str = "__entity_event_buffer";

/// Queues events on a single entity until the next flush, rewriting
/// `source` to `entity:<id>` at flush time rather than at queue time, so
/// the buffer itself stays agnostic to which entity it ends up attached
/// to.
#[derive(Default, Clone, Debug)]
pub struct EntityEventBuffer {
    pending: Vec<Event>,
}

impl EntityEventBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and queue an event of `event_type` carrying `data`, stamped
    /// with the current time. `source` is left blank; [`Self::flush_into`]
    /// fills it in at flush time.
    pub fn queue(&mut self, event_type: impl Into<String>, data: Value) {
        self.pending.push(Event::new(event_type, now_millis(), "", data));
    }

    /// Queue an already-built `event` for the next flush, as-is.
    pub fn push(&mut self, event: Event) {
        self.pending.push(event);
    }

    /// Number of events currently queued.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the buffer has no queued events.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether the buffer has any queued events.
    pub fn has_pending(&self) -> bool {
        !self.is_empty()
    }

    /// Drain every queued event, in push order.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }

    /// Drain every queued event into `bus`, rewriting each one's `source`
    /// to `entity:<entity>`.
    pub fn flush_into(&mut self, bus: &mut EventBus, entity: EntityId) {
        for mut event in self.drain() {
            event.source = format!("entity:{entity}");
            bus.publish(event);
        }
    }
}

fn now_millis() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}

/// The tag used to look this component type up in a [`ComponentStore`](crate::storage::ComponentStore).
pub fn buffer_component_type() -> ComponentType {
    ComponentType::from(ENTITY_EVENT_BUFFER_TYPE)
}

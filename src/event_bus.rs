//! Tick-scoped, single-queue pub/sub event dispatch.

use std::collections::VecDeque;

use ahash::AHashMap;
use tracing::warn;

use crate::error::Result;
use crate::event::Event;

/// A boxed subscriber callback. Receives the event and a handle back onto
/// the bus so it may publish further events, which are absorbed by the
/// same [`EventBus::drain`] call that is currently running.
pub type Listener = Box<dyn FnMut(&Event, &mut EventBus) -> Result<()> + Send>;

/// A guard identifying one registered listener, returned by
/// [`EventBus::subscribe`] and consumed by [`EventBus::unsubscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    event_type: String,
    id: u64,
}

/// Hard ceiling on cascade rounds within a single [`EventBus::drain`] call.
/// A listener that unconditionally re-emits its own event would otherwise
/// loop forever; past this many rounds the remaining queue is dropped and
/// a warning is logged.
const MAX_DRAIN_ITERATIONS: usize = 10_000;

struct Subscriber {
    id: u64,
    listener: Listener,
}

/// A single FIFO queue of [`Event`]s with string-tag-keyed subscribers.
///
/// There is one queue regardless of how many event types are in flight;
/// ordering across types is preserved exactly as events were published.
#[derive(Default)]
pub struct EventBus {
    queue: VecDeque<Event>,
    subscribers: AHashMap<String, Vec<Subscriber>>,
    next_subscription_id: u64,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `event` for the next [`Self::drain`].
    pub fn publish(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Register `listener` for `event_type`. Listeners for the same type
    /// run in subscription order.
    pub fn subscribe(&mut self, event_type: impl Into<String>, listener: Listener) -> Subscription {
        let event_type = event_type.into();
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.subscribers
            .entry(event_type.clone())
            .or_default()
            .push(Subscriber { id, listener });
        Subscription { event_type, id }
    }

    /// Remove the listener identified by `subscription`. Returns `true`
    /// iff a listener was actually removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let Some(subs) = self.subscribers.get_mut(&subscription.event_type) else {
            return false;
        };
        match subs.iter().position(|s| s.id == subscription.id) {
            Some(pos) => {
                subs.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Number of events currently queued.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop every queued event without dispatching it.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Dispatch every queued event to its subscribers, in FIFO order,
    /// absorbing events that listeners publish during this same call.
    ///
    /// Each event type's subscriber list is temporarily taken out of the
    /// map before its listeners run (and reinserted after), so a listener
    /// can call [`Self::subscribe`]/[`Self::publish`] against `&mut self`
    /// without a borrow conflict against the list it belongs to.
    pub fn drain(&mut self) -> Result<()> {
        let mut iterations = 0usize;
        while let Some(event) = self.queue.pop_front() {
            iterations += 1;
            if iterations > MAX_DRAIN_ITERATIONS {
                warn!(
                    remaining = self.queue.len() + 1,
                    "event bus drain exceeded max iterations, dropping remaining events"
                );
                self.queue.clear();
                break;
            }

            if let Some(mut subs) = self.subscribers.remove(&event.event_type) {
                for sub in subs.iter_mut() {
                    if let Err(err) = (sub.listener)(&event, self) {
                        warn!(event_type = %event.event_type, error = %err, "event listener failed");
                    }
                }
                self.subscribers.entry(event.event_type.clone()).or_default().splice(0..0, subs);
            }
        }
        Ok(())
    }
}

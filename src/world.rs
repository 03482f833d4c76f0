// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `World`: the facade binding entities, components, archetypes, dirty
//! tracking, the event bus, and the system scheduler into one tick loop.

use ahash::AHashSet;
use tracing::{debug, trace, warn};

use crate::archetype::ArchetypeIndex;
use crate::component::{Component, ComponentType};
use crate::dirty::{DirtyStats, DirtyTracker};
use crate::entity::{EntityId, EntityRegistry};
use crate::error::{EcsError, Result};
use crate::event::Event;
use crate::event_bus::{EventBus, Listener, Subscription};
use crate::event_buffer::{buffer_component_type, EntityEventBuffer};
use crate::query::Query;
use crate::schedule::SystemScheduler;
use crate::storage::ComponentStore;
use crate::system::BoxedSystem;

/// The central ECS runtime: entity lifecycle, component storage, archetype
/// indexing, dirty tracking, the event bus, and system scheduling.
pub struct World {
    registry: EntityRegistry,
    components: ComponentStore,
    archetypes: ArchetypeIndex,
    dirty: DirtyTracker,
    events: EventBus,
    scheduler: SystemScheduler,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self {
            registry: EntityRegistry::new(),
            components: ComponentStore::new(),
            archetypes: ArchetypeIndex::new(),
            dirty: DirtyTracker::new(),
            events: EventBus::new(),
            scheduler: SystemScheduler::new(),
        }
    }

    /// Create a world pre-sized for `entities` concurrently live entities
    /// and `component_types` distinct component tags.
    pub fn with_capacity(entities: usize, component_types: usize) -> Self {
        Self {
            registry: EntityRegistry::with_capacity(entities),
            components: ComponentStore::with_capacity(component_types),
            archetypes: ArchetypeIndex::new(),
            dirty: DirtyTracker::new(),
            events: EventBus::new(),
            scheduler: SystemScheduler::new(),
        }
    }

    // -- Entities --------------------------------------------------------

    /// Create a new, componentless entity.
    pub fn spawn_entity(&mut self) -> EntityId {
        let id = self.registry.create();
        trace!(entity = %id, "spawned entity");
        id
    }

    /// Whether `entity` is currently alive.
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.registry.is_alive(entity)
    }

    /// Destroy `entity`: drop every component it owns, remove it from the
    /// archetype index and dirty tracker, then recycle its id. Idempotent:
    /// destroying an already-dead (or never-alive) entity is a no-op, not
    /// an error.
    pub fn destroy_entity(&mut self, entity: EntityId) -> Result<()> {
        if !self.registry.is_alive(entity) {
            return Ok(());
        }
        self.components.remove_entity_everywhere(entity);
        self.archetypes.remove(entity);
        self.dirty.clear_entity(entity);
        self.registry.destroy(entity);
        debug!(entity = %entity, "destroyed entity");
        Ok(())
    }

    /// Number of currently live entities.
    pub fn entity_count(&self) -> usize {
        self.registry.count()
    }

    fn require_alive(&self, entity: EntityId) -> Result<()> {
        if self.registry.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::UnknownEntity)
        }
    }

    // -- Components --------------------------------------------------------

    /// Attach `value` to `entity` under `ty`, marking it dirty and
    /// re-deriving the entity's archetype signature.
    pub fn add_component<V: Component>(&mut self, entity: EntityId, ty: &ComponentType, value: V) -> Result<()> {
        self.require_alive(entity)?;
        self.components.add(ty, entity, value);
        self.dirty.mark(entity, ty);
        self.update_archetype(entity);
        Ok(())
    }

    /// Remove the value `entity` owns under `ty`, if any. Returns whether
    /// a value was actually removed.
    pub fn remove_component(&mut self, entity: EntityId, ty: &ComponentType) -> Result<bool> {
        self.require_alive(entity)?;
        let removed = self.components.remove(ty, entity);
        if removed {
            self.dirty.mark(entity, ty);
            self.update_archetype(entity);
        }
        Ok(removed)
    }

    /// Borrow the value `entity` owns under `ty` as `V`.
    pub fn get_component<V: Component>(&self, entity: EntityId, ty: &ComponentType) -> Option<&V> {
        self.components.get::<V>(ty, entity)
    }

    /// Mutably borrow the value `entity` owns under `ty` as `V`.
    pub fn get_component_mut<V: Component>(&mut self, entity: EntityId, ty: &ComponentType) -> Option<&mut V> {
        self.components.get_mut::<V>(ty, entity)
    }

    /// Whether `entity` owns a value under `ty`.
    pub fn has_component(&self, entity: EntityId, ty: &ComponentType) -> bool {
        self.components.has(ty, entity)
    }

    /// The set of tags `entity` currently owns a value under.
    pub fn component_types_of(&self, entity: EntityId) -> Result<AHashSet<ComponentType>> {
        self.require_alive(entity)?;
        Ok(self.components.types_owned_by(entity))
    }

    /// Re-derive and record `entity`'s archetype signature from its
    /// currently-owned component types.
    fn update_archetype(&mut self, entity: EntityId) {
        let types = self.components.types_owned_by(entity);
        self.archetypes.set(entity, &types);
    }

    // -- Archetypes --------------------------------------------------------

    /// `(signature, entity count)` for every non-empty archetype bucket.
    pub fn archetype_stats(&self) -> Vec<(String, usize)> {
        self.archetypes.stats()
    }

    /// The archetype signature currently associated with `entity`.
    pub fn archetype_signature_of(&self, entity: EntityId) -> Option<&str> {
        self.archetypes.signature_of(entity)
    }

    // -- Queries --------------------------------------------------------

    /// Snapshot every entity whose owned types are a superset of
    /// `required`.
    pub fn query(&self, required: &[ComponentType]) -> Query {
        Query::new(self.archetypes.entities_matching(required))
    }

    /// Alias for [`Self::query`], named to mirror callers that think of
    /// "matching several component types" as a distinct operation from a
    /// single-type lookup.
    pub fn query_multiple(&self, required: &[ComponentType]) -> Query {
        self.query(required)
    }

    // -- Dirty tracking --------------------------------------------------------

    /// Whether `entity` is dirty under any tracked type.
    pub fn is_entity_dirty(&self, entity: EntityId) -> bool {
        self.dirty.is_entity_dirty(entity)
    }

    /// Whether `entity` is dirty under `ty` specifically.
    pub fn is_component_dirty(&self, entity: EntityId, ty: &ComponentType) -> bool {
        self.dirty.is_component_dirty(entity, ty)
    }

    /// Every entity dirtied under `ty`.
    pub fn dirty_of(&self, ty: &ComponentType) -> AHashSet<EntityId> {
        self.dirty.dirty_of(ty)
    }

    /// The union of every type's dirty set.
    pub fn all_dirty(&self) -> AHashSet<EntityId> {
        self.dirty.all_dirty()
    }

    /// `{total_entities, types, average_per_type}` over the current dirty
    /// sets.
    pub fn dirty_stats(&self) -> DirtyStats {
        self.dirty.stats()
    }

    // -- Events --------------------------------------------------------

    /// Enqueue `event` for the next [`Self::drain_events`] (or the next
    /// [`Self::tick`]).
    pub fn publish_event(&mut self, event: Event) {
        self.events.publish(event);
    }

    /// Register `listener` for `event_type`.
    pub fn subscribe(&mut self, event_type: impl Into<String>, listener: Listener) -> Subscription {
        self.events.subscribe(event_type, listener)
    }

    /// Remove a previously registered listener.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.events.unsubscribe(subscription)
    }

    /// Dispatch every queued event, including ones listeners publish
    /// during this same call.
    pub fn drain_events(&mut self) -> Result<()> {
        self.events.drain()
    }

    /// Number of events currently queued on the bus.
    pub fn pending_events(&self) -> usize {
        self.events.pending()
    }

    /// Attach an [`EntityEventBuffer`] to `entity`.
    pub fn add_event_buffer(&mut self, entity: EntityId) -> Result<()> {
        self.add_component(entity, &buffer_component_type(), EntityEventBuffer::new())
    }

    /// Queue `event` on `entity`'s event buffer, creating one if absent.
    pub fn push_entity_event(&mut self, entity: EntityId, event: Event) -> Result<()> {
        self.require_alive(entity)?;
        let ty = buffer_component_type();
        if self.get_component::<EntityEventBuffer>(entity, &ty).is_none() {
            self.add_component(entity, &ty, EntityEventBuffer::new())?;
        }
        if let Some(buffer) = self.get_component_mut::<EntityEventBuffer>(entity, &ty) {
            buffer.push(event);
        }
        Ok(())
    }

    /// Flush every entity's event buffer into the bus, rewriting each
    /// event's `source` to `entity:<id>`.
    pub fn flush_event_buffers(&mut self) -> Result<()> {
        let ty = buffer_component_type();
        let entities = self.components.entities(&ty);
        for entity in entities {
            if let Some(buffer) = self.components.get_mut::<EntityEventBuffer>(&ty, entity) {
                buffer.flush_into(&mut self.events, entity);
            }
        }
        Ok(())
    }

    // -- Systems --------------------------------------------------------

    /// Register `system`. If the scheduler has already run
    /// [`SystemScheduler::initialize_all`], the new system is initialized
    /// immediately. A failing `initialize` is logged and suppressed rather
    /// than rejecting the registration.
    pub fn add_system(&mut self, mut system: BoxedSystem) -> Result<()> {
        if self.scheduler.initialized() {
            if let Err(err) = system.initialize(self) {
                let name = system.name().to_string();
                let wrapped = EcsError::SystemExecutionFailure {
                    system: name.clone(),
                    message: err.to_string(),
                };
                warn!(system = %name, error = %wrapped, "system initialize failed");
            }
        }
        self.scheduler.add(system)
    }

    /// Remove the system named `name`, running its shutdown hook first. A
    /// failing `shutdown` is logged and suppressed rather than aborting
    /// the removal.
    pub fn remove_system(&mut self, name: &str) -> Result<bool> {
        let mut scheduler = std::mem::take(&mut self.scheduler);

        let result: Result<bool> = (|| {
            if scheduler.get(name).is_none() {
                return Ok(false);
            }
            if let Some(system) = scheduler.get_mut(name) {
                if let Err(err) = system.shutdown(self) {
                    let wrapped = EcsError::SystemExecutionFailure {
                        system: name.to_string(),
                        message: err.to_string(),
                    };
                    warn!(system = %name, error = %wrapped, "system shutdown failed");
                }
            }
            Ok(scheduler.remove(name))
        })();

        self.scheduler = scheduler;
        result
    }

    /// Borrow the system named `name`.
    pub fn get_system(&self, name: &str) -> Option<&BoxedSystem> {
        self.scheduler.get(name)
    }

    /// Mutably borrow the system named `name`.
    pub fn get_system_mut(&mut self, name: &str) -> Option<&mut BoxedSystem> {
        self.scheduler.get_mut(name)
    }

    /// The names of registered systems, in the order they run.
    pub fn execution_order(&self) -> Vec<String> {
        self.scheduler.execution_order()
    }

    // -- Tick --------------------------------------------------------

    /// Advance the world by one tick:
    ///
    /// 1. Flush entity event buffers into the bus.
    /// 2. Drain the event bus.
    /// 3. Run [`SystemScheduler::initialize_all`] if it has not yet run,
    ///    then run every system's [`System::update`](crate::system::System::update)
    ///    in execution order.
    /// 4. Drain the event bus again, absorbing events systems emitted.
    /// 5. Clear all dirty tracking for the next tick.
    pub fn tick(&mut self, dt: f64) -> Result<()> {
        self.flush_event_buffers()?;
        self.events.drain()?;

        let mut scheduler = std::mem::take(&mut self.scheduler);
        let result = (|| {
            if !scheduler.initialized() {
                scheduler.initialize_all(self)?;
            }
            scheduler.update(self, dt)
        })();
        self.scheduler = scheduler;
        result?;

        self.events.drain()?;
        self.dirty.clear_all();
        Ok(())
    }
}

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

//! A frozen snapshot of matching entity ids, materialized lazily against
//! a [`World`].
//!
//! `Query` holds only the id list, never a reference into the `World`
//! that produced it: every accessor below takes `&World`/`&mut World`
//! explicitly. That keeps the type self-contained (no lifetime parameter)
//! and sidesteps the borrow conflicts a `query.for_each(|c| ...)` with an
//! embedded `&mut World` would otherwise create.

use crate::component::{Component, ComponentType};
use crate::entity::EntityId;
use crate::world::World;

/// The frozen result of [`World::query`]/[`World::query_multiple`].
///
/// The id list is captured once, at construction. Entities or components
/// removed afterward are silently skipped by the `get_*`/`for_each`
/// accessors below, but [`Self::count`] still reports the snapshot's
/// original size — the snapshot documents a point in time, not a live
/// view.
#[derive(Debug, Clone, Default)]
pub struct Query {
    ids: Vec<EntityId>,
}

impl Query {
    /// Wrap an already-computed id list.
    pub fn new(ids: Vec<EntityId>) -> Self {
        Self { ids }
    }

    /// The snapshot's entity ids, in the order they were matched.
    pub fn get_entities(&self) -> &[EntityId] {
        &self.ids
    }

    /// The number of ids captured at construction time. Unaffected by
    /// later removals.
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// Whether the snapshot captured no entities.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// A new snapshot containing only ids for which `predicate` holds
    /// against `world` right now.
    pub fn filter(&self, world: &World, mut predicate: impl FnMut(&World, EntityId) -> bool) -> Query {
        Query::new(self.ids.iter().copied().filter(|&id| predicate(world, id)).collect())
    }

    /// Read `ty` for every entity still alive and still owning it.
    /// Entities removed since the snapshot was taken are skipped, not
    /// reported as errors.
    pub fn get_components<'w, V: Component>(&self, world: &'w World, ty: &ComponentType) -> Vec<(EntityId, &'w V)> {
        self.ids
            .iter()
            .filter_map(|&id| world.get_component::<V>(id, ty).map(|c| (id, c)))
            .collect()
    }

    /// Run `f` against a mutable borrow of `ty` for every entity still
    /// alive and still owning it.
    pub fn for_each<V: Component>(&self, world: &mut World, ty: &ComponentType, mut f: impl FnMut(EntityId, &mut V)) {
        for &id in &self.ids {
            if let Some(component) = world.get_component_mut::<V>(id, ty) {
                f(id, component);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_survives_later_removal() {
        let mut world = World::new();
        let position = ComponentType::from("position");
        let e1 = world.spawn_entity();
        let e2 = world.spawn_entity();
        world.add_component(e1, &position, 1.0f32).unwrap();
        world.add_component(e2, &position, 2.0f32).unwrap();

        let query = world.query(&[position.clone()]);
        assert_eq!(query.count(), 2);

        world.remove_component(e1, &position).unwrap();
        assert_eq!(query.count(), 2);
        assert_eq!(query.get_components::<f32>(&world, &position).len(), 1);
    }

    #[test]
    fn for_each_skips_entities_removed_since_snapshot() {
        let mut world = World::new();
        let health = ComponentType::from("health");
        let e1 = world.spawn_entity();
        let e2 = world.spawn_entity();
        world.add_component(e1, &health, 10i32).unwrap();
        world.add_component(e2, &health, 20i32).unwrap();

        let query = world.query(&[health.clone()]);
        world.destroy_entity(e2).unwrap();

        let mut seen = Vec::new();
        query.for_each::<i32>(&mut world, &health, |id, value| {
            *value += 1;
            seen.push(id);
        });

        assert_eq!(seen, vec![e1]);
    }

    #[test]
    fn filter_narrows_against_current_world_state() {
        let mut world = World::new();
        let tag = ComponentType::from("tag");
        let e1 = world.spawn_entity();
        let e2 = world.spawn_entity();
        world.add_component(e1, &tag, 1i32).unwrap();
        world.add_component(e2, &tag, 2i32).unwrap();

        let query = world.query(&[tag.clone()]);
        let filtered = query.filter(&world, |w, id| w.get_component::<i32>(id, &tag) == Some(&2));
        assert_eq!(filtered.get_entities(), &[e2]);
    }
}

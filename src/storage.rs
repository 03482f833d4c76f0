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

//! Per-type component columns with O(1) access.

use ahash::{AHashMap, AHashSet};
use std::any::Any;

use crate::component::{Component, ComponentType};
use crate::entity::EntityId;

type Column = AHashMap<EntityId, Box<dyn Any + Send + Sync>>;

/// Typed component storage keyed by [`ComponentType`].
///
/// Each tag gets its own column on first insert; the column stores
/// type-erased boxes and downcasts on every typed access, keeping
/// component storage dynamically tagged without any `unsafe`.
#[derive(Default)]
pub struct ComponentStore {
    columns: AHashMap<ComponentType, Column>,
}

impl ComponentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-sized for `component_types` distinct tags.
    pub fn with_capacity(component_types: usize) -> Self {
        Self {
            columns: AHashMap::with_capacity(component_types),
        }
    }

    /// Insert or replace the value for `entity` under `ty`. Replacing an
    /// existing value keeps the column's identity; no new column is
    /// allocated for an entity that already owns `ty`.
    pub fn add<V: Component>(&mut self, ty: &ComponentType, entity: EntityId, value: V) {
        self.columns
            .entry(ty.clone())
            .or_default()
            .insert(entity, Box::new(value));
    }

    /// Remove the value for `entity` under `ty`. Returns `true` iff a
    /// value was present.
    pub fn remove(&mut self, ty: &ComponentType, entity: EntityId) -> bool {
        match self.columns.get_mut(ty) {
            Some(column) => column.remove(&entity).is_some(),
            None => false,
        }
    }

    /// Borrow the value for `entity` under `ty` as `V`, or `None` if
    /// absent or stored under a different Rust type.
    pub fn get<V: Component>(&self, ty: &ComponentType, entity: EntityId) -> Option<&V> {
        self.columns.get(ty)?.get(&entity)?.downcast_ref::<V>()
    }

    /// Mutably borrow the value for `entity` under `ty` as `V`.
    pub fn get_mut<V: Component>(&mut self, ty: &ComponentType, entity: EntityId) -> Option<&mut V> {
        self.columns.get_mut(ty)?.get_mut(&entity)?.downcast_mut::<V>()
    }

    /// Whether `entity` owns a value under `ty`.
    pub fn has(&self, ty: &ComponentType, entity: EntityId) -> bool {
        self.columns.get(ty).is_some_and(|c| c.contains_key(&entity))
    }

    /// An independent copy of the entities owning a value under `ty`.
    pub fn entities(&self, ty: &ComponentType) -> AHashSet<EntityId> {
        self.columns
            .get(ty)
            .map(|c| c.keys().copied().collect())
            .unwrap_or_default()
    }

    /// The set of tags `entity` currently owns a value under. Used by the
    /// archetype index to re-derive an entity's signature after a
    /// structural mutation.
    pub fn types_owned_by(&self, entity: EntityId) -> AHashSet<ComponentType> {
        self.columns
            .iter()
            .filter(|(_, column)| column.contains_key(&entity))
            .map(|(ty, _)| ty.clone())
            .collect()
    }

    /// Remove `entity` from every column. Returns the tags it owned.
    pub fn remove_entity_everywhere(&mut self, entity: EntityId) -> AHashSet<ComponentType> {
        let mut removed = AHashSet::default();
        for (ty, column) in self.columns.iter_mut() {
            if column.remove(&entity).is_some() {
                removed.insert(ty.clone());
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(s: &str) -> ComponentType {
        ComponentType::from(s)
    }

    #[test]
    fn add_then_get_round_trips() {
        let mut store = ComponentStore::new();
        let e = EntityId::NONE; // id identity is irrelevant to this store
        store.add(&ty("position"), e, 1.0f32);
        assert_eq!(store.get::<f32>(&ty("position"), e), Some(&1.0f32));
    }

    #[test]
    fn add_replaces_without_extra_entity() {
        let mut store = ComponentStore::new();
        let e = EntityId::NONE;
        store.add(&ty("position"), e, 1.0f32);
        store.add(&ty("position"), e, 2.0f32);
        assert_eq!(store.get::<f32>(&ty("position"), e), Some(&2.0f32));
        assert_eq!(store.entities(&ty("position")).len(), 1);
    }

    #[test]
    fn remove_returns_false_when_absent() {
        let mut store = ComponentStore::new();
        let e = EntityId::NONE;
        assert!(!store.remove(&ty("position"), e));
        store.add(&ty("position"), e, 1.0f32);
        assert!(store.remove(&ty("position"), e));
        assert!(!store.remove(&ty("position"), e));
    }

    #[test]
    fn downcast_mismatch_returns_none() {
        let mut store = ComponentStore::new();
        let e = EntityId::NONE;
        store.add(&ty("position"), e, 1.0f32);
        assert_eq!(store.get::<i32>(&ty("position"), e), None);
    }

    #[test]
    fn entities_copy_is_independent() {
        let mut store = ComponentStore::new();
        let e = EntityId::NONE;
        store.add(&ty("position"), e, 1.0f32);
        let mut snapshot = store.entities(&ty("position"));
        snapshot.clear();
        assert_eq!(store.entities(&ty("position")).len(), 1);
    }
}

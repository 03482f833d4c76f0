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

//! Records (entity, component-type) pairs mutated since the last tick
//! boundary; cleared at the end of every tick.

use ahash::{AHashMap, AHashSet};

use crate::component::ComponentType;
use crate::entity::EntityId;

/// Snapshot returned by [`DirtyTracker::stats`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirtyStats {
    pub total_entities: usize,
    pub types: usize,
    pub average_per_type: f64,
}

/// Per-component-type dirty sets.
#[derive(Default)]
pub struct DirtyTracker {
    by_type: AHashMap<ComponentType, AHashSet<EntityId>>,
}

impl DirtyTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `(entity, ty)` dirty. Idempotent.
    pub fn mark(&mut self, entity: EntityId, ty: &ComponentType) {
        self.by_type.entry(ty.clone()).or_default().insert(entity);
    }

    /// An independent copy of the entities dirtied under `ty`.
    pub fn dirty_of(&self, ty: &ComponentType) -> AHashSet<EntityId> {
        self.by_type.get(ty).cloned().unwrap_or_default()
    }

    /// The union of every type's dirty set.
    pub fn all_dirty(&self) -> AHashSet<EntityId> {
        let mut all = AHashSet::default();
        for set in self.by_type.values() {
            all.extend(set.iter().copied());
        }
        all
    }

    /// Whether `entity` is dirty under any tracked type.
    pub fn is_entity_dirty(&self, entity: EntityId) -> bool {
        self.by_type.values().any(|s| s.contains(&entity))
    }

    /// Whether `entity` is dirty under `ty` specifically.
    pub fn is_component_dirty(&self, entity: EntityId, ty: &ComponentType) -> bool {
        self.by_type.get(ty).is_some_and(|s| s.contains(&entity))
    }

    /// Clear every type's dirty set entirely (no keys retained).
    pub fn clear_all(&mut self) {
        self.by_type.clear();
    }

    /// Empty `ty`'s dirty set but keep the key. Entities dirtied only
    /// under `ty` lose their membership in [`Self::all_dirty`] as a side
    /// effect.
    pub fn clear_type(&mut self, ty: &ComponentType) {
        if let Some(set) = self.by_type.get_mut(ty) {
            set.clear();
        }
    }

    /// Remove `entity` from every type's dirty set. Emptied sets keep
    /// their key so [`Self::stats`] reflects only non-empty types.
    pub fn clear_entity(&mut self, entity: EntityId) {
        for set in self.by_type.values_mut() {
            set.remove(&entity);
        }
    }

    /// `{total_entities, types, average_per_type}` over non-empty type
    /// sets. `average_per_type` is `0.0` when there are none.
    pub fn stats(&self) -> DirtyStats {
        let non_empty: Vec<usize> = self.by_type.values().filter(|s| !s.is_empty()).map(|s| s.len()).collect();
        let types = non_empty.len();
        let average_per_type = if types == 0 {
            0.0
        } else {
            non_empty.iter().sum::<usize>() as f64 / types as f64
        };
        DirtyStats {
            total_entities: self.all_dirty().len(),
            types,
            average_per_type,
        }
    }
}

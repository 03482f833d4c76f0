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

//! Maps entity -> component-set signature and signature -> entity set.
//!
//! There is no sub-combination index: `entities_matching` scans every
//! registered signature and checks tag containment. That is O(#signatures
//! x #required), which is the right tradeoff when signature cardinality
//! stays small relative to entity count.

use ahash::{AHashMap, AHashSet};

use crate::component::ComponentType;
use crate::entity::EntityId;

/// The sorted, `|`-delimited concatenation of a component-set's tags.
pub type ArchetypeSignature = String;

/// Entity -> signature and signature -> entity-set index.
#[derive(Default)]
pub struct ArchetypeIndex {
    signature_of: AHashMap<EntityId, ArchetypeSignature>,
    entities_of: AHashMap<ArchetypeSignature, AHashSet<EntityId>>,
}

impl ArchetypeIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the canonical signature for a component-type set.
    pub fn signature(types: &AHashSet<ComponentType>) -> ArchetypeSignature {
        let mut tags: Vec<&str> = types.iter().map(|t| t.as_ref()).collect();
        tags.sort_unstable();
        tags.join("|")
    }

    /// Move `entity` to the bucket for `types`. An empty `types` removes
    /// `entity` from the index entirely. Prunes the old bucket if it
    /// becomes empty.
    pub fn set(&mut self, entity: EntityId, types: &AHashSet<ComponentType>) {
        if let Some(old) = self.signature_of.remove(&entity) {
            if let Some(bucket) = self.entities_of.get_mut(&old) {
                bucket.remove(&entity);
                if bucket.is_empty() {
                    self.entities_of.remove(&old);
                }
            }
        }

        if types.is_empty() {
            return;
        }

        let sig = Self::signature(types);
        self.entities_of.entry(sig.clone()).or_default().insert(entity);
        self.signature_of.insert(entity, sig);
    }

    /// Remove `entity` from the index entirely.
    pub fn remove(&mut self, entity: EntityId) {
        self.set(entity, &AHashSet::default());
    }

    /// The signature currently associated with `entity`, if any.
    pub fn signature_of(&self, entity: EntityId) -> Option<&str> {
        self.signature_of.get(&entity).map(|s| s.as_str())
    }

    /// Every entity whose owned component types are a superset of
    /// `required`. An empty `required` returns an empty list — this is
    /// definitional, not an error.
    pub fn entities_matching(&self, required: &[ComponentType]) -> Vec<EntityId> {
        if required.is_empty() {
            return Vec::new();
        }

        let mut matched = Vec::new();
        for (sig, entities) in &self.entities_of {
            let tags: AHashSet<&str> = sig.split('|').collect();
            if required.iter().all(|r| tags.contains(r.as_ref())) {
                matched.extend(entities.iter().copied());
            }
        }
        matched
    }

    /// `(signature, entity count)` for every non-empty bucket.
    pub fn stats(&self) -> Vec<(ArchetypeSignature, usize)> {
        self.entities_of.iter().map(|(sig, set)| (sig.clone(), set.len())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tags: &[&str]) -> AHashSet<ComponentType> {
        tags.iter().map(|t| ComponentType::from(*t)).collect()
    }

    #[test]
    fn signature_is_sorted_and_delimited() {
        let types = set(&["velocity", "health", "position"]);
        assert_eq!(ArchetypeIndex::signature(&types), "health|position|velocity");
    }

    #[test]
    fn archetype_transition_through_empty_reindexes() {
        let mut index = ArchetypeIndex::new();
        let e = EntityId::NONE;

        index.set(e, &set(&["position"]));
        assert_eq!(index.signature_of(e), Some("position"));

        index.set(e, &set(&["position", "velocity"]));
        assert_eq!(index.signature_of(e), Some("position|velocity"));

        index.set(e, &set(&["velocity"]));
        assert_eq!(index.signature_of(e), Some("velocity"));

        index.set(e, &AHashSet::default());
        assert_eq!(index.signature_of(e), None);

        // Re-entering the index after the empty set works correctly.
        index.set(e, &set(&["position"]));
        assert_eq!(index.signature_of(e), Some("position"));
    }

    #[test]
    fn empty_buckets_are_pruned() {
        let mut index = ArchetypeIndex::new();
        let e = EntityId::NONE;
        index.set(e, &set(&["position"]));
        index.remove(e);
        assert!(index.stats().is_empty());
    }

    #[test]
    fn entities_matching_requires_superset() {
        let mut index = ArchetypeIndex::new();
        let e1 = EntityId::NONE;
        index.set(e1, &set(&["position", "velocity"]));
        assert_eq!(index.entities_matching(&[ComponentType::from("position")]), vec![e1]);
        assert!(index
            .entities_matching(&[ComponentType::from("position"), ComponentType::from("health")])
            .is_empty());
    }

    #[test]
    fn entities_matching_empty_required_is_empty() {
        let mut index = ArchetypeIndex::new();
        index.set(EntityId::NONE, &set(&["position"]));
        assert!(index.entities_matching(&[]).is_empty());
    }
}

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

//! Entity identifiers and the registry that mints and recycles them.
//!
//! Ids are plain monotonic `u64`s, not generational keys: holding a
//! destroyed id and comparing it to a later re-issued one will silently
//! alias. That is the single highest-value hardening a caller may want to
//! add on top of this crate if that limitation becomes a problem.

use std::fmt;

use ahash::AHashSet;

/// Opaque entity identifier. `0` is reserved and never issued by
/// [`EntityRegistry::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    /// The reserved "none" id. Never alive.
    pub const NONE: EntityId = EntityId(0);

    /// The raw numeric value of this id.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mints, recycles, and validates entity identifiers.
///
/// Ids are issued monotonically starting at 1. Destroyed ids are pushed
/// onto a recycle stack and reused in LIFO order (last-destroyed reused
/// first) before any new monotonic id is minted.
pub struct EntityRegistry {
    next_id: u64,
    recycle_stack: Vec<u64>,
    live: AHashSet<EntityId>,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    /// Create an empty registry. The first created entity will have id 1.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            recycle_stack: Vec::new(),
            live: AHashSet::new(),
        }
    }

    /// Create a registry pre-sized for `capacity` concurrently live
    /// entities.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_id: 1,
            recycle_stack: Vec::new(),
            live: AHashSet::with_capacity(capacity),
        }
    }

    /// Mint or recycle an id and mark it alive.
    pub fn create(&mut self) -> EntityId {
        let raw = match self.recycle_stack.pop() {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        };
        let id = EntityId(raw);
        self.live.insert(id);
        id
    }

    /// Mark `id` dead and push it onto the recycle stack. Idempotent: a
    /// non-live id (including [`EntityId::NONE`]) is a no-op and returns
    /// `false`.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        if id == EntityId::NONE || !self.live.remove(&id) {
            return false;
        }
        self.recycle_stack.push(id.0);
        true
    }

    /// Whether `id` is currently alive.
    pub fn is_alive(&self, id: EntityId) -> bool {
        id != EntityId::NONE && self.live.contains(&id)
    }

    /// An independent copy of the set of currently live ids.
    pub fn live_set(&self) -> AHashSet<EntityId> {
        self.live.clone()
    }

    /// Number of currently live entities.
    pub fn count(&self) -> usize {
        self.live.len()
    }
}

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

//! A data-oriented entity-component-system runtime.
//!
//! Entities are plain recyclable ids, components are dynamically tagged
//! values stored in per-tag columns, archetype membership is derived from
//! the tag set an entity currently owns, and systems run in a single
//! dependency- and priority-ordered pass per tick.

pub mod archetype;
pub mod component;
pub mod dirty;
pub mod entity;
pub mod error;
pub mod event;
pub mod event_buffer;
pub mod event_bus;
pub mod glue;
pub mod query;
pub mod schedule;
pub mod storage;
pub mod system;
pub mod world;

pub mod prelude;

pub use archetype::{ArchetypeIndex, ArchetypeSignature};
pub use component::{Component, ComponentType};
pub use dirty::{DirtyStats, DirtyTracker};
pub use entity::{EntityId, EntityRegistry};
pub use error::{EcsError, Result};
pub use event::Event;
pub use event_buffer::{EntityEventBuffer, ENTITY_EVENT_BUFFER_TYPE};
pub use event_bus::{EventBus, Listener, Subscription};
pub use glue::WorldQueryExt;
pub use query::Query;
pub use schedule::SystemScheduler;
pub use storage::ComponentStore;
pub use system::{BoxedSystem, System};
pub use world::World;

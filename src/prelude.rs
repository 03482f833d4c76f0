//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use ecs_core::prelude::*;
//! ```

pub use crate::component::{Component, ComponentType};
pub use crate::entity::EntityId;
pub use crate::error::{EcsError, Result};
pub use crate::event::Event;
pub use crate::event_buffer::EntityEventBuffer;
pub use crate::glue::WorldQueryExt;
pub use crate::query::Query;
pub use crate::system::{BoxedSystem, System};
pub use crate::world::World;

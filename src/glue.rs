//! Ergonomic query helpers layered on top of [`World`] and [`Query`].
//!
//! Nothing here is load-bearing: every method is a thin wrapper around
//! `World::query` plus `Query::get_components`/`for_each`, provided so
//! systems don't have to spell out a `ComponentType::from(...)` at every
//! call site.

use crate::component::{Component, ComponentType};
use crate::entity::EntityId;
use crate::world::World;

/// Convenience query helpers, blanket-implemented for [`World`].
pub trait WorldQueryExt {
    /// Entities owning `ty`, paired with a read-only borrow of the value.
    fn each<V: Component>(&self, ty: &ComponentType) -> Vec<(EntityId, &V)>;

    /// Run `f` against every entity owning `ty`, mutably.
    fn each_mut<V: Component>(&mut self, ty: &ComponentType, f: impl FnMut(EntityId, &mut V));
}

impl WorldQueryExt for World {
    fn each<V: Component>(&self, ty: &ComponentType) -> Vec<(EntityId, &V)> {
        let query = self.query(std::slice::from_ref(ty));
        query.get_components::<V>(self, ty)
    }

    fn each_mut<V: Component>(&mut self, ty: &ComponentType, f: impl FnMut(EntityId, &mut V)) {
        let query = self.query(std::slice::from_ref(ty));
        query.for_each::<V>(self, ty, f);
    }
}

//! System trait: named, prioritized, dependency-ordered units of logic.

use crate::error::Result;
use crate::world::World;

/// A unit of per-tick logic run against the world.
///
/// Unlike an access-conflict scheduler, ordering here is driven entirely
/// by [`System::dependencies`] and [`System::priority`] — there is no
/// attempt to infer read/write conflicts from what a system touches, and
/// systems never run concurrently with each other.
pub trait System: Send {
    /// The name this system is registered and depended upon under.
    /// Must be unique within a [`SystemScheduler`](crate::schedule::SystemScheduler).
    fn name(&self) -> &str;

    /// Names of systems that must run, in this same tick, before this one.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Tiebreaker among systems at the same dependency level. Smaller
    /// runs first.
    fn priority(&self) -> i32 {
        0
    }

    /// Called once, when the system is added to a scheduler that has
    /// already been initialized (or during `initialize_all`).
    fn initialize(&mut self, _world: &mut World) -> Result<()> {
        Ok(())
    }

    /// Called once per tick, in dependency/priority order, with the
    /// elapsed time in seconds since the previous tick.
    fn update(&mut self, world: &mut World, dt: f64) -> Result<()>;

    /// Called once when the system is removed from its scheduler.
    fn shutdown(&mut self, _world: &mut World) -> Result<()> {
        Ok(())
    }
}

/// A type-erased, owned system.
pub type BoxedSystem = Box<dyn System>;

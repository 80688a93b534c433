//! Test helpers.
//!
//! Systems that use `Commands` enqueue structural changes; applying them is normally handled by
//! schedule boundaries. We call `world.flush()` after running so queued commands are applied
//! before assertions.

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

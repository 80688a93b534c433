//! Fixed-step ordering.
//!
//! One simulation tick is one pass of `FixedUpdate` followed by `FixedPostUpdate`:
//!
//! ```text
//! FixedUpdate:      Clock -> Spawn -> Behaviour -> Emit
//! FixedPostUpdate:  physics -> collision messages -> Resolve -> Release -> Present
//! ```
//!
//! Fired tasks are consumed in `Behaviour`, before anything is resolved. A volley due
//! on the tick its actor dies therefore still leaves; the actor was alive when it fired.
//! Combat and Release cancel the task, so no later tick can fire it.

use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Advance the tick counter and collect due tasks.
    Clock,
    /// Timeline drain.
    Spawn,
    /// Actor and player behaviour driven by fired tasks and input.
    Behaviour,
    /// Consume projectile spawn requests.
    Emit,
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveSet {
    /// Overlap-driven state transitions.
    Combat,
    /// Destroy step: registry removal, task cancellation, despawn.
    Release,
    /// Cosmetic reactions to what happened this tick.
    Present,
}

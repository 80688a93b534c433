//! Core plugin: shared resources, tick rate and fixed-step ordering.

use avian2d::prelude::PhysicsSystems;
use bevy::prelude::*;

use crate::common::rng::GameRng;
use crate::common::screen::ScreenBounds;
use crate::common::sets::{ResolveSet, SimSet};
use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    // Tests may insert their own tunables before the plugin runs.
    if !app.world().contains_resource::<Tunables>() {
        app.insert_resource(Tunables::default());
    }
    let tunables = app.world().resource::<Tunables>().clone();

    app.insert_resource(ScreenBounds::from_tunables(&tunables));
    app.insert_resource(GameRng::seeded(tunables.rng_seed));
    app.insert_resource(Time::<Fixed>::from_hz(tunables.tick_hz));
    app.insert_resource(ClearColor(Color::srgb(0.16, 0.42, 0.78)));

    app.configure_sets(
        FixedUpdate,
        (SimSet::Clock, SimSet::Spawn, SimSet::Behaviour, SimSet::Emit).chain(),
    );
    app.configure_sets(
        FixedPostUpdate,
        (ResolveSet::Combat, ResolveSet::Release, ResolveSet::Present)
            .chain()
            .after(PhysicsSystems::Writeback),
    );
}

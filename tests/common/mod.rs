//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `sky_strike::game::configure_headless` to install gameplay plugins.
//! - time advances by exactly one simulation tick per `app.update()`.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;

use sky_strike::common::tunables::Tunables;

pub fn app_headless() -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
        TransformPlugin,
    ));

    let tick = Duration::from_secs_f64(1.0 / Tunables::default().tick_hz);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(tick));

    sky_strike::game::configure_headless(&mut app);
    // `App::run` would do this; tests drive `update` by hand, so complete
    // plugin setup (avian registers resources in `Plugin::finish`).
    app.finish();
    app.cleanup();
    app
}

/// Boot into `InGame` and let the clock start.
pub fn booted() -> App {
    let mut app = app_headless();
    for _ in 0..3 {
        app.update();
    }
    app
}

pub fn run_ticks(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

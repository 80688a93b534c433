//! Game composition root.
//!
//! Provides two public configuration functions:
//! - `configure_full`: includes DefaultPlugins (window/render) + game plugins.
//! - `configure_headless`: minimal configuration for integration tests.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::state::GameState;
use crate::plugins;

/// Window scale over the 160 x 120 playfield.
const WINDOW_SCALE: u32 = 5;

pub fn run() {
    App::new().add_plugins(configure_full).run();
}

/// Full configuration for `cargo run`.
pub fn configure_full(app: &mut App) {
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Sky Strike".into(),
                    resolution: WindowResolution::new(160 * WINDOW_SCALE, 120 * WINDOW_SCALE),
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    );

    app.init_state::<GameState>();
    plugins::register_all(app);
}

/// Headless configuration for integration tests.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - Do NOT add render-only plugins (camera/HUD).
pub fn configure_headless(app: &mut App) {
    app.init_state::<GameState>();
    plugins::register_gameplay(app);
}

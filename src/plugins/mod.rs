//! Feature plugins.

use bevy::prelude::*;

pub mod clock;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod fx;
pub mod movement;
pub mod physics;
pub mod player;
pub mod powerups;
pub mod projectiles;
pub mod timeline;

// Render-only
pub mod camera;
pub mod hud;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    clock::plugin(app);
    movement::plugin(app);
    projectiles::plugin(app);
    enemies::plugin(app);
    player::plugin(app);
    powerups::plugin(app);
    combat::plugin(app);
    timeline::plugin(app);
    fx::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
    hud::plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    register_gameplay(app);
    register_render(app);
}

//! Camera plugin: a fixed camera that fits the whole playfield in the window.
//!
//! ```text
//! Startup: spawn MainCamera with an orthographic projection
//!          scaled so ScreenBounds fills the viewport
//! ```
//!
//! The camera outlives `InGame` so the end-of-run banner still renders.

use bevy::camera::ScalingMode;
use bevy::prelude::*;

use crate::common::screen::ScreenBounds;

#[derive(Component)]
pub struct MainCamera;

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_camera);
}

fn spawn_camera(mut commands: Commands, screen: Res<ScreenBounds>) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera,
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::AutoMin {
                min_width: screen.width,
                min_height: screen.height,
            },
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(0.0, 0.0, 999.0),
    ));
}

//! Screen space <-> world space.
//!
//! Gameplay rules (spawn anchors, shot vectors, power-up placement) are written in
//! screen space: origin at the top-left corner, `y` growing downwards, exactly like
//! the 160 x 120 playfield the encounter script was authored against.
//! Bevy renders in world space: origin at the centre, `y` growing upwards.
//! Every conversion goes through this type so the two never get mixed.

use bevy::prelude::*;

use super::tunables::Tunables;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenBounds {
    fn default() -> Self {
        Self { width: 160.0, height: 120.0 }
    }
}

impl ScreenBounds {
    pub fn from_tunables(t: &Tunables) -> Self {
        Self { width: t.screen_width, height: t.screen_height }
    }

    #[inline]
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(screen.x - self.width * 0.5, self.height * 0.5 - screen.y)
    }

    #[inline]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x + self.width * 0.5, self.height * 0.5 - world.y)
    }

    /// Velocities and accelerations only flip the vertical axis.
    #[inline]
    pub fn vector_to_world(v: Vec2) -> Vec2 {
        Vec2::new(v.x, -v.y)
    }

    #[inline]
    pub fn vector_to_screen(v: Vec2) -> Vec2 {
        Vec2::new(v.x, -v.y)
    }

    /// A box of `half_extents` centred at `screen` is entirely outside the screen.
    pub fn is_fully_outside(&self, screen: Vec2, half_extents: Vec2) -> bool {
        screen.x + half_extents.x < 0.0
            || screen.x - half_extents.x > self.width
            || screen.y + half_extents.y < 0.0
            || screen.y - half_extents.y > self.height
    }

    /// Clamp a box so it stays fully inside the screen.
    pub fn clamp_inside(&self, screen: Vec2, half_extents: Vec2) -> Vec2 {
        let hx = half_extents.x.min(self.width * 0.5);
        let hy = half_extents.y.min(self.height * 0.5);
        Vec2::new(
            screen.x.clamp(hx, self.width - hx),
            screen.y.clamp(hy, self.height - hy),
        )
    }
}

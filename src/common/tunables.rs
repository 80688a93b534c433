//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    /// Fixed simulation rate. Every cadence in the game is counted in these ticks.
    pub tick_hz: f64,
    pub screen_width: f32,
    pub screen_height: f32,
    /// Physics length unit; the playfield is a few dozen units across.
    pub pixels_per_meter: f32,
    pub player_speed: f32,
    pub player_bullet_speed: f32,
    /// Displacement applied to the player when rammed.
    pub knockback: f32,
    pub player_max_life: u32,
    pub starting_bombs: u32,
    pub rng_seed: u64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            tick_hz: 20.0,
            screen_width: 160.0,
            screen_height: 120.0,
            pixels_per_meter: 10.0,
            player_speed: 100.0,
            player_bullet_speed: 100.0,
            knockback: 30.0,
            player_max_life: 50,
            starting_bombs: 2,
            rng_seed: 0x5EED_5C41_D0D0,
        }
    }
}

impl Tunables {
    /// Convert a wall-clock cadence into simulation ticks (nearest, at least one).
    pub fn ticks(&self, millis: u64) -> u64 {
        let t = (millis as f64 * self.tick_hz / 1000.0).round() as u64;
        t.max(1)
    }
}

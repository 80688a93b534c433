//! Seeded randomness for the few non-scripted decisions (power-up rolls).

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Resource, Debug, Clone)]
pub struct GameRng(ChaCha8Rng);

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// `true` with the given percent chance (0..=100).
    pub fn percent_chance(&mut self, percent: u32) -> bool {
        self.0.gen_range(0..100) < percent.min(100)
    }

    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..hi)
    }
}

//! Global state machine.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    /// The encounter script ran out and the completion delay elapsed.
    Victory,
    /// Player life reached zero.
    Defeat,
}

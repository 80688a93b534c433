//! Collision layers.
//!
//! One layer per actor category. Overlap subscriptions are expressed as
//! membership/filter pairs, so only the (categoryA, categoryB) pairs the
//! combat rules care about ever produce `CollisionStart` messages.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
    Powerup,
}

#[inline]
pub fn player_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Player,
        [Layer::Enemy, Layer::EnemyBullet, Layer::Powerup],
    )
}

#[inline]
pub fn enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [Layer::Player, Layer::PlayerBullet])
}

#[inline]
pub fn player_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerBullet, [Layer::Enemy])
}

#[inline]
pub fn enemy_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::EnemyBullet, [Layer::Player])
}

#[inline]
pub fn powerup_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Powerup, [Layer::Player])
}

/// Hidden power-ups keep their components but collide with nothing.
#[inline]
pub fn ghost_layers(membership: Layer) -> CollisionLayers {
    CollisionLayers::new(membership, [] as [Layer; 0])
}

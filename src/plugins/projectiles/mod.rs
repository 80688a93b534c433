//! Projectiles: message-based producer -> consumer spawning.
//!
//! ```text
//! FixedUpdate / Behaviour:  enemy volleys, player fire  --write-->  SpawnProjectile
//! FixedUpdate / Emit:       spawn_requested_projectiles --reads-->  SpawnProjectile
//! FixedPostUpdate:          physics -> combat resolution despawns what it consumed
//! ```
//!
//! Producers never touch `Commands` for projectiles; they only enqueue intent.
//! The consumer is the single place that knows what a projectile entity looks like.
//! Requests carry world-space vectors; producers convert from screen space.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::{enemy_bullet_layers, player_bullet_layers};
use crate::common::sets::SimSet;
use crate::common::state::GameState;
use crate::plugins::movement::{Acceleration, AutoDespawn, Extent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Projectile {
    pub owner: ProjectileOwner,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnProjectile {
    pub owner: ProjectileOwner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
}

pub fn plugin(app: &mut App) {
    app.add_message::<SpawnProjectile>();

    app.add_systems(
        FixedUpdate,
        spawn_requested_projectiles
            .in_set(SimSet::Emit)
            .run_if(in_state(GameState::InGame)),
    );
}

pub fn spawn_requested_projectiles(mut commands: Commands, mut reader: MessageReader<SpawnProjectile>) {
    for req in reader.read() {
        let (size, color, layers, z) = match req.owner {
            ProjectileOwner::Player => (
                Vec2::new(1.0, 2.0),
                Color::srgb(1.0, 1.0, 1.0),
                player_bullet_layers(),
                3.0,
            ),
            ProjectileOwner::Enemy => (
                Vec2::splat(3.0),
                Color::srgb(1.0, 0.55, 0.2),
                enemy_bullet_layers(),
                4.0,
            ),
        };

        let mut e = commands.spawn((
            Name::new("Projectile"),
            Projectile { owner: req.owner },
            Sprite {
                color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(req.pos.extend(z)),
            RigidBody::Dynamic,
            Sensor,
            Collider::rectangle(size.x, size.y),
            layers,
            LinearVelocity(req.vel),
            CollisionEventsEnabled,
            AutoDespawn,
            Extent(size * 0.5),
            DespawnOnExit(GameState::InGame),
        ));

        if req.accel != Vec2::ZERO {
            e.insert(Acceleration(req.accel));
        }
    }
}

#[cfg(test)]
mod tests;

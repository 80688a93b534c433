//! Enemies: variant data, actor state machine, registry, volleys and the destroy step.
//!
//! ---------------------------
//! HOW THIS IS DESIGNED
//! ---------------------------
//! 1) FACTS live in the `EnemyRegistry` resource: one `Actor` per live enemy
//!    entity (hit points, score, its volley task handle). The entity itself only
//!    carries presentation + physics.
//!
//! 2) RULES mutate facts in predictable places:
//!    - combat resolution calls `Actor::take_hit` and, on the single transition
//!      into `Destroyed`, awards score, cancels the volley task and requests release;
//!    - `fire_enemy_volleys` turns fired volley tasks into projectile requests.
//!
//! 3) The DESTROY STEP (`release_actors`) is the only place an enemy entity is
//!    despawned. It removes the registry entry (idempotent), cancels any task
//!    still attached (off-screen exits never went through combat) and emits
//!    `ActorDestroyed` for presentation. It runs at the end of the tick, so no
//!    stale entry survives a tick boundary.

use bevy::prelude::*;

pub mod actor;
pub mod profile;
pub mod registry;
pub mod spawn;

pub use actor::{Actor, HitOutcome, HitSource, Life};
pub use profile::{Category, EnemyKind, ShotPattern};
pub use registry::{ActorId, EnemyRegistry};
pub use spawn::EnemySpawner;

use crate::common::screen::ScreenBounds;
use crate::common::sets::{ResolveSet, SimSet};
use crate::common::state::GameState;
use crate::plugins::clock::{Task, TickScheduler};
use crate::plugins::player::Player;
use crate::plugins::projectiles::{ProjectileOwner, SpawnProjectile};

#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy;

/// Cosmetic marker: the actor dropped below half hit points.
#[derive(Component, Debug, Clone, Copy)]
pub struct Smoking;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseEffect {
    /// Destroyed in combat: show the destruction effect.
    Explode,
    /// Left the screen.
    Silent,
}

/// Request for the destroy step.
#[derive(Message, Clone, Copy, Debug)]
pub struct ReleaseActor {
    pub entity: Entity,
    pub effect: ReleaseEffect,
}

/// Emitted once per actor the destroy step released with `ReleaseEffect::Explode`.
#[derive(Message, Clone, Copy, Debug)]
pub struct ActorDestroyed {
    pub entity: Entity,
    pub kind: EnemyKind,
    /// World position at the moment of release.
    pub pos: Vec2,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(EnemyRegistry::default());
    app.add_message::<ReleaseActor>();
    app.add_message::<ActorDestroyed>();

    app.add_systems(
        FixedUpdate,
        fire_enemy_volleys
            .in_set(SimSet::Behaviour)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        release_actors
            .in_set(ResolveSet::Release)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Turn fired volley tasks into projectile requests.
///
/// A task whose owner is gone from the registry is cancelled on the spot; that only
/// happens if an entity disappeared without passing through the destroy step.
pub fn fire_enemy_volleys(
    mut scheduler: ResMut<TickScheduler>,
    registry: Res<EnemyRegistry>,
    screen: Res<ScreenBounds>,
    q_enemy: Query<(&Transform, &avian2d::prelude::LinearVelocity), With<Enemy>>,
    q_player: Query<&Transform, With<Player>>,
    mut shots: MessageWriter<SpawnProjectile>,
) {
    let fired = scheduler.take_fired(|t| matches!(t, Task::EnemyVolley(_)));
    if fired.is_empty() {
        return;
    }

    let target = q_player
        .single()
        .ok()
        .map(|tf| screen.to_screen(tf.translation.truncate()));

    for (handle, task) in fired {
        let Task::EnemyVolley(id) = task else { continue };

        let Some(actor) = registry.get(id).filter(|a| a.is_alive()) else {
            scheduler.cancel(handle);
            continue;
        };
        let Ok((tf, vel)) = q_enemy.get(actor.entity) else {
            continue;
        };

        let origin_world = tf.translation.truncate();
        let origin = screen.to_screen(origin_world);
        let own_vel = ScreenBounds::vector_to_screen(vel.0);
        let offset = target.map(|t| t - origin);

        for shot in profile::volley(actor.kind.profile().shot, own_vel, offset) {
            shots.write(SpawnProjectile {
                owner: ProjectileOwner::Enemy,
                pos: origin_world,
                vel: ScreenBounds::vector_to_world(shot.vel),
                accel: ScreenBounds::vector_to_world(shot.accel),
            });
        }
    }
}

/// The destroy step. Safe to receive the same entity more than once.
pub fn release_actors(
    mut commands: Commands,
    mut reader: MessageReader<ReleaseActor>,
    mut registry: ResMut<EnemyRegistry>,
    mut scheduler: ResMut<TickScheduler>,
    mut destroyed: MessageWriter<ActorDestroyed>,
    q_tf: Query<&Transform>,
) {
    for req in reader.read() {
        let Some(mut actor) = registry.remove(req.entity) else {
            continue;
        };

        if let Some(task) = actor.take_shot_task() {
            scheduler.cancel(task);
        }

        if req.effect == ReleaseEffect::Explode {
            let pos = q_tf
                .get(req.entity)
                .map(|tf| tf.translation.truncate())
                .unwrap_or_default();
            destroyed.write(ActorDestroyed { entity: req.entity, kind: actor.kind, pos });
        }

        commands.entity(req.entity).try_despawn();
    }
}

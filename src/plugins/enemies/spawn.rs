//! Spawn-time wiring: visual entity + registry entry + periodic volley task.

use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use super::actor::Actor;
use super::profile::{EnemyKind, volley};
use super::registry::EnemyRegistry;
use super::Enemy;
use crate::common::layers::enemy_layers;
use crate::common::screen::ScreenBounds;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::clock::{Task, TickScheduler};
use crate::plugins::movement::{AutoDespawn, Extent, MovementSpec, resolve};
use crate::plugins::projectiles::{ProjectileOwner, SpawnProjectile};

/// Everything needed to bring an actor into the world.
///
/// The scheduler is public so callers that also own tasks (the timeline)
/// can share this borrow instead of requesting it twice.
#[derive(SystemParam)]
pub struct EnemySpawner<'w, 's> {
    commands: Commands<'w, 's>,
    registry: ResMut<'w, EnemyRegistry>,
    pub scheduler: ResMut<'w, TickScheduler>,
    tunables: Res<'w, Tunables>,
    screen: Res<'w, ScreenBounds>,
    shots: MessageWriter<'w, SpawnProjectile>,
}

impl EnemySpawner<'_, '_> {
    pub fn spawn(&mut self, kind: EnemyKind, movement: MovementSpec) -> Entity {
        let profile = kind.profile();
        let launch = resolve(movement, &self.screen);
        let world_pos = self.screen.to_world(launch.pos);
        let world_vel = ScreenBounds::vector_to_world(launch.vel);
        let size = profile.half_extents * 2.0;

        let entity = self
            .commands
            .spawn((
                Name::new(format!("{kind:?}")),
                Enemy,
                kind,
                Sprite {
                    color: profile.color,
                    custom_size: Some(size),
                    ..default()
                },
                Transform::from_translation(world_pos.extend(1.0)),
                RigidBody::Kinematic,
                Collider::rectangle(size.x, size.y),
                enemy_layers(),
                LinearVelocity(world_vel),
                CollisionEventsEnabled,
                AutoDespawn,
                Extent(profile.half_extents),
                DespawnOnExit(GameState::InGame),
            ))
            .id();

        let id = self.registry.spawn(Actor::new(entity, kind, movement));

        if let Some(ms) = profile.volley_every_ms {
            let every = self.tunables.ticks(ms);
            let handle = self.scheduler.every(every, Task::EnemyVolley(id));
            if let Some(actor) = self.registry.get_mut(id) {
                actor.attach_shot_task(handle);
            }
        }

        if profile.fires_on_spawn {
            for shot in volley(profile.shot, launch.vel, None) {
                self.shots.write(SpawnProjectile {
                    owner: ProjectileOwner::Enemy,
                    pos: world_pos,
                    vel: ScreenBounds::vector_to_world(shot.vel),
                    accel: ScreenBounds::vector_to_world(shot.accel),
                });
            }
        }

        debug!(
            "spawned {kind:?} {entity:?} at tick {} heading {:?}",
            self.scheduler.tick(),
            movement.direction
        );
        entity
    }
}

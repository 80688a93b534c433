//! Combat resolution: overlap messages and bomb detonations in, hit outcomes out.
//!
//! ```text
//! (A) physics step writes CollisionStart and updates the player's CollidingEntities
//! (B) ResolveSet::Combat, in order:
//!     bomb -> player bullets -> enemy contact -> enemy bullets
//!     every enemy hit goes through `HitResolver::strike`
//! (C) ResolveSet::Release: destroy step removes what (B) destroyed
//! ```
//!
//! Projectiles resolve on contact start. Ramming resolves every tick the player is
//! still touching a plane, so a survivor pinning the player keeps hurting it.
//! Actors destroyed earlier in the tick are wrecks: they stay registered until the
//! destroy step, but nothing about them is resolved any more.
//!
//! `strike` is the only path from a hit to score. It relies on `Actor::take_hit`
//! reporting `Destroyed` exactly once, so a bomb and a bullet landing on the same
//! actor in one tick award score once.

use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::screen::ScreenBounds;
use crate::common::sets::ResolveSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::clock::TickScheduler;
use crate::plugins::enemies::{
    Category, EnemyRegistry, HitOutcome, HitSource, ReleaseActor, ReleaseEffect, Smoking,
};
use crate::plugins::fx::CombatCue;
use crate::plugins::movement::Direction;
use crate::plugins::player::{BombDetonated, Player, PlayerHit, PlayerState, Score};
use crate::plugins::projectiles::{Projectile, ProjectileOwner};

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedPostUpdate,
        (
            resolve_bomb,
            resolve_player_bullet_hits,
            resolve_enemy_contact,
            resolve_enemy_bullet_hits,
        )
            .chain()
            .in_set(ResolveSet::Combat)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Everything a hit on an enemy may touch.
#[derive(SystemParam)]
pub struct HitResolver<'w, 's> {
    commands: Commands<'w, 's>,
    registry: ResMut<'w, EnemyRegistry>,
    scheduler: ResMut<'w, TickScheduler>,
    score: ResMut<'w, Score>,
    release: MessageWriter<'w, ReleaseActor>,
    cues: MessageWriter<'w, CombatCue>,
}

impl HitResolver<'_, '_> {
    /// Apply one hit to the actor behind `entity`. Unregistered entities are ignored.
    pub fn strike(&mut self, entity: Entity, source: HitSource) -> HitOutcome {
        let Some(actor) = self.registry.lookup_mut(entity) else {
            return HitOutcome::Ignored;
        };

        let outcome = actor.take_hit(source);
        match outcome {
            HitOutcome::Destroyed { score } => {
                let kind = actor.kind;
                if let Some(task) = actor.take_shot_task() {
                    self.scheduler.cancel(task);
                }
                self.score.0 += score;
                self.release.write(ReleaseActor { entity, effect: ReleaseEffect::Explode });
                self.cues.write(CombatCue::Destroyed { kind, score });
                debug!("{kind:?} {entity:?} destroyed by {source:?}, +{score}");
            }
            HitOutcome::Crippled => {
                self.commands.entity(entity).try_insert(Smoking);
            }
            HitOutcome::Damaged | HitOutcome::Ignored => {}
        }
        outcome
    }

    /// Travel direction of a live plane; `None` for ships, wrecks and strangers.
    pub fn rammer(&self, entity: Entity) -> Option<Direction> {
        self.registry
            .lookup(entity)
            .filter(|a| a.is_alive() && a.category() == Category::Plane)
            .map(|a| a.movement.direction)
    }

    /// Every registered actor, in registration slot order.
    pub fn targets(&self) -> Vec<Entity> {
        self.registry.entities()
    }

    pub fn consume(&mut self, projectile: Entity) {
        self.commands.entity(projectile).try_despawn();
    }
}

/// Order the pair so the entity matching `is_first` comes first.
#[inline]
fn split_pair(ev: &CollisionStart, mut is_first: impl FnMut(Entity) -> bool) -> Option<(Entity, Entity)> {
    let (a, b) = (ev.collider1, ev.collider2);
    match (is_first(a), is_first(b)) {
        (true, false) => Some((a, b)),
        (false, true) => Some((b, a)),
        _ => None,
    }
}

/// Area hit on every registered actor, then clear the enemy fire.
pub fn resolve_bomb(
    mut bombs: MessageReader<BombDetonated>,
    mut hits: HitResolver,
    q_projectiles: Query<(Entity, &Projectile)>,
) {
    let count = bombs.read().count();
    if count == 0 {
        return;
    }

    for _ in 0..count {
        for target in hits.targets() {
            hits.strike(target, HitSource::Area);
        }
    }

    for (e, p) in &q_projectiles {
        if p.owner == ProjectileOwner::Enemy {
            hits.consume(e);
        }
    }
}

pub fn resolve_player_bullet_hits(
    mut started: MessageReader<CollisionStart>,
    q_projectiles: Query<&Projectile>,
    mut hits: HitResolver,
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let Some((bullet, other)) = split_pair(ev, |e| {
            q_projectiles
                .get(e)
                .is_ok_and(|p| p.owner == ProjectileOwner::Player)
        }) else {
            continue;
        };

        if seen.contains(&bullet) {
            continue;
        }

        // A bullet passing through a wreck is not spent.
        if hits.strike(other, HitSource::Projectile) != HitOutcome::Ignored {
            seen.insert(bullet);
            hits.consume(bullet);
        }
    }
}

/// Ramming: every live plane the player touches this tick damages the player, knocks it
/// back along the plane's travel direction and takes a contact hit. Ships are harmless.
pub fn resolve_enemy_contact(
    tunables: Res<Tunables>,
    mut state: ResMut<PlayerState>,
    mut q_player: Query<(&mut Transform, &CollidingEntities), With<Player>>,
    mut hits: HitResolver,
) {
    let Ok((mut tf, touching)) = q_player.single_mut() else {
        return;
    };

    let mut touching: Vec<Entity> = touching.iter().copied().collect();
    touching.sort_unstable();

    for other in touching {
        let Some(direction) = hits.rammer(other) else {
            continue;
        };

        let hit = state.absorb_hit();
        hits.cues.write(player_cue(hit));

        let push = ScreenBounds::vector_to_world(direction.unit() * tunables.knockback);
        tf.translation += push.extend(0.0);

        hits.strike(other, HitSource::Contact);
    }
}

pub fn resolve_enemy_bullet_hits(
    mut commands: Commands,
    mut started: MessageReader<CollisionStart>,
    mut state: ResMut<PlayerState>,
    mut cues: MessageWriter<CombatCue>,
    q_projectiles: Query<&Projectile>,
    q_player: Query<(), With<Player>>,
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let Some((bullet, other)) = split_pair(ev, |e| {
            q_projectiles
                .get(e)
                .is_ok_and(|p| p.owner == ProjectileOwner::Enemy)
        }) else {
            continue;
        };

        if !q_player.contains(other) || !seen.insert(bullet) {
            continue;
        }

        let hit = state.absorb_hit();
        cues.write(player_cue(hit));
        commands.entity(bullet).try_despawn();
    }
}

#[inline]
fn player_cue(hit: PlayerHit) -> CombatCue {
    match hit {
        PlayerHit::Shielded => CombatCue::ShieldHit,
        PlayerHit::LifeLost => CombatCue::LifeLost,
    }
}

#[cfg(test)]
mod tests;

//! Hostile actor state machine.
//!
//! ```text
//! Alive --hit, hp < max/2--> Damaged --hit, hp == 0--> Destroyed
//!   \______________________hit, hp == 0______________/
//! ```
//!
//! `Destroyed` is terminal: any later hit is ignored, so score and effects
//! can only ever be produced by the single transition into it.

use bevy::prelude::*;

use super::profile::{AREA_DAMAGE, Category, EnemyKind};
use crate::plugins::clock::TaskHandle;
use crate::plugins::movement::MovementSpec;

/// What hit the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitSource {
    /// Ordinary player projectile; consumed on contact.
    Projectile,
    /// Screen-clearing weapon; never consumed.
    Area,
    /// Body collision with the player.
    Contact,
}

impl HitSource {
    #[inline]
    pub fn damage(self) -> u32 {
        match self {
            HitSource::Area => AREA_DAMAGE,
            HitSource::Projectile | HitSource::Contact => 1,
        }
    }

    #[inline]
    pub fn is_consumed(self) -> bool {
        matches!(self, HitSource::Projectile)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Life {
    Alive,
    /// Cosmetic only: below half hit points.
    Damaged,
    Destroyed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// Already destroyed; nothing happened.
    Ignored,
    Damaged,
    /// First hit that took the actor below half hit points.
    Crippled,
    /// The one transition into `Destroyed`.
    Destroyed { score: u32 },
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub entity: Entity,
    pub kind: EnemyKind,
    pub movement: MovementSpec,
    hit_points: u32,
    max_hit_points: u32,
    score_value: u32,
    life: Life,
    shot_task: Option<TaskHandle>,
}

impl Actor {
    pub fn new(entity: Entity, kind: EnemyKind, movement: MovementSpec) -> Self {
        let profile = kind.profile();
        Self {
            entity,
            kind,
            movement,
            hit_points: profile.max_hit_points,
            max_hit_points: profile.max_hit_points,
            score_value: profile.score_value,
            life: Life::Alive,
            shot_task: None,
        }
    }

    #[inline]
    pub fn hit_points(&self) -> u32 {
        self.hit_points
    }

    #[inline]
    pub fn max_hit_points(&self) -> u32 {
        self.max_hit_points
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score_value
    }

    #[inline]
    pub fn life(&self) -> Life {
        self.life
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life != Life::Destroyed
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.kind.profile().category
    }

    pub fn attach_shot_task(&mut self, handle: TaskHandle) {
        self.shot_task = Some(handle);
    }

    #[inline]
    pub fn shot_task(&self) -> Option<TaskHandle> {
        self.shot_task
    }

    /// Hand the periodic task over for cancellation. Yields it at most once.
    pub fn take_shot_task(&mut self) -> Option<TaskHandle> {
        self.shot_task.take()
    }

    pub fn take_hit(&mut self, source: HitSource) -> HitOutcome {
        if self.life == Life::Destroyed {
            return HitOutcome::Ignored;
        }

        self.hit_points = self.hit_points.saturating_sub(source.damage());

        if self.hit_points == 0 {
            self.life = Life::Destroyed;
            return HitOutcome::Destroyed { score: self.score_value };
        }

        if self.hit_points * 2 < self.max_hit_points && self.life == Life::Alive {
            self.life = Life::Damaged;
            return HitOutcome::Crippled;
        }

        HitOutcome::Damaged
    }
}

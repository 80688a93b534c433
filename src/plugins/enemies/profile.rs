//! Per-variant data and shot patterns.
//!
//! Variants differ only in data: a `match` on `EnemyKind` picks the profile,
//! and a `match` on `ShotPattern` builds a volley. All vectors here are in
//! screen space (y down).

use bevy::prelude::*;

/// Damage dealt by an area weapon in a single resolution.
pub const AREA_DAMAGE: u32 = 11;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Green,
    Red,
    Gray,
    Big,
    Bomber,
    SmallShip,
}

/// Ships never deal contact damage; everything else rams.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Plane,
    Ship,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotPattern {
    None,
    /// One shot along the actor's own travel axis, accelerating.
    AxisAligned,
    /// One shot straight down the screen.
    Straight,
    /// Centre shot plus two angled ones.
    Radial3,
    /// One shot toward the player.
    Aimed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    pub max_hit_points: u32,
    pub score_value: u32,
    pub category: Category,
    pub shot: ShotPattern,
    /// Fire one volley the moment the actor appears.
    pub fires_on_spawn: bool,
    /// Cadence of the periodic volley, in milliseconds of simulation time.
    pub volley_every_ms: Option<u64>,
    pub half_extents: Vec2,
    pub color: Color,
}

impl EnemyKind {
    pub fn profile(self) -> EnemyProfile {
        match self {
            EnemyKind::Green => EnemyProfile {
                max_hit_points: 1,
                score_value: 10,
                category: Category::Plane,
                shot: ShotPattern::None,
                fires_on_spawn: false,
                volley_every_ms: None,
                half_extents: Vec2::new(7.0, 6.0),
                color: Color::srgb(0.35, 0.75, 0.3),
            },
            EnemyKind::Red => EnemyProfile {
                max_hit_points: 1,
                score_value: 10,
                category: Category::Plane,
                shot: ShotPattern::None,
                fires_on_spawn: false,
                volley_every_ms: None,
                half_extents: Vec2::new(7.5, 7.0),
                color: Color::srgb(0.85, 0.2, 0.2),
            },
            EnemyKind::Gray => EnemyProfile {
                max_hit_points: 1,
                score_value: 20,
                category: Category::Plane,
                shot: ShotPattern::AxisAligned,
                fires_on_spawn: true,
                volley_every_ms: None,
                half_extents: Vec2::new(7.0, 7.0),
                color: Color::srgb(0.55, 0.6, 0.65),
            },
            EnemyKind::Big => EnemyProfile {
                max_hit_points: 3,
                score_value: 30,
                category: Category::Plane,
                shot: ShotPattern::Straight,
                fires_on_spawn: true,
                volley_every_ms: Some(1200),
                half_extents: Vec2::new(12.0, 9.5),
                color: Color::srgb(0.2, 0.55, 0.25),
            },
            EnemyKind::Bomber => EnemyProfile {
                max_hit_points: 20,
                score_value: 100,
                category: Category::Plane,
                shot: ShotPattern::Radial3,
                fires_on_spawn: true,
                volley_every_ms: Some(800),
                half_extents: Vec2::new(24.0, 15.0),
                color: Color::srgb(0.8, 0.78, 0.7),
            },
            EnemyKind::SmallShip => EnemyProfile {
                max_hit_points: 6,
                score_value: 20,
                category: Category::Ship,
                shot: ShotPattern::Aimed,
                fires_on_spawn: false,
                volley_every_ms: Some(3000),
                half_extents: Vec2::new(4.0, 8.0),
                color: Color::srgb(0.3, 0.5, 0.6),
            },
        }
    }
}

/// One projectile of a volley, relative to the shooter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub vel: Vec2,
    pub accel: Vec2,
}

impl Shot {
    const fn moving(vel: Vec2) -> Self {
        Self { vel, accel: Vec2::ZERO }
    }
}

const AXIS_SHOT_SPEED: f32 = 50.0;
const AXIS_SHOT_ACCEL: f32 = 200.0;
const STRAIGHT_SHOT_SPEED: f32 = 70.0;
const AIMED_SHOT_SPEED: f32 = 30.0;
const RADIAL_SHOTS: [Vec2; 3] = [
    Vec2::new(0.0, 100.0),
    Vec2::new(-50.0, 87.0),
    Vec2::new(50.0, 87.0),
];

/// `f32::signum` maps 0.0 to 1.0; shots need a true three-way sign.
#[inline]
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Build a volley.
///
/// - `own_vel`: shooter velocity, used by the axis-aligned pattern.
/// - `offset_to_target`: target position minus shooter position, used by the aimed pattern.
pub fn volley(pattern: ShotPattern, own_vel: Vec2, offset_to_target: Option<Vec2>) -> Vec<Shot> {
    match pattern {
        ShotPattern::None => Vec::new(),
        ShotPattern::AxisAligned => vec![axis_aligned(own_vel)],
        ShotPattern::Straight => vec![Shot::moving(Vec2::new(0.0, STRAIGHT_SHOT_SPEED))],
        ShotPattern::Radial3 => RADIAL_SHOTS.iter().copied().map(Shot::moving).collect(),
        ShotPattern::Aimed => {
            let offset = offset_to_target.unwrap_or(Vec2::Y);
            vec![Shot::moving(aimed(offset, AIMED_SHOT_SPEED))]
        }
    }
}

fn axis_aligned(own_vel: Vec2) -> Shot {
    let (sx, sy) = (sign(own_vel.x), sign(own_vel.y));
    let mut vel = Vec2::new(AXIS_SHOT_SPEED * sx, AXIS_SHOT_SPEED * sy);
    let mut accel = Vec2::new(AXIS_SHOT_ACCEL * sx, AXIS_SHOT_ACCEL * sy);
    if own_vel.x != 0.0 {
        vel.y = 0.0;
        accel.y = 0.0;
    } else if own_vel.y != 0.0 {
        vel.x = 0.0;
        accel.x = 0.0;
    }
    Shot { vel, accel }
}

/// Velocity of magnitude `speed` along the bearing to the target.
///
/// Zero horizontal offset has no defined bearing: shoot purely vertically
/// toward the target (downwards if it sits exactly on the shooter).
pub fn aimed(offset: Vec2, speed: f32) -> Vec2 {
    if offset.x == 0.0 {
        let dir = if offset.y < 0.0 { -1.0 } else { 1.0 };
        return Vec2::new(0.0, speed * dir);
    }
    let bearing = (offset.y / offset.x).atan();
    let side = sign(offset.x);
    Vec2::new(speed * bearing.cos() * side, speed * bearing.sin() * side)
}

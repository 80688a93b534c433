//! Movement model + the little bit of kinematics the game needs.
//!
//! - `resolve` anchors an actor on the screen edge opposite its direction of
//!   travel and derives its velocity (screen space).
//! - `Acceleration` adds a constant acceleration to `LinearVelocity` every tick.
//! - `AutoDespawn` entities are culled once fully off screen (actors go through the
//!   registry's destroy step, everything else is despawned directly).
//! - `StayOnScreen` entities are clamped inside the screen.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::screen::ScreenBounds;
use crate::common::sets::{ResolveSet, SimSet};
use crate::common::state::GameState;
use crate::plugins::enemies::{Enemy, ReleaseActor, ReleaseEffect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

/// Abstract spawn descriptor: which way to fly, where along the entry edge, how fast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementSpec {
    pub direction: Direction,
    pub lane: f32,
    pub speed: f32,
}

/// Initial screen-space position and velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Launch {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// No range checks: lane and speed are taken as authored.
pub fn resolve(spec: MovementSpec, screen: &ScreenBounds) -> Launch {
    let MovementSpec { direction, lane, speed } = spec;
    let (pos, vel) = match direction {
        Direction::Down => (Vec2::new(lane, 0.0), Vec2::new(0.0, speed)),
        Direction::Up => (Vec2::new(lane, screen.height), Vec2::new(0.0, -speed)),
        Direction::Left => (Vec2::new(screen.width, lane), Vec2::new(-speed, 0.0)),
        Direction::Right => (Vec2::new(0.0, lane), Vec2::new(speed, 0.0)),
    };
    Launch { pos, vel }
}

impl Direction {
    /// Unit vector of travel in screen space.
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Constant acceleration in world units per second squared.
#[derive(Component, Debug, Clone, Copy, Default, Deref, DerefMut)]
pub struct Acceleration(pub Vec2);

/// Half size of the visual, used for off-screen and clamping tests.
#[derive(Component, Debug, Clone, Copy, Deref)]
pub struct Extent(pub Vec2);

/// Destroy once the visual has fully left the screen.
#[derive(Component, Debug, Clone, Copy)]
pub struct AutoDespawn;

/// Keep the visual fully inside the screen.
#[derive(Component, Debug, Clone, Copy)]
pub struct StayOnScreen;

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        apply_acceleration
            .in_set(SimSet::Behaviour)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        (cull_off_screen, keep_on_screen)
            .in_set(ResolveSet::Release)
            .before(crate::plugins::enemies::release_actors)
            .run_if(in_state(GameState::InGame)),
    );
}

fn apply_acceleration(time: Res<Time<Fixed>>, mut q: Query<(&Acceleration, &mut LinearVelocity)>) {
    let dt = time.delta_secs();
    for (acc, mut vel) in &mut q {
        vel.0 += acc.0 * dt;
    }
}

fn cull_off_screen(
    mut commands: Commands,
    screen: Res<ScreenBounds>,
    mut release: MessageWriter<ReleaseActor>,
    q: Query<(Entity, &Transform, &Extent, Has<Enemy>), With<AutoDespawn>>,
) {
    for (e, tf, extent, is_enemy) in &q {
        let pos = screen.to_screen(tf.translation.truncate());
        if !screen.is_fully_outside(pos, extent.0) {
            continue;
        }
        if is_enemy {
            release.write(ReleaseActor { entity: e, effect: ReleaseEffect::Silent });
        } else {
            commands.entity(e).try_despawn();
        }
    }
}

fn keep_on_screen(
    screen: Res<ScreenBounds>,
    mut q: Query<(&mut Transform, &Extent), With<StayOnScreen>>,
) {
    for (mut tf, extent) in &mut q {
        let pos = screen.to_screen(tf.translation.truncate());
        let clamped = screen.clamp_inside(pos, extent.0);
        if clamped != pos {
            let world = screen.to_world(clamped);
            tf.translation.x = world.x;
            tf.translation.y = world.y;
        }
    }
}

//! Player plugin.
//!
//! Pipeline:
//! - Update: sample input, write `PlayerInput` (presses are latched until a fixed step consumes them)
//! - FixedUpdate: velocity, weapon fire (press + auto-fire task), bomb detonation
//! - FixedPostUpdate: combat resolution applies damage through `PlayerState::absorb_hit`
//!
//! `PlayerState` is a layered defence: a hit first costs a weapon level (if above 1)
//! and only then a life.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::player_layers;
use crate::common::screen::ScreenBounds;
use crate::common::sets::{ResolveSet, SimSet};
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::clock::{Task, TaskHandle, TickScheduler};
use crate::plugins::fx::CombatCue;
use crate::plugins::movement::{Extent, StayOnScreen};
use crate::plugins::projectiles::{ProjectileOwner, SpawnProjectile};

pub const MAX_WEAPON_LEVEL: u32 = 3;
pub const MAX_BOMBS: u32 = 3;
const AUTO_FIRE_MS: u64 = 250;
const SPAWN_SCREEN_POS: Vec2 = Vec2::new(80.0, 110.0);
const HALF_EXTENTS: Vec2 = Vec2::new(8.0, 7.0);

#[derive(Component)]
pub struct Player;

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub life: u32,
    pub max_life: u32,
    /// 1..=3
    pub weapon_level: u32,
    /// 0..=3
    pub bombs: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerHit {
    /// A weapon level soaked the hit.
    Shielded,
    LifeLost,
}

impl PlayerState {
    pub fn new(max_life: u32, bombs: u32) -> Self {
        Self {
            life: max_life,
            max_life,
            weapon_level: 1,
            bombs: bombs.min(MAX_BOMBS),
        }
    }

    pub fn absorb_hit(&mut self) -> PlayerHit {
        if self.weapon_level > 1 {
            self.weapon_level -= 1;
            PlayerHit::Shielded
        } else {
            self.life = self.life.saturating_sub(1);
            PlayerHit::LifeLost
        }
    }

    pub fn upgrade_weapon(&mut self) {
        self.weapon_level = (self.weapon_level + 1).min(MAX_WEAPON_LEVEL);
    }

    pub fn add_bomb(&mut self) {
        self.bombs = (self.bombs + 1).min(MAX_BOMBS);
    }

    pub fn add_life(&mut self) {
        self.life = (self.life + 1).min(self.max_life);
    }

    /// Spend a bomb charge if there is one.
    pub fn try_use_bomb(&mut self) -> bool {
        if self.bombs == 0 {
            return false;
        }
        self.bombs -= 1;
        true
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life == 0
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        let t = Tunables::default();
        Self::new(t.player_max_life, t.starting_bombs)
    }
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score(pub u32);

/// An area weapon went off this tick.
#[derive(Message, Clone, Copy, Debug)]
pub struct BombDetonated;

#[derive(Resource, Default, Debug)]
struct PlayerInput {
    move_axis: Vec2,
    fire_held: bool,
    fire_pressed: bool,
    bomb_pressed: bool,
}

/// Handle of the auto-fire task, so it is registered once per session.
#[derive(Resource, Default, Debug)]
struct AutoFire(Option<TaskHandle>);

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .insert_resource(PlayerState::default())
        .insert_resource(Score::default())
        .insert_resource(AutoFire::default())
        .add_message::<BombDetonated>()
        .add_systems(OnEnter(GameState::InGame), (reset_state, spawn))
        .add_systems(Update, gather_input)
        .add_systems(
            FixedUpdate,
            (apply_movement, fire_weapon, detonate_bomb)
                .in_set(SimSet::Behaviour)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            check_defeat
                .in_set(ResolveSet::Release)
                .run_if(in_state(GameState::InGame)),
        );
}

fn reset_state(mut commands: Commands, tunables: Res<Tunables>) {
    commands.insert_resource(PlayerState::new(tunables.player_max_life, tunables.starting_bombs));
    commands.insert_resource(Score::default());
}

fn spawn(
    mut commands: Commands,
    screen: Res<ScreenBounds>,
    tunables: Res<Tunables>,
    mut scheduler: ResMut<TickScheduler>,
    mut auto_fire: ResMut<AutoFire>,
) {
    let pos = screen.to_world(SPAWN_SCREEN_POS);
    let size = HALF_EXTENTS * 2.0;

    commands.spawn((
        Name::new("Player"),
        Player,
        Sprite {
            color: Color::srgb(0.95, 0.6, 0.15),
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(pos.extend(20.0)),
        RigidBody::Kinematic,
        Collider::rectangle(size.x, size.y),
        player_layers(),
        LinearVelocity::ZERO,
        CollisionEventsEnabled,
        CollidingEntities::default(),
        Extent(HALF_EXTENTS),
        StayOnScreen,
        DespawnOnExit(GameState::InGame),
    ));

    if let Some(old) = auto_fire.0.take() {
        scheduler.cancel(old);
    }
    auto_fire.0 = Some(scheduler.every(tunables.ticks(AUTO_FIRE_MS), Task::PlayerAutoFire));
}

fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<PlayerInput>) {
    let Some(keys) = keys else { return };

    let mut axis = Vec2::ZERO;
    if keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        axis.y += 1.0;
    }
    if keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        axis.y -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        axis.x -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        axis.x += 1.0;
    }

    input.move_axis = if axis.length_squared() > 0.0 {
        axis.normalize()
    } else {
        Vec2::ZERO
    };

    input.fire_held = keys.pressed(KeyCode::Space);
    input.fire_pressed |= keys.just_pressed(KeyCode::Space);
    input.bomb_pressed |= keys.just_pressed(KeyCode::KeyX);
}

fn apply_movement(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<&mut LinearVelocity, With<Player>>,
) {
    let Ok(mut vel) = q_player.single_mut() else {
        return;
    };
    vel.0 = input.move_axis * tunables.player_speed;
}

/// Screen-space velocities of one salvo at the given weapon level.
pub fn weapon_spread(level: u32, speed: f32) -> Vec<Vec2> {
    let k = speed / 100.0;
    let mut out = vec![Vec2::new(0.0, -100.0) * k];
    if level >= 2 {
        out.push(Vec2::new(-50.0, -87.0) * k);
        out.push(Vec2::new(50.0, -87.0) * k);
    }
    if level >= 3 {
        out.push(Vec2::new(-87.0, -50.0) * k);
        out.push(Vec2::new(87.0, -50.0) * k);
    }
    out
}

fn fire_weapon(
    tunables: Res<Tunables>,
    state: Res<PlayerState>,
    mut input: ResMut<PlayerInput>,
    mut scheduler: ResMut<TickScheduler>,
    q_player: Query<&Transform, With<Player>>,
    mut shots: MessageWriter<SpawnProjectile>,
) {
    let auto = !scheduler
        .take_fired(|t| matches!(t, Task::PlayerAutoFire))
        .is_empty();
    let pressed = std::mem::take(&mut input.fire_pressed);

    if !(pressed || (auto && input.fire_held)) {
        return;
    }
    let Ok(tf) = q_player.single() else {
        return;
    };

    let origin = tf.translation.truncate();
    for vel in weapon_spread(state.weapon_level, tunables.player_bullet_speed) {
        shots.write(SpawnProjectile {
            owner: ProjectileOwner::Player,
            pos: origin,
            vel: ScreenBounds::vector_to_world(vel),
            accel: Vec2::ZERO,
        });
    }
}

fn detonate_bomb(
    mut input: ResMut<PlayerInput>,
    mut state: ResMut<PlayerState>,
    mut bombs: MessageWriter<BombDetonated>,
    mut cues: MessageWriter<CombatCue>,
) {
    if !std::mem::take(&mut input.bomb_pressed) {
        return;
    }
    if state.try_use_bomb() {
        bombs.write(BombDetonated);
        cues.write(CombatCue::Bomb);
    }
}

fn check_defeat(state: Res<PlayerState>, score: Res<Score>, mut next: ResMut<NextState<GameState>>) {
    if state.is_dead() {
        info!("player down, final score {}", score.0);
        next.set(GameState::Defeat);
    }
}

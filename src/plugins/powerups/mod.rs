//! Power-ups: one persistent item per kind, shown by periodic rolls, caught on overlap.
//!
//! Each kind owns a periodic `PowerupRoll` task. A successful roll (only once the run is
//! older than `WARMUP_MS`) moves the item to a random spot and shows it, then schedules a
//! one-shot `PowerupHide`. A hidden item keeps its entity but collides with nothing.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::{Layer, ghost_layers, powerup_layers};
use crate::common::rng::GameRng;
use crate::common::screen::ScreenBounds;
use crate::common::sets::{ResolveSet, SimSet};
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::clock::{Task, TaskHandle, TickScheduler};
use crate::plugins::fx::CombatCue;
use crate::plugins::player::{Player, PlayerState};

const WARMUP_MS: u64 = 5000;
const VISIBLE_MS: u64 = 2000;
const MARGIN: f32 = 10.0;
const HALF_EXTENTS: Vec2 = Vec2::splat(4.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerupKind {
    Weapon,
    Bomb,
    Life,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::Weapon, PowerupKind::Bomb, PowerupKind::Life];

    pub fn roll_every_ms(self) -> u64 {
        match self {
            PowerupKind::Weapon => 3000,
            PowerupKind::Bomb | PowerupKind::Life => 10_000,
        }
    }

    /// Percent chance that a roll shows the item.
    pub fn chance(self) -> u32 {
        match self {
            PowerupKind::Weapon | PowerupKind::Bomb => 50,
            PowerupKind::Life => 40,
        }
    }

    fn color(self) -> Color {
        match self {
            PowerupKind::Weapon => Color::srgb(0.95, 0.85, 0.2),
            PowerupKind::Bomb => Color::srgb(0.9, 0.35, 0.25),
            PowerupKind::Life => Color::srgb(0.3, 0.85, 0.45),
        }
    }

    /// Apply the reward to the player.
    pub fn apply(self, state: &mut PlayerState) {
        match self {
            PowerupKind::Weapon => state.upgrade_weapon(),
            PowerupKind::Bomb => state.add_bomb(),
            PowerupKind::Life => state.add_life(),
        }
    }
}

#[derive(Component, Debug)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub visible: bool,
    /// Pending `PowerupHide` task while shown.
    hide_task: Option<TaskHandle>,
}

/// Roll tasks of the current session.
#[derive(Resource, Default, Debug)]
struct RollTasks(Vec<TaskHandle>);

pub fn plugin(app: &mut App) {
    app.insert_resource(RollTasks::default());

    app.add_systems(OnEnter(GameState::InGame), spawn_powerups);

    app.add_systems(
        FixedUpdate,
        (roll_powerups, hide_expired_powerups)
            .chain()
            .in_set(SimSet::Behaviour)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        catch_powerups
            .in_set(ResolveSet::Combat)
            .after(crate::plugins::combat::resolve_enemy_bullet_hits)
            .run_if(in_state(GameState::InGame)),
    );
}

fn spawn_powerups(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut scheduler: ResMut<TickScheduler>,
    mut rolls: ResMut<RollTasks>,
) {
    for old in rolls.0.drain(..) {
        scheduler.cancel(old);
    }

    for kind in PowerupKind::ALL {
        let size = HALF_EXTENTS * 2.0;
        commands.spawn((
            Name::new(format!("{kind:?} power-up")),
            Powerup { kind, visible: false, hide_task: None },
            Sprite {
                color: kind.color(),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 10.0),
            Visibility::Hidden,
            RigidBody::Dynamic,
            Sensor,
            Collider::rectangle(size.x, size.y),
            ghost_layers(Layer::Powerup),
            CollisionEventsEnabled,
            DespawnOnExit(GameState::InGame),
        ));

        let every = tunables.ticks(kind.roll_every_ms());
        rolls.0.push(scheduler.every(every, Task::PowerupRoll(kind)));
    }
}

fn set_shown(powerup: &mut Powerup, vis: &mut Visibility, layers: &mut CollisionLayers, shown: bool) {
    powerup.visible = shown;
    *vis = if shown { Visibility::Visible } else { Visibility::Hidden };
    *layers = if shown { powerup_layers() } else { ghost_layers(Layer::Powerup) };
}

pub fn roll_powerups(
    tunables: Res<Tunables>,
    screen: Res<ScreenBounds>,
    mut rng: ResMut<GameRng>,
    mut scheduler: ResMut<TickScheduler>,
    mut q: Query<(&mut Powerup, &mut Transform, &mut Visibility, &mut CollisionLayers)>,
) {
    let fired = scheduler.take_fired(|t| matches!(t, Task::PowerupRoll(_)));
    if fired.is_empty() {
        return;
    }
    let warmed_up = scheduler.tick() > tunables.ticks(WARMUP_MS);

    for (_, task) in fired {
        let Task::PowerupRoll(kind) = task else { continue };
        if !warmed_up || !rng.percent_chance(kind.chance()) {
            continue;
        }

        let spot = Vec2::new(
            rng.range(MARGIN, screen.width - MARGIN),
            rng.range(MARGIN, screen.height - MARGIN),
        );

        for (mut powerup, mut tf, mut vis, mut layers) in &mut q {
            if powerup.kind != kind {
                continue;
            }
            tf.translation = screen.to_world(spot).extend(tf.translation.z);
            set_shown(&mut powerup, &mut vis, &mut layers, true);

            if let Some(old) = powerup.hide_task.take() {
                scheduler.cancel(old);
            }
            powerup.hide_task = Some(scheduler.after(tunables.ticks(VISIBLE_MS), Task::PowerupHide(kind)));
            debug!("{kind:?} power-up shown at {spot:?}");
        }
    }
}

pub fn hide_expired_powerups(
    mut scheduler: ResMut<TickScheduler>,
    mut q: Query<(&mut Powerup, &mut Visibility, &mut CollisionLayers)>,
) {
    for (_, task) in scheduler.take_fired(|t| matches!(t, Task::PowerupHide(_))) {
        let Task::PowerupHide(kind) = task else { continue };
        for (mut powerup, mut vis, mut layers) in &mut q {
            if powerup.kind == kind {
                powerup.hide_task = None;
                set_shown(&mut powerup, &mut vis, &mut layers, false);
            }
        }
    }
}

pub fn catch_powerups(
    mut started: MessageReader<CollisionStart>,
    mut state: ResMut<PlayerState>,
    mut scheduler: ResMut<TickScheduler>,
    mut cues: MessageWriter<CombatCue>,
    q_player: Query<(), With<Player>>,
    mut q: Query<(&mut Powerup, &mut Visibility, &mut CollisionLayers)>,
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let (item, other) = if q.contains(ev.collider1) {
            (ev.collider1, ev.collider2)
        } else if q.contains(ev.collider2) {
            (ev.collider2, ev.collider1)
        } else {
            continue;
        };

        if !q_player.contains(other) || !seen.insert(item) {
            continue;
        }
        let Ok((mut powerup, mut vis, mut layers)) = q.get_mut(item) else {
            continue;
        };
        if !powerup.visible {
            continue;
        }

        powerup.kind.apply(&mut state);
        if let Some(task) = powerup.hide_task.take() {
            scheduler.cancel(task);
        }
        set_shown(&mut powerup, &mut vis, &mut layers, false);
        cues.write(CombatCue::PowerupCaught(powerup.kind));
        debug!("{:?} power-up caught", powerup.kind);
    }
}

//! Cosmetic reactions: destruction bursts, damaged tint, combat cue log.
//!
//! Nothing here feeds back into simulation state.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::sets::ResolveSet;
use crate::common::state::GameState;
use crate::plugins::enemies::{ActorDestroyed, EnemyKind, Smoking};
use crate::plugins::powerups::PowerupKind;

const BURST_SECS: f32 = 0.4;
const SMOKE_TINT: f32 = 0.55;

/// Something worth a sound or a flash.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatCue {
    Destroyed { kind: EnemyKind, score: u32 },
    /// A weapon level absorbed a hit on the player.
    ShieldHit,
    LifeLost,
    PowerupCaught(PowerupKind),
    Bomb,
}

#[derive(Component, Debug)]
pub struct Burst {
    timer: Timer,
}

/// Marker for sprites already tinted by `tint_smoking`.
#[derive(Component, Debug)]
struct Tinted;

pub fn plugin(app: &mut App) {
    app.add_message::<CombatCue>();

    app.add_systems(
        FixedPostUpdate,
        (spawn_bursts, fade_bursts, tint_smoking, log_cues)
            .in_set(ResolveSet::Present)
            .run_if(in_state(GameState::InGame)),
    );
}

fn spawn_bursts(mut commands: Commands, mut destroyed: MessageReader<ActorDestroyed>) {
    for ev in destroyed.read() {
        let half = ev.kind.profile().half_extents;
        commands.spawn((
            Name::new("Burst"),
            Burst {
                timer: Timer::from_seconds(BURST_SECS, TimerMode::Once),
            },
            Sprite {
                color: Color::srgba(1.0, 0.8, 0.3, 1.0),
                custom_size: Some(half * 2.0),
                ..default()
            },
            Transform::from_translation(ev.pos.extend(10.0)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// Grow and fade; despawn once the timer runs out.
fn fade_bursts(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut q: Query<(Entity, &mut Burst, &mut Sprite, &mut Transform)>,
) {
    for (e, mut burst, mut sprite, mut tf) in &mut q {
        burst.timer.tick(time.delta());
        if burst.timer.is_finished() {
            commands.entity(e).try_despawn();
            continue;
        }

        let t = burst.timer.fraction();
        sprite.color.set_alpha(1.0 - t);
        tf.scale = Vec3::splat(1.0 + t);
    }
}

fn tint_smoking(mut commands: Commands, mut q: Query<(Entity, &mut Sprite), (With<Smoking>, Without<Tinted>)>) {
    for (e, mut sprite) in &mut q {
        let c = sprite.color.to_srgba();
        sprite.color = Color::srgba(c.red * SMOKE_TINT, c.green * SMOKE_TINT, c.blue * SMOKE_TINT, c.alpha);
        commands.entity(e).try_insert(Tinted);
    }
}

fn log_cues(mut cues: MessageReader<CombatCue>) {
    for cue in cues.read() {
        debug!("cue: {cue:?}");
    }
}

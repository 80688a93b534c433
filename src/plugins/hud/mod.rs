//! HUD (render-only): score, life, bombs, weapon level, and the end-of-run banner.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::player::{PlayerState, Score};

#[derive(Component)]
struct HudText;

#[derive(Component)]
struct Banner;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(
            Update,
            refresh_hud.run_if(in_state(GameState::InGame)),
        )
        .add_systems(OnEnter(GameState::Victory), |commands: Commands| {
            spawn_banner(commands, "MISSION COMPLETE")
        })
        .add_systems(OnEnter(GameState::Defeat), |commands: Commands| {
            spawn_banner(commands, "GAME OVER")
        });
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("Hud"),
        HudText,
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(8.0),
            top: Val::Px(6.0),
            ..default()
        },
        DespawnOnExit(GameState::InGame),
    ));
}

fn refresh_hud(state: Res<PlayerState>, score: Res<Score>, mut q: Query<&mut Text, With<HudText>>) {
    if !state.is_changed() && !score.is_changed() {
        return;
    }
    let Ok(mut text) = q.single_mut() else {
        return;
    };
    text.0 = format!(
        "SCORE {:>6}   LIFE {:>2}   BOMBS {}   WEAPON {}",
        score.0, state.life, state.bombs, state.weapon_level
    );
}

fn spawn_banner(mut commands: Commands, label: &str) {
    commands.spawn((
        Name::new("Banner"),
        Banner,
        Text::new(label),
        TextFont {
            font_size: 40.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(25.0),
            top: Val::Percent(45.0),
            ..default()
        },
    ));
}

// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Top-level plugin composition and the per-frame set ordering.

use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::components::{Ball, CurrentBall};
use crate::core::system_order::{GameLogicSet, PostPhysicsAdjustSet, PrePhysicsSet};
use crate::gameplay::intents::IntentsPlugin;
use crate::gameplay::spawner::SpawnerPlugin;
use crate::physics::arena::ArenaPlugin;
use crate::physics::response::ResponsePlugin;
use crate::physics::setup::PhysicsSetupPlugin;
use crate::physics::stabilize::StabilizePlugin;
use crate::rendering::circles::CirclesRenderPlugin;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .configure_sets(
                Update,
                (
                    PostPhysicsAdjustSet,
                    GameLogicSet.after(PostPhysicsAdjustSet),
                    PrePhysicsSet.after(GameLogicSet),
                ),
            )
            .add_plugins((
                PhysicsSetupPlugin,
                ArenaPlugin,
                ResponsePlugin,
                StabilizePlugin,
                IntentsPlugin,
                SpawnerPlugin,
                CirclesRenderPlugin,
            ))
            .add_systems(OnEnter(AppState::MainMenu), show_menu_instructions)
            .add_systems(
                Update,
                (
                    enter_game_on_key.run_if(in_state(AppState::MainMenu)),
                    leave_game_on_key.run_if(in_state(AppState::InGame)),
                    log_simulation_summary.run_if(in_state(AppState::InGame)),
                ),
            );
    }
}

fn show_menu_instructions() {
    info!("Drop Stack: Enter/Space to play; A/D move, Space drops, Escape leaves");
}

fn enter_game_on_key(keys: Res<ButtonInput<KeyCode>>, mut next: ResMut<NextState<AppState>>) {
    if keys.just_pressed(KeyCode::Enter) || keys.just_pressed(KeyCode::Space) {
        next.set(AppState::InGame);
    }
}

fn leave_game_on_key(keys: Res<ButtonInput<KeyCode>>, mut next: ResMut<NextState<AppState>>) {
    if keys.just_pressed(KeyCode::Escape) {
        next.set(AppState::MainMenu);
    }
}

/// Low-rate state summary; meant to stay readable in a terminal, not to be a
/// metrics surface.
fn log_simulation_summary(
    time: Res<Time>,
    mut accum: Local<f32>,
    q_balls: Query<(), With<Ball>>,
    q_held: Query<(), With<CurrentBall>>,
) {
    *accum += time.delta_secs();
    if *accum < 2.0 {
        return;
    }
    *accum = 0.0;
    info!(
        "balls={} held={}",
        q_balls.iter().count(),
        q_held.iter().count()
    );
}

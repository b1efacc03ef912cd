// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Discrete player intents. The spawner consumes only these events; the
//! keyboard sampler here is the one place hardware is polled, so tests and
//! alternative frontends can drive the game by writing events directly.

use bevy::prelude::*;

use crate::core::system_order::GameLogicSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDir {
    Left,
    Right,
}

impl MoveDir {
    pub fn sign(self) -> f32 {
        match self {
            MoveDir::Left => -1.0,
            MoveDir::Right => 1.0,
        }
    }
}

/// Continuous: emitted every frame the key is held.
#[derive(Event, Debug, Clone, Copy)]
pub struct MoveIntent(pub MoveDir);

/// Edge-triggered: one event per key press.
#[derive(Event, Debug, Default, Clone, Copy)]
pub struct DropIntent;

pub struct IntentsPlugin;

impl Plugin for IntentsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MoveIntent>()
            .add_event::<DropIntent>()
            .add_systems(Update, sample_keyboard.in_set(GameLogicSet));
    }
}

pub fn sample_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    mut moves: EventWriter<MoveIntent>,
    mut drops: EventWriter<DropIntent>,
) {
    if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
        moves.write(MoveIntent(MoveDir::Left));
    }
    if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
        moves.write(MoveIntent(MoveDir::Right));
    }
    if keys.just_pressed(KeyCode::Space) || keys.just_pressed(KeyCode::ArrowDown) {
        drops.write(DropIntent);
    }
}

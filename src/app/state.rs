// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

/// High-level app lifecycle state. The chamber, balls and all simulation
/// side tables exist only inside `InGame`; leaving the state tears them down.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    MainMenu,
    InGame,
}

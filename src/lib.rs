// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod app;
pub mod core;
pub mod gameplay;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use crate::app::game::GamePlugin;
pub use crate::app::state::AppState;
pub use crate::core::components::{
    Ball, BallRadius, BallSize, BallVisual, CurrentBall, VerticalDrop,
};
pub use crate::core::config::GameConfig;

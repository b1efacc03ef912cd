// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Minimal draw layer: gizmo circles for balls, gizmo rects for the chamber.
//! Strictly read-only over physics state; the core never depends on this.

use bevy::prelude::*;

use crate::core::components::{ArenaPart, BallRadius, BallVisual, CurrentBall};
use crate::core::config::GameConfig;

pub struct CirclesRenderPlugin;

impl Plugin for CirclesRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, (draw_balls, draw_arena));
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn draw_balls(
    cfg: Res<GameConfig>,
    mut gizmos: Gizmos,
    q: Query<(&Transform, &BallRadius, &BallVisual, Option<&CurrentBall>)>,
) {
    if !cfg.draw_circles {
        return;
    }
    for (tf, radius, visual, held) in &q {
        let pos = tf.translation.truncate();
        gizmos.circle_2d(pos, radius.0, visual.color);
        // Inner ring marks the held ball.
        if held.is_some() {
            gizmos.circle_2d(pos, radius.0 * 0.6, Color::WHITE);
        }
    }
}

fn draw_arena(cfg: Res<GameConfig>, mut gizmos: Gizmos, q: Query<&Transform, With<ArenaPart>>) {
    if !cfg.draw_circles || q.is_empty() {
        return;
    }
    let pf = &cfg.playfield;
    let color = Color::srgb(0.35, 0.35, 0.42);
    let t = pf.wall_thickness;
    gizmos.rect_2d(
        Vec2::new(0.0, -pf.half_height() + t * 0.5),
        Vec2::new(pf.width, t),
        color,
    );
    gizmos.rect_2d(
        Vec2::new(-pf.half_width() + t * 0.5, 0.0),
        Vec2::new(t, pf.height),
        color,
    );
    gizmos.rect_2d(
        Vec2::new(pf.half_width() - t * 0.5, 0.0),
        Vec2::new(t, pf.height),
        color,
    );
}

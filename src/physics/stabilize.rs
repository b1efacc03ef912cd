// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stabilization and sleep management.
//!
//! Runs every frame on last step's resolved state, after the response shaper:
//! * rest clamp: sub-threshold linear/angular velocity is zeroed outright,
//!   judged independently, so near-rest oscillation cannot accumulate,
//! * forced sleep: sustained stillness puts a body to sleep and clears its
//!   force accumulator,
//! * wake propagation: a sleeping ball wakes when a moving ball gets within
//!   combined radii plus a margin, so a settled pile reacts to new arrivals,
//! * boundary penetration correction: a circle that ended up inside a wall is
//!   clamped back to the surface and pays a velocity penalty, removing the
//!   energy that caused the penetration.
//!
//! Stillness bookkeeping lives in an explicit side table keyed by entity, not
//! in fields bolted onto the body components.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashMap;

use crate::app::state::AppState;
use crate::core::components::{Ball, BallRadius, CurrentBall};
use crate::core::config::GameConfig;
use crate::core::system_order::PostPhysicsAdjustSet;
use crate::physics::response::ResponseSet;

/// Continuous seconds each ball has spent below both rest thresholds.
#[derive(Resource, Default)]
pub struct StillnessTable(pub HashMap<Entity, f32>);

pub struct StabilizePlugin;

impl Plugin for StabilizePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StillnessTable>()
            .add_systems(
                Update,
                (
                    rest_clamp,
                    track_stillness_and_sleep,
                    propagate_wakes,
                    correct_boundary_penetration,
                )
                    .chain()
                    .in_set(PostPhysicsAdjustSet)
                    .after(ResponseSet),
            )
            .add_systems(OnExit(AppState::InGame), reset_stillness);
    }
}

/// Zero velocities that are below the rest thresholds. Linear and angular
/// rest are judged independently; a slowly spinning ball still gets its
/// drift clamped and vice versa.
pub fn rest_clamp(
    cfg: Res<GameConfig>,
    mut q: Query<&mut Velocity, (With<Ball>, Without<CurrentBall>)>,
) {
    let lin_rest_sq = cfg.stabilizer.linear_rest * cfg.stabilizer.linear_rest;
    for mut vel in &mut q {
        if vel.linvel.length_squared() < lin_rest_sq && vel.linvel != Vec2::ZERO {
            vel.linvel = Vec2::ZERO;
        }
        if vel.angvel.abs() < cfg.stabilizer.angular_rest && vel.angvel != 0.0 {
            vel.angvel = 0.0;
        }
    }
}

/// Accumulate per-ball stillness time; force sleep after the configured
/// duration and clear the force accumulator so nothing re-wakes the body.
pub fn track_stillness_and_sleep(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    mut table: ResMut<StillnessTable>,
    mut q: Query<
        (Entity, &Velocity, &mut Sleeping, &mut ExternalForce),
        (With<Ball>, Without<CurrentBall>),
    >,
) {
    let dt = time.delta_secs();
    let lin_rest_sq = cfg.stabilizer.linear_rest * cfg.stabilizer.linear_rest;

    for (entity, vel, mut sleeping, mut force) in &mut q {
        let still = vel.linvel.length_squared() < lin_rest_sq
            && vel.angvel.abs() < cfg.stabilizer.angular_rest;
        let timer = table.0.entry(entity).or_insert(0.0);
        if still {
            *timer += dt;
            if *timer >= cfg.stabilizer.sleep_after && !sleeping.sleeping {
                sleeping.sleeping = true;
                force.force = Vec2::ZERO;
                force.torque = 0.0;
                debug!("ball {entity} put to sleep after {:.2}s still", *timer);
            }
        } else {
            *timer = 0.0;
        }
    }

    // Drop entries for balls that no longer exist.
    table.0.retain(|e, _| q.contains(*e));
}

/// A sleeping pile must react to a new ball landing on it: wake any sleeper
/// that a sufficiently fast non-sleeping ball is about to touch. Naive O(n^2)
/// pair scan; body counts stay in the tens.
pub fn propagate_wakes(
    cfg: Res<GameConfig>,
    mut table: ResMut<StillnessTable>,
    mut q: Query<(Entity, &Transform, &Velocity, &BallRadius, &mut Sleeping), With<Ball>>,
) {
    let movers: Vec<(Vec2, f32)> = q
        .iter()
        .filter(|(_, _, vel, _, sleeping)| {
            !sleeping.sleeping && vel.linvel.length() > cfg.stabilizer.wake_speed
        })
        .map(|(_, tf, _, radius, _)| (tf.translation.truncate(), radius.0))
        .collect();
    if movers.is_empty() {
        return;
    }

    for (entity, tf, _, radius, mut sleeping) in &mut q {
        if !sleeping.sleeping {
            continue;
        }
        let pos = tf.translation.truncate();
        let near = movers.iter().any(|(mover_pos, mover_radius)| {
            let reach = radius.0 + mover_radius + cfg.stabilizer.wake_margin;
            pos.distance_squared(*mover_pos) < reach * reach
        });
        if near {
            sleeping.sleeping = false;
            table.0.insert(entity, 0.0);
        }
    }
}

/// Clamp circles back inside the chamber and damp the velocity that carried
/// them into the boundary. The top stays open.
pub fn correct_boundary_penetration(
    cfg: Res<GameConfig>,
    mut q: Query<(&mut Transform, &mut Velocity, &BallRadius), (With<Ball>, Without<CurrentBall>)>,
) {
    let pf = &cfg.playfield;
    let slop = cfg.stabilizer.penetration_slop;
    for (mut tf, mut vel, radius) in &mut q {
        let (min_x, max_x) = pf.inner_x_range(radius.0);
        let min_y = pf.floor_y(radius.0);
        let x = tf.translation.x;
        let y = tf.translation.y;
        // Only act past the slop band; the solver's own resting penetration
        // must never trigger the velocity penalty.
        if x < min_x - slop || x > max_x + slop || y < min_y - slop {
            tf.translation.x = x.clamp(min_x, max_x);
            tf.translation.y = y.max(min_y);
            vel.linvel *= cfg.stabilizer.penetration_damping;
        }
    }
}

fn reset_stillness(mut table: ResMut<StillnessTable>) {
    table.0.clear();
}

// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Collision response shaping.
//!
//! The solver alone is not good enough for this game: its iterative contact
//! resolution injects small lateral velocity and spin into what should be a
//! perfectly straight drop, and heavy-on-light impacts launch the light ball
//! at implausible speed. This layer watches contact events and corrects the
//! resolved state after the fact:
//!
//! * ball-ball contact ends a ball's vertical-drop mode,
//! * a boundary hit with near-zero pre-collision horizontal speed is treated
//!   as vertical and has lateral velocity (and unjustified spin) cancelled,
//! * the spin/velocity re-check runs one frame deferred, after the solver has
//!   fully resolved the contact,
//! * any ball above the speed cap is scaled down each frame.
//!
//! Pre-collision velocities come from a snapshot taken right before the step;
//! contact events are classified against the snapshot, not the resolved state.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashMap;

use crate::app::state::AppState;
use crate::core::components::{Ball, CurrentBall, Ground, LeftWall, RightWall, VerticalDrop};
use crate::core::config::{GameConfig, ShaperConfig};
use crate::core::system_order::{PostPhysicsAdjustSet, PrePhysicsSet};

/// Velocities snapshotted immediately before the last physics step.
#[derive(Resource, Default)]
pub struct PreStepVelocities(pub HashMap<Entity, Velocity>);

/// A vertical boundary hit awaiting its post-resolution re-check.
#[derive(Debug, Clone, Copy)]
pub struct PendingCleanup {
    pub entity: Entity,
    /// |vx| before the collision; decides whether spin cancellation applies.
    pub pre_horizontal_speed: f32,
}

/// Queue drained one frame after the contact, once the solver is done with it.
#[derive(Resource, Default)]
pub struct PendingCleanups(pub Vec<PendingCleanup>);

/// Label so the stabilizer can order itself after the shaper.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct ResponseSet;

pub struct ResponsePlugin;

impl Plugin for ResponsePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PreStepVelocities>()
            .init_resource::<PendingCleanups>()
            .add_systems(
                Update,
                (
                    drain_pending_cleanups,
                    handle_contact_starts,
                    dampen_overspeed,
                    pin_vertical_drops,
                )
                    .chain()
                    .in_set(PostPhysicsAdjustSet)
                    .in_set(ResponseSet),
            )
            .add_systems(Update, record_prestep_velocities.in_set(PrePhysicsSet))
            .add_systems(OnExit(AppState::InGame), reset_shaper_state);
    }
}

/// Vertical-hit classification: the lateral component is below both an
/// absolute floor and a fraction of the vertical speed.
pub fn is_vertical_hit(pre_step: Vec2, shaper: &ShaperConfig) -> bool {
    pre_step.x.abs()
        < shaper
            .min_horizontal_speed
            .max(shaper.horizontal_ratio * pre_step.y.abs())
}

/// Snapshot every ball's velocity just before Rapier steps in `PostUpdate`.
pub fn record_prestep_velocities(
    mut table: ResMut<PreStepVelocities>,
    q: Query<(Entity, &Velocity), With<Ball>>,
) {
    table.0.clear();
    for (e, vel) in &q {
        table.0.insert(e, *vel);
    }
}

/// Reacts to contact-start events emitted by the last physics step.
pub fn handle_contact_starts(
    mut collisions: EventReader<CollisionEvent>,
    mut commands: Commands,
    cfg: Res<GameConfig>,
    prestep: Res<PreStepVelocities>,
    mut pending: ResMut<PendingCleanups>,
    mut q_balls: Query<&mut Velocity, With<Ball>>,
    q_boundary: Query<(), Or<(With<Ground>, With<LeftWall>, With<RightWall>)>>,
    q_held: Query<(), With<CurrentBall>>,
) {
    for ev in collisions.read() {
        let CollisionEvent::Started(e1, e2, _flags) = ev else {
            continue;
        };
        // The held ball is outside the simulation; its contacts are not real
        // collisions.
        if q_held.contains(*e1) || q_held.contains(*e2) {
            continue;
        }
        let a_ball = q_balls.contains(*e1);
        let b_ball = q_balls.contains(*e2);

        if a_ball && b_ball {
            // Touching another ball ends pure vertical descent for both.
            commands.entity(*e1).remove::<VerticalDrop>();
            commands.entity(*e2).remove::<VerticalDrop>();
            continue;
        }

        // Ball against floor or wall, in either event order.
        let ball = if a_ball && q_boundary.contains(*e2) {
            *e1
        } else if b_ball && q_boundary.contains(*e1) {
            *e2
        } else {
            continue;
        };

        // A participant despawned mid-flight is skipped silently.
        let Some(pre) = prestep.0.get(&ball) else {
            continue;
        };
        if !is_vertical_hit(pre.linvel, &cfg.shaper) {
            continue;
        }

        // Kill the lateral slop now, and re-check once the solver has fully
        // settled this contact (next frame).
        if let Ok(mut vel) = q_balls.get_mut(ball) {
            vel.linvel.x = 0.0;
        }
        pending.0.push(PendingCleanup {
            entity: ball,
            pre_horizontal_speed: pre.linvel.x.abs(),
        });
    }
}

/// The deferred half of vertical-hit shaping: one frame after contact start,
/// the solver's final answer is in, so residual lateral velocity and
/// physically unjustified spin can be cancelled.
pub fn drain_pending_cleanups(
    mut pending: ResMut<PendingCleanups>,
    cfg: Res<GameConfig>,
    mut q: Query<&mut Velocity, With<Ball>>,
) {
    for cleanup in std::mem::take(&mut pending.0) {
        // Liveness check: the ball may have been garbage-collected since.
        let Ok(mut vel) = q.get_mut(cleanup.entity) else {
            continue;
        };
        if vel.linvel.x.abs() > cfg.shaper.cleanup_epsilon {
            vel.linvel.x = 0.0;
        }
        if vel.angvel.abs() > cfg.shaper.spin_epsilon
            && cleanup.pre_horizontal_speed < cfg.shaper.spin_bias_speed
        {
            vel.angvel = 0.0;
        }
    }
}

/// Mass-imbalance guard: a light ball struck by a heavy one must not be
/// launched at unbounded speed. Scale, not hard-clamp, so the correction is
/// spread over a few frames and reads as drag rather than a wall.
pub fn dampen_overspeed(cfg: Res<GameConfig>, mut q: Query<&mut Velocity, With<Ball>>) {
    for mut vel in &mut q {
        if vel.linvel.length() > cfg.shaper.max_speed {
            vel.linvel *= cfg.shaper.overspeed_damping;
        }
    }
}

/// While a ball is in vertical-drop mode its x coordinate is re-pinned every
/// frame, so accumulated solver slop can never show up as sideways drift.
pub fn pin_vertical_drops(
    mut q: Query<(&mut Transform, &mut Velocity, &VerticalDrop), With<Ball>>,
) {
    for (mut tf, mut vel, drop) in &mut q {
        tf.translation.x = drop.x;
        vel.linvel.x = 0.0;
    }
}

fn reset_shaper_state(
    mut prestep: ResMut<PreStepVelocities>,
    mut pending: ResMut<PendingCleanups>,
) {
    prestep.0.clear();
    pending.0.clear();
}

// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rapier installation and world-level integrator parameters.
//!
//! World units are pixels; the solver runs in meters behind
//! `pixels_per_meter`, so unit conversion never leaks into game code.
//! Stepping is fixed-dt with sub-steps: render-rate variation is absorbed by
//! the timestep mode instead of feeding a raw frame delta into the solver.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;

pub const PIXELS_PER_METER: f32 = 50.0;

/// One physics step per rendered frame, split into sub-steps for contact
/// quality with fast polydisperse circles.
pub const PHYSICS_DT: f32 = 1.0 / 60.0;
pub const PHYSICS_SUBSTEPS: usize = 2;

pub struct PhysicsSetupPlugin;

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(
            PIXELS_PER_METER,
        ))
        .insert_resource(TimestepMode::Fixed {
            dt: PHYSICS_DT,
            substeps: PHYSICS_SUBSTEPS,
        })
        .add_systems(Update, configure_gravity);
    }
}

/// Writes the configured gravity into the Rapier context once it exists.
/// The context entity is spawned by the Rapier plugin, so this polls until
/// the query matches instead of assuming Startup ordering.
fn configure_gravity(
    mut applied: Local<bool>,
    cfg: Res<GameConfig>,
    mut rapier_config: Query<&mut RapierConfiguration>,
) {
    if *applied && !cfg.is_changed() {
        return;
    }
    if let Ok(mut rc) = rapier_config.single_mut() {
        rc.gravity = Vect::new(0.0, cfg.gravity.y);
        *applied = true;
    }
}

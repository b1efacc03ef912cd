// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Runtime configuration: the whole tuning surface of the simulation.
//!
//! Every threshold the response shaper and stabilizer act on lives here as a
//! named value with a hand-tuned default, because these constants are the
//! primary thing that gets iterated on. A RON file can override any subset;
//! missing fields fall back to the defaults via `#[serde(default)]`.
//!
//! All speeds are px/s, angular velocities rad/s, positions px in world
//! coordinates (playfield center at the origin, y up).

use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            title: "Drop Stack".into(),
        }
    }
}

/// The chamber: an open-topped box of two side walls and a floor.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
    /// Distance of the spawn rail below the top edge.
    pub spawn_offset: f32,
    pub boundary_friction: f32,
    pub boundary_restitution: f32,
}
impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            wall_thickness: 16.0,
            spawn_offset: 50.0,
            boundary_friction: 0.4,
            boundary_restitution: 0.25,
        }
    }
}

impl PlayfieldConfig {
    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }
    /// Inner x range a circle of `radius` may occupy without touching a wall.
    pub fn inner_x_range(&self, radius: f32) -> (f32, f32) {
        let limit = self.half_width() - self.wall_thickness - radius;
        (-limit, limit)
    }
    /// Lowest legal center y for a circle of `radius` (resting on the floor).
    pub fn floor_y(&self, radius: f32) -> f32 {
        -self.half_height() + self.wall_thickness + radius
    }
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(0.0, self.half_height() - self.spawn_offset)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GravityConfig {
    pub y: f32,
}
impl Default for GravityConfig {
    fn default() -> Self {
        Self { y: -900.0 }
    }
}

/// Ball material and the size ladder (five sizes, radius grows linearly,
/// mass follows collider area at a single fixed density).
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BallsConfig {
    pub base_radius: f32,
    pub size_step: f32,
    pub density: f32,
    pub restitution: f32,
    pub friction: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}
impl Default for BallsConfig {
    fn default() -> Self {
        Self {
            base_radius: 25.0,
            size_step: 5.0,
            density: 1.0,
            restitution: 0.2,
            friction: 0.3,
            linear_damping: 0.05,
            angular_damping: 0.8,
        }
    }
}

/// Collision response shaping thresholds.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ShaperConfig {
    /// A boundary hit counts as vertical when pre-collision |vx| is below
    /// `max(min_horizontal_speed, horizontal_ratio * |vy|)`.
    pub min_horizontal_speed: f32,
    pub horizontal_ratio: f32,
    /// Residual |vx| above this after the solver resolved a vertical hit is
    /// zeroed by the deferred cleanup.
    pub cleanup_epsilon: f32,
    /// Residual |angvel| above this is solver slop worth cancelling.
    pub spin_epsilon: f32,
    /// Spin cancellation only applies when pre-collision |vx| was below this.
    pub spin_bias_speed: f32,
    /// Speeds above this get scaled down once per frame (mass-imbalance guard).
    pub max_speed: f32,
    pub overspeed_damping: f32,
}
impl Default for ShaperConfig {
    fn default() -> Self {
        Self {
            min_horizontal_speed: 60.0,
            horizontal_ratio: 0.1,
            cleanup_epsilon: 0.06,
            spin_epsilon: 0.05,
            spin_bias_speed: 48.0,
            max_speed: 960.0,
            overspeed_damping: 0.9,
        }
    }
}

/// Rest detection, forced sleep and boundary penetration recovery.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Linear speed below which velocity is zeroed outright.
    pub linear_rest: f32,
    /// Angular speed below which spin is zeroed outright (judged independently).
    pub angular_rest: f32,
    /// Continuous seconds below both rest thresholds before a forced sleep.
    pub sleep_after: f32,
    /// Extra gap beyond combined radii inside which a moving ball wakes a sleeper.
    pub wake_margin: f32,
    /// Minimum speed of the approaching ball for wake propagation.
    pub wake_speed: f32,
    /// Velocity multiplier applied when a penetrated position gets clamped back.
    pub penetration_damping: f32,
    /// Penetration depth tolerated before correction kicks in; covers the
    /// solver's own allowed contact slop so resting contact is never punished.
    pub penetration_slop: f32,
}
impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            linear_rest: 6.0,
            angular_rest: 0.05,
            sleep_after: 2.0,
            wake_margin: 4.0,
            wake_speed: 30.0,
            penetration_damping: 0.65,
            penetration_slop: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Horizontal distance per move intent while a ball is held.
    pub move_step: f32,
    /// Seconds between a drop and the next spawn.
    pub cooldown: f32,
    /// How far outside the playfield a ball may stray before the grace timer runs.
    pub offscreen_margin: f32,
    /// Continuous off-screen seconds before a ball is garbage-collected.
    pub offscreen_grace: f32,
}
impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            move_step: 5.0,
            cooldown: 0.75,
            offscreen_margin: 50.0,
            offscreen_grace: 3.0,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub playfield: PlayfieldConfig,
    pub gravity: GravityConfig,
    pub balls: BallsConfig,
    pub shaper: ShaperConfig,
    pub stabilizer: StabilizerConfig,
    pub spawner: SpawnerConfig,
    pub draw_circles: bool,
    pub rapier_debug: bool,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            playfield: Default::default(),
            gravity: Default::default(),
            balls: Default::default(),
            shaper: Default::default(),
            stabilizer: Default::default(),
            spawner: Default::default(),
            draw_circles: true,
            rapier_debug: false,
        }
    }
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Sanity-check relationships between values; returns human-readable
    /// warnings (logged at startup), never hard errors.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.playfield.width <= 0.0 || self.playfield.height <= 0.0 {
            w.push("playfield dimensions must be > 0".into());
        }
        if self.playfield.wall_thickness <= 0.0 {
            w.push("playfield.wall_thickness must be > 0".into());
        }
        if self.playfield.wall_thickness * 2.0 >= self.playfield.width {
            w.push(format!(
                "playfield.wall_thickness {} leaves no interior in width {}",
                self.playfield.wall_thickness, self.playfield.width
            ));
        }
        if self.playfield.spawn_offset <= 0.0 {
            w.push("playfield.spawn_offset must be > 0".into());
        }
        if !(0.0..=1.0).contains(&self.playfield.boundary_restitution) {
            w.push("playfield.boundary_restitution outside [0,1]".into());
        }
        if self.gravity.y.abs() < 1.0 {
            w.push("gravity.y magnitude near zero; balls will not fall".into());
        }
        if self.balls.base_radius <= 0.0 {
            w.push("balls.base_radius must be > 0".into());
        }
        if self.balls.size_step < 0.0 {
            w.push("balls.size_step negative; larger sizes would shrink".into());
        }
        if self.balls.density <= 0.0 {
            w.push("balls.density must be > 0".into());
        }
        if !(0.0..=1.0).contains(&self.balls.restitution) {
            w.push("balls.restitution outside [0,1]".into());
        }
        let max_radius =
            self.balls.base_radius + 4.0 * self.balls.size_step + self.playfield.wall_thickness;
        if max_radius * 2.0 >= self.playfield.width {
            w.push("largest ball does not fit between the walls".into());
        }
        if self.shaper.min_horizontal_speed <= 0.0 {
            w.push("shaper.min_horizontal_speed must be > 0".into());
        }
        if !(0.0..=1.0).contains(&self.shaper.horizontal_ratio) {
            w.push("shaper.horizontal_ratio outside [0,1]".into());
        }
        if self.shaper.cleanup_epsilon < 0.0 {
            w.push("shaper.cleanup_epsilon negative".into());
        }
        if self.shaper.max_speed <= 0.0 {
            w.push("shaper.max_speed must be > 0".into());
        }
        if !(0.0..1.0).contains(&self.shaper.overspeed_damping) {
            w.push("shaper.overspeed_damping outside (0,1)".into());
        }
        if self.stabilizer.linear_rest <= 0.0 || self.stabilizer.angular_rest <= 0.0 {
            w.push("stabilizer rest thresholds must be > 0".into());
        }
        if self.stabilizer.sleep_after <= 0.0 {
            w.push("stabilizer.sleep_after must be > 0".into());
        }
        if self.stabilizer.wake_speed <= self.stabilizer.linear_rest {
            w.push("stabilizer.wake_speed at or below linear_rest; piles would never settle".into());
        }
        if !(0.0..=1.0).contains(&self.stabilizer.penetration_damping) {
            w.push("stabilizer.penetration_damping outside [0,1]".into());
        }
        if self.spawner.move_step <= 0.0 {
            w.push("spawner.move_step must be > 0".into());
        }
        if self.spawner.cooldown < 0.0 {
            w.push("spawner.cooldown negative".into());
        }
        if self.spawner.offscreen_grace < 0.0 {
            w.push("spawner.offscreen_grace negative".into());
        }
        w
    }
}

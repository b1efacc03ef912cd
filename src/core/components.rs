// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Game-level body labels and per-ball state carried alongside the Rapier
//! components. The entity itself is the 1:1 ball/body link: physics
//! components and game components live on the same id.

use bevy::prelude::*;
use rand::Rng;

use crate::core::config::BallsConfig;

/// Marker for every circle participating in the stack.
#[derive(Component)]
pub struct Ball;

/// Size category 1..=5; drives radius, mass (via collider area) and color.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallSize(pub u8);

impl BallSize {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(size: u8) -> Self {
        debug_assert!((Self::MIN..=Self::MAX).contains(&size));
        Self(size.clamp(Self::MIN, Self::MAX))
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }

    pub fn radius(self, balls: &BallsConfig) -> f32 {
        balls.base_radius + f32::from(self.0 - 1) * balls.size_step
    }

    pub fn color(self) -> Color {
        match self.0 {
            1 => Color::srgb(0.91, 0.30, 0.24),
            2 => Color::srgb(0.95, 0.61, 0.07),
            3 => Color::srgb(0.18, 0.80, 0.44),
            4 => Color::srgb(0.20, 0.60, 0.86),
            _ => Color::srgb(0.61, 0.35, 0.71),
        }
    }
}

/// Cached collider radius, so consumers never re-derive it from the size.
#[derive(Component, Debug, Deref, DerefMut, Copy, Clone)]
pub struct BallRadius(pub f32);

/// Render metadata read by the draw layer; physics never touches it.
#[derive(Component, Debug, Clone, Copy)]
pub struct BallVisual {
    pub color: Color,
}

/// The one ball currently held kinematic on the spawn rail.
#[derive(Component)]
pub struct CurrentBall;

/// Released with zero horizontal velocity and not yet touched by another
/// ball; x stays pinned to the drop coordinate while this is present.
#[derive(Component, Debug, Clone, Copy)]
pub struct VerticalDrop {
    pub x: f32,
}

/// Common marker for the three static boundary bodies (teardown handle).
#[derive(Component)]
pub struct ArenaPart;

#[derive(Component)]
pub struct Ground;

#[derive(Component)]
pub struct LeftWall;

#[derive(Component)]
pub struct RightWall;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_ladder_matches_size_step() {
        let balls = BallsConfig::default();
        assert_eq!(BallSize::new(1).radius(&balls), 25.0);
        assert_eq!(BallSize::new(3).radius(&balls), 35.0);
        assert_eq!(BallSize::new(5).radius(&balls), 45.0);
    }

    #[test]
    fn random_size_stays_in_category_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let s = BallSize::random(&mut rng);
            assert!((BallSize::MIN..=BallSize::MAX).contains(&s.0));
        }
    }

    #[test]
    fn each_size_has_a_distinct_color() {
        let colors: Vec<_> = (1..=5).map(|s| BallSize::new(s).color()).collect();
        for i in 0..colors.len() {
            for j in i + 1..colors.len() {
                assert_ne!(colors[i], colors[j]);
            }
        }
    }
}

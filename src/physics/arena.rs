// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The chamber boundary: three static cuboids (floor, left wall, right wall)
//! forming an open-topped box. Built on entering gameplay, fully torn down on
//! exit; no physics state survives a scene change.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::app::state::AppState;
use crate::core::components::{ArenaPart, Ball, Ground, LeftWall, RightWall};
use crate::core::config::GameConfig;

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::InGame), spawn_arena)
            .add_systems(OnExit(AppState::InGame), teardown);
    }
}

/// Spawns the three boundary bodies sized from the playfield config.
/// The cuboids extend past the chamber corners so circles cannot squeeze
/// through the seam where floor and wall meet.
pub fn spawn_arena(mut commands: Commands, cfg: Res<GameConfig>) {
    let pf = &cfg.playfield;
    let half_w = pf.half_width();
    let half_h = pf.half_height();
    let half_t = pf.wall_thickness * 0.5;

    let material = (
        Friction::coefficient(pf.boundary_friction),
        Restitution::coefficient(pf.boundary_restitution),
    );

    commands.spawn((
        ArenaPart,
        Ground,
        RigidBody::Fixed,
        Collider::cuboid(half_w, half_t),
        material,
        ActiveEvents::COLLISION_EVENTS,
        Transform::from_xyz(0.0, -half_h + half_t, 0.0),
        GlobalTransform::default(),
        Name::new("Floor"),
    ));
    commands.spawn((
        ArenaPart,
        LeftWall,
        RigidBody::Fixed,
        Collider::cuboid(half_t, half_h),
        material,
        ActiveEvents::COLLISION_EVENTS,
        Transform::from_xyz(-half_w + half_t, 0.0, 0.0),
        GlobalTransform::default(),
        Name::new("LeftWall"),
    ));
    commands.spawn((
        ArenaPart,
        RightWall,
        RigidBody::Fixed,
        Collider::cuboid(half_t, half_h),
        material,
        ActiveEvents::COLLISION_EVENTS,
        Transform::from_xyz(half_w - half_t, 0.0, 0.0),
        GlobalTransform::default(),
        Name::new("RightWall"),
    ));

    info!(
        "arena ready: {}x{} chamber, wall thickness {}",
        pf.width, pf.height, pf.wall_thickness
    );
}

fn teardown(
    mut commands: Commands,
    q_arena: Query<Entity, With<ArenaPart>>,
    q_balls: Query<Entity, With<Ball>>,
) {
    let removed = q_arena.iter().count() + q_balls.iter().count();
    for e in q_arena.iter().chain(q_balls.iter()) {
        commands.entity(e).despawn();
    }
    info!("arena torn down, {removed} bodies removed");
}

// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Spawn/drop state machine.
//!
//! At most one "current" ball exists at a time: held kinematic on the spawn
//! rail, nudged left/right by move intents, then released into the dynamic
//! simulation with a completely clean velocity state. A cooldown gates the
//! next spawn, and balls that leave the playfield for longer than a grace
//! period are garbage-collected.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;
use std::collections::HashMap;

use crate::app::state::AppState;
use crate::core::components::{
    Ball, BallRadius, BallSize, BallVisual, CurrentBall, Ground, VerticalDrop,
};
use crate::core::config::GameConfig;
use crate::core::system_order::GameLogicSet;
use crate::gameplay::intents::{sample_keyboard, DropIntent, MoveIntent};

/// Spawn/drop state. `next_size` is drawn one spawn ahead so a UI can show
/// the upcoming ball.
#[derive(Resource)]
pub struct Spawner {
    pub current: Option<Entity>,
    pub cooldown: Timer,
    pub next_size: BallSize,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            current: None,
            // Zero-length: the first spawn is available immediately.
            cooldown: Timer::from_seconds(0.0, TimerMode::Once),
            next_size: BallSize::new(3),
        }
    }
}

/// Continuous off-playfield seconds per ball (side table, pruned on despawn).
#[derive(Resource, Default)]
pub struct OffscreenTable(pub HashMap<Entity, f32>);

pub struct SpawnerPlugin;

impl Plugin for SpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Spawner>()
            .init_resource::<OffscreenTable>()
            .add_systems(
                Update,
                (auto_spawn, apply_move_intents, apply_drop_intents, collect_offscreen)
                    .chain()
                    .in_set(GameLogicSet)
                    .after(sample_keyboard),
            )
            .add_systems(OnExit(AppState::InGame), reset_spawner);
    }
}

/// Creates the ball bundle shared by held and released balls.
/// Mass comes from collider area at the configured density; sleep thresholds
/// are disabled because the stabilizer owns sleep decisions.
pub fn spawn_ball(
    commands: &mut Commands,
    cfg: &GameConfig,
    size: BallSize,
    position: Vec2,
    held: bool,
) -> Entity {
    let radius = size.radius(&cfg.balls);
    let body = if held {
        RigidBody::KinematicPositionBased
    } else {
        RigidBody::Dynamic
    };
    let mut entity = commands.spawn((
        Ball,
        size,
        BallRadius(radius),
        BallVisual {
            color: size.color(),
        },
        body,
        Collider::ball(radius),
        ColliderMassProperties::Density(cfg.balls.density),
        Restitution::coefficient(cfg.balls.restitution),
        Friction::coefficient(cfg.balls.friction),
        Velocity::zero(),
        Damping {
            linear_damping: cfg.balls.linear_damping,
            angular_damping: cfg.balls.angular_damping,
        },
        Transform::from_xyz(position.x, position.y, 0.0),
        GlobalTransform::default(),
    ));
    entity.insert((
        ExternalForce::default(),
        ActiveEvents::COLLISION_EVENTS,
        Sleeping::disabled(),
        Name::new(format!("Ball(size {})", size.0)),
    ));
    if held {
        entity.insert(CurrentBall);
    }
    entity.id()
}

/// Spawns the next held ball once no current ball exists, the cooldown has
/// elapsed, and an arena is present (no arena means no active game scene).
pub fn auto_spawn(
    mut commands: Commands,
    time: Res<Time>,
    cfg: Res<GameConfig>,
    mut spawner: ResMut<Spawner>,
    q_arena: Query<(), With<Ground>>,
) {
    spawner.cooldown.tick(time.delta());
    if q_arena.is_empty() || spawner.current.is_some() || !spawner.cooldown.finished() {
        return;
    }

    let size = spawner.next_size;
    spawner.next_size = BallSize::random(&mut rand::thread_rng());
    let entity = spawn_ball(
        &mut commands,
        &cfg,
        size,
        cfg.playfield.spawn_point(),
        true,
    );
    spawner.current = Some(entity);
    info!("spawned held ball {entity} (size {}), next size {}", size.0, spawner.next_size.0);
}

/// Translate the held ball horizontally, clamped so the circle stays fully
/// between the side walls.
pub fn apply_move_intents(
    mut moves: EventReader<MoveIntent>,
    cfg: Res<GameConfig>,
    mut q: Query<(&mut Transform, &BallRadius), With<CurrentBall>>,
) {
    let Ok((mut tf, radius)) = q.single_mut() else {
        moves.clear();
        return;
    };
    let (min_x, max_x) = cfg.playfield.inner_x_range(radius.0);
    for intent in moves.read() {
        let x = tf.translation.x + intent.0.sign() * cfg.spawner.move_step;
        tf.translation.x = x.clamp(min_x, max_x);
    }
}

/// Release the held ball: dynamic body, exactly zero velocity and spin, x
/// pinned by vertical-drop mode until the first ball-ball contact, cooldown
/// restarted.
pub fn apply_drop_intents(
    mut drops: EventReader<DropIntent>,
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut spawner: ResMut<Spawner>,
    mut q: Query<(&Transform, &mut Velocity), With<CurrentBall>>,
) {
    if drops.is_empty() {
        return;
    }
    drops.clear();

    let Some(current) = spawner.current else {
        return;
    };
    let Ok((tf, mut vel)) = q.get_mut(current) else {
        return;
    };

    *vel = Velocity::zero();
    commands
        .entity(current)
        .remove::<CurrentBall>()
        .insert(RigidBody::Dynamic)
        .insert(VerticalDrop {
            x: tf.translation.x,
        });
    spawner.current = None;
    spawner.cooldown = Timer::from_seconds(cfg.spawner.cooldown, TimerMode::Once);
    info!("dropped ball {current} at x={:.1}", tf.translation.x);
}

/// Garbage-collect balls that stay outside the playfield (plus margin) for
/// longer than the grace period; re-entering resets the timer.
pub fn collect_offscreen(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    mut commands: Commands,
    mut table: ResMut<OffscreenTable>,
    q: Query<(Entity, &Transform), (With<Ball>, Without<CurrentBall>)>,
) {
    let dt = time.delta_secs();
    let pf = &cfg.playfield;
    let margin = cfg.spawner.offscreen_margin;
    let limit_x = pf.half_width() + margin;
    let limit_y = pf.half_height() + margin;

    let mut live: Vec<Entity> = Vec::new();
    for (entity, tf) in &q {
        live.push(entity);
        let pos = tf.translation;
        let outside = pos.x.abs() > limit_x || pos.y.abs() > limit_y;
        if !outside {
            table.0.remove(&entity);
            continue;
        }
        let timer = table.0.entry(entity).or_insert(0.0);
        *timer += dt;
        if *timer >= cfg.spawner.offscreen_grace {
            commands.entity(entity).despawn();
            table.0.remove(&entity);
            info!("collected off-screen ball {entity}");
        }
    }
    table.0.retain(|e, _| live.contains(e));
}

fn reset_spawner(mut spawner: ResMut<Spawner>, mut table: ResMut<OffscreenTable>) {
    *spawner = Spawner::default();
    table.0.clear();
}

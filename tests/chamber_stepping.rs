// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end stepping through the real physics pipeline. The timestep mode
//! is fixed-dt, so each `app.update()` advances the simulation by exactly one
//! step no matter how fast the test loop runs.

use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy_rapier2d::prelude::*;

use drop_stack::app::state::AppState;
use drop_stack::core::components::{ArenaPart, Ball, BallSize, CurrentBall, VerticalDrop};
use drop_stack::core::config::GameConfig;
use drop_stack::core::system_order::{GameLogicSet, PostPhysicsAdjustSet, PrePhysicsSet};
use drop_stack::gameplay::intents::{DropIntent, IntentsPlugin};
use drop_stack::gameplay::spawner::{Spawner, SpawnerPlugin};
use drop_stack::physics::arena::ArenaPlugin;
use drop_stack::physics::response::ResponsePlugin;
use drop_stack::physics::setup::PhysicsSetupPlugin;
use drop_stack::physics::stabilize::StabilizePlugin;

fn physics_app(mut cfg: GameConfig) -> App {
    // Wall-clock cooldowns are useless in a tight test loop; respawns are
    // triggered explicitly via force_respawn instead.
    cfg.spawner.cooldown = 1000.0;

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin, InputPlugin, StatesPlugin))
        .insert_resource(cfg)
        .init_state::<AppState>()
        .configure_sets(
            Update,
            (
                PostPhysicsAdjustSet,
                GameLogicSet.after(PostPhysicsAdjustSet),
                PrePhysicsSet.after(GameLogicSet),
            ),
        )
        .add_plugins((
            PhysicsSetupPlugin,
            ArenaPlugin,
            ResponsePlugin,
            StabilizePlugin,
            IntentsPlugin,
            SpawnerPlugin,
        ));
    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::InGame);
    // First update applies the state transition, builds the arena, and spawns
    // the first held ball.
    app.update();
    app
}

fn step(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn held_ball(app: &mut App) -> Option<Entity> {
    app.world_mut()
        .query_filtered::<Entity, With<CurrentBall>>()
        .iter(app.world())
        .next()
}

fn ball_count(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<(), With<Ball>>()
        .iter(app.world())
        .count()
}

fn force_respawn(app: &mut App, size: BallSize) {
    let mut spawner = app.world_mut().resource_mut::<Spawner>();
    spawner.next_size = size;
    spawner.cooldown = Timer::from_seconds(0.0, TimerMode::Once);
}

#[test]
fn dropped_ball_falls_straight_and_settles_on_the_floor() {
    let mut app = physics_app(GameConfig::default());
    let ball = held_ball(&mut app).expect("held ball after first frame");

    app.world_mut().send_event(DropIntent);
    // 5 simulated seconds: fall (~1.2 s), bounce, settle.
    step(&mut app, 300);

    let tf = *app.world().get::<Transform>(ball).unwrap();
    // Vertical-drop pinning held the ball on its release line the whole way.
    assert_eq!(tf.translation.x, 0.0);
    // Size 3 (radius 35) rests on the floor at y = -333, give the solver a
    // little resting slop.
    assert!(
        (tf.translation.y - -333.0).abs() < 3.0,
        "resting height was {}",
        tf.translation.y
    );
    let vel = app.world().get::<Velocity>(ball).unwrap();
    assert!(vel.linvel.length() < 1.0, "settled, not oscillating");

    // Stable over a further second of stepping.
    step(&mut app, 60);
    let later = app.world().get::<Transform>(ball).unwrap();
    assert!(later.translation.distance(tf.translation) < 1.0);
}

#[test]
fn landing_on_another_ball_ends_vertical_drop_mode() {
    let mut app = physics_app(GameConfig::default());
    let first = held_ball(&mut app).unwrap();
    app.world_mut().send_event(DropIntent);
    step(&mut app, 300);

    force_respawn(&mut app, BallSize::new(3));
    app.update();
    let second = held_ball(&mut app).expect("second held ball");
    assert_ne!(first, second);

    app.world_mut().send_event(DropIntent);
    app.update();
    assert!(app.world().get::<VerticalDrop>(second).is_some());

    // Step until the ball-ball contact clears vertical-drop mode.
    let mut cleared_at = None;
    for frame in 0..300 {
        app.update();
        if app.world().get::<VerticalDrop>(second).is_none() {
            cleared_at = Some(frame);
            break;
        }
    }
    assert!(
        cleared_at.is_some(),
        "ball-ball contact never cleared vertical-drop mode"
    );
    // The contact ends the mode for both participants.
    assert!(app.world().get::<VerticalDrop>(second).is_none());
    assert!(app.world().get::<VerticalDrop>(first).is_none());

    // Both balls end up inside the chamber.
    step(&mut app, 300);
    for e in [first, second] {
        let tf = app.world().get::<Transform>(e).unwrap();
        assert!(tf.translation.x.abs() < 461.1, "x = {}", tf.translation.x);
        assert!(tf.translation.y > -334.0, "y = {}", tf.translation.y);
    }
}

#[test]
fn heavy_ball_on_light_ball_stays_below_the_speed_ceiling() {
    let mut app = physics_app(GameConfig::default());
    force_respawn(&mut app, BallSize::new(1));
    // Replace the default held ball with a size-1 ball.
    if let Some(held) = held_ball(&mut app) {
        app.world_mut().entity_mut(held).despawn();
        app.world_mut().resource_mut::<Spawner>().current = None;
    }
    app.update();
    app.world_mut().send_event(DropIntent);
    step(&mut app, 300);

    force_respawn(&mut app, BallSize::new(5));
    app.update();
    app.world_mut().send_event(DropIntent);

    // A size-5 ball carries ~25x the mass of a size-1 ball; without the
    // overspeed damper the light ball would be ejected.
    let max_speed = GameConfig::default().shaper.max_speed;
    let mut peak = 0.0_f32;
    for _ in 0..400 {
        app.update();
        let mut q = app.world_mut().query_filtered::<&Velocity, With<Ball>>();
        for vel in q.iter(app.world()) {
            peak = peak.max(vel.linvel.length());
        }
    }
    // The damper scales by 0.9 per frame rather than hard-clamping, so a
    // single post-impact frame may overshoot; it must stay bounded and come
    // back down quickly.
    assert!(
        peak < max_speed * 2.0,
        "peak ball speed {peak} escaped the damper"
    );
    let mut q = app.world_mut().query_filtered::<&Velocity, With<Ball>>();
    for vel in q.iter(app.world()) {
        assert!(
            vel.linvel.length() < max_speed,
            "speeds have decayed below the ceiling by the end of the run"
        );
    }

    // Nothing left the chamber.
    let mut q = app
        .world_mut()
        .query_filtered::<&Transform, With<Ball>>();
    for tf in q.iter(app.world()) {
        assert!(tf.translation.x.abs() < 472.0);
        assert!(tf.translation.y > -344.0);
    }
}

#[test]
fn leaving_the_game_tears_everything_down() {
    let mut app = physics_app(GameConfig::default());
    app.world_mut().send_event(DropIntent);
    step(&mut app, 10);
    assert!(ball_count(&mut app) >= 1);

    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::MainMenu);
    app.update();

    assert_eq!(ball_count(&mut app), 0);
    let arena = app
        .world_mut()
        .query_filtered::<(), With<ArenaPart>>()
        .iter(app.world())
        .count();
    assert_eq!(arena, 0);
    let spawner = app.world().resource::<Spawner>();
    assert!(spawner.current.is_none());

    // Re-entering rebuilds a fresh scene.
    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::InGame);
    app.update();
    assert!(held_ball(&mut app).is_some());
    let arena = app
        .world_mut()
        .query_filtered::<(), With<ArenaPart>>()
        .iter(app.world())
        .count();
    assert_eq!(arena, 3);
}

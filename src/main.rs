// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Context;
use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;

use drop_stack::{GameConfig, GamePlugin};

#[derive(Parser, Debug)]
#[command(about = "Falling-ball stacking sandbox")]
struct Args {
    /// Config file path; when given, parse failures are fatal instead of
    /// falling back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => GameConfig::load_from_file(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            let (cfg, err) = GameConfig::load_or_default("assets/config/game.ron");
            if let Some(err) = err {
                eprintln!("config fallback to defaults: {err}");
            }
            cfg
        }
    };

    let mut app = App::new();
    app.insert_resource(cfg.clone()).add_plugins(
        DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }),
    );

    for warning in cfg.validate() {
        warn!("config: {warning}");
    }

    app.add_plugins(GamePlugin);
    if cfg.rapier_debug {
        app.add_plugins(bevy_rapier2d::render::RapierDebugRenderPlugin::default());
    }
    app.run();
    Ok(())
}

// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Central system ordering labels to make the per-frame sequence explicit.
//!
//! Rapier steps the simulation in `PostUpdate`, so within `Update` the order
//! is relative to the *previous* step's writeback:
//! 1. PostPhysicsAdjustSet: deferred contact cleanup, contact event handling,
//!    stabilization, overspeed damping (acting on last step's resolved state)
//! 2. GameLogicSet: intent sampling, spawn/drop state machine, GC
//! 3. PrePhysicsSet: pre-step velocity snapshot, right before the next step
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PostPhysicsAdjustSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct GameLogicSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PrePhysicsSet;

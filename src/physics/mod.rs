// This file is part of Drop Stack.
// Copyright (C) 2026 Drop Stack contributors
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod arena;
pub mod response;
pub mod setup;
pub mod stabilize;

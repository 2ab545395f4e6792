// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text Behind Image
//!
//! Overlay movable, resizable, rotatable text on a photo split into a
//! background plane and a cut-out subject, so text can sit behind the
//! subject. The engine (geometry, interaction, coordinate mapping,
//! compositing, export) is independent of the egui front end in `app`/`ui`.

pub mod app;
pub mod config;
pub mod engine;
pub mod io;
pub mod models;
pub mod render;
pub mod ui;
pub mod util;

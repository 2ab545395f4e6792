// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the Text Behind Image editor.

pub mod canvas;
pub mod layers;
pub mod properties;
pub mod toolbar;

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Layer transform and interaction engine: input mapping, the pointer
//! state machine and image-plane loading.

pub mod coords;
pub mod interaction;
pub mod loader;

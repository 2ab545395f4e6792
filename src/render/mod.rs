// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Software rendering of the composite: raster primitives, text, the
//! two-pass compositor and full-resolution export.

pub mod compositor;
pub mod export;
pub mod raster;
pub mod text;

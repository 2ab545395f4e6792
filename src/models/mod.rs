// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: text layers, the layer store and the image planes.

pub mod images;
pub mod layer;
pub mod project;

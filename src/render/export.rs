// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Full-resolution export.
//!
//! The live canvas may be drawn below the photo's resolution. Export redraws
//! the composite at the original size, scaling every layer's geometry and
//! font size by `original / canvas`. The live layers are never touched and
//! no selection overlay is drawn.

use crate::config::Theme;
use crate::engine::coords::CanvasFrame;
use crate::models::images::{ImagePair, ImageStatus};
use crate::models::layer::TextLayer;
use crate::render::compositor::{Compositor, Scene};
use crate::render::text::TextPainter;
use image::RgbaImage;

/// Render `layers` over `pair` at the pair's original resolution.
pub fn render_full_resolution(
    pair: &ImagePair,
    frame: &CanvasFrame,
    layers: &[TextLayer],
    theme: Theme,
    painter: &mut dyn TextPainter,
) -> RgbaImage {
    let scale = frame.export_scale();
    let scaled: Vec<TextLayer> = layers.iter().map(|layer| layer.scaled(scale)).collect();

    let mut compositor = Compositor::new(pair.original_dimensions(), theme);
    compositor.set_images(Some(pair));

    let status = ImageStatus::Ready;
    let scene = Scene {
        layers: &scaled,
        selected: None,
        status: &status,
        overlay: None,
    };
    log::info!(
        "Exporting {}x{} composite with {} layers (scale {:.3})",
        frame.original_width,
        frame.original_height,
        layers.len(),
        scale
    );
    compositor.render(&scene, painter)
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas sizing and input coordinate mapping.
//!
//! The canvas keeps a logical (backing) resolution that is decoupled from
//! the size it is displayed at. `CanvasFrame` picks the logical size from
//! the original photo and a per-device cap; `CoordinateMapper` converts
//! pointer positions in display space into logical canvas units.

use crate::models::layer::Point;

/// Logical canvas size tied to the original photo by one scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFrame {
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
    /// `width / original_width`; at most 1.
    pub display_scale: f64,
}

impl CanvasFrame {
    /// Fit the original dimensions under `max_dimension`, keeping aspect ratio.
    ///
    /// Images already under the cap keep their size.
    pub fn fit(original_width: u32, original_height: u32, max_dimension: u32) -> Self {
        let original_width = original_width.max(1);
        let original_height = original_height.max(1);
        let longest = original_width.max(original_height);

        if longest <= max_dimension || max_dimension == 0 {
            return Self::unscaled(original_width, original_height);
        }

        let scale = max_dimension as f64 / longest as f64;
        let width = ((original_width as f64 * scale).round() as u32).clamp(1, max_dimension);
        let height = ((original_height as f64 * scale).round() as u32).clamp(1, max_dimension);
        Self {
            width,
            height,
            original_width,
            original_height,
            display_scale: width as f64 / original_width as f64,
        }
    }

    /// A frame drawn at the original resolution.
    pub fn unscaled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            original_width: width,
            original_height: height,
            display_scale: 1.0,
        }
    }

    /// Factor applied to layer geometry when exporting at original size.
    pub fn export_scale(&self) -> f64 {
        self.original_width as f64 / self.width as f64
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Where the canvas sits on screen, and at what size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    /// Top-left of the displayed canvas in client coordinates.
    pub origin: Point,
    /// Displayed size in client units.
    pub display_width: f64,
    pub display_height: f64,
    /// Backing resolution in logical canvas units.
    pub logical_width: f64,
    pub logical_height: f64,
}

impl CoordinateMapper {
    pub fn new(origin: Point, display_size: (f64, f64), logical_size: (u32, u32)) -> Self {
        Self {
            origin,
            display_width: display_size.0,
            display_height: display_size.1,
            logical_width: logical_size.0 as f64,
            logical_height: logical_size.1 as f64,
        }
    }

    /// Map a client position to logical canvas units, clamped to the canvas.
    pub fn to_logical(&self, client: Point) -> Point {
        let axis = |c: f64, origin: f64, display: f64, logical: f64| {
            if display <= 0.0 {
                return 0.0;
            }
            ((c - origin) * (logical / display)).clamp(0.0, logical)
        };
        Point::new(
            axis(client.x, self.origin.x, self.display_width, self.logical_width),
            axis(client.y, self.origin.y, self.display_height, self.logical_height),
        )
    }

    /// Client units per logical unit along x. The interaction engine divides
    /// its on-screen handle reach by this.
    pub fn client_per_logical(&self) -> f64 {
        if self.logical_width > 0.0 && self.display_width > 0.0 {
            self.display_width / self.logical_width
        } else {
            1.0
        }
    }
}

/// Size a canvas of `logical` aspect to fit inside `available`, centered.
///
/// Returns the display origin offset and size.
pub fn fit_display(logical: (u32, u32), available: (f64, f64)) -> (Point, (f64, f64)) {
    let (lw, lh) = (logical.0.max(1) as f64, logical.1.max(1) as f64);
    let aspect = lw / lh;
    let available_aspect = available.0 / available.1.max(f64::EPSILON);

    let (width, height) = if aspect > available_aspect {
        // Canvas is wider - fit to width
        (available.0, available.0 / aspect)
    } else {
        // Canvas is taller - fit to height
        (available.1 * aspect, available.1)
    };

    let offset = Point::new((available.0 - width) / 2.0, (available.1 - height) / 2.0);
    (offset, (width, height))
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster primitives over `RgbaImage`.

use crate::models::layer::Point;
use crate::util::geometry::{local_to_world, world_to_local};
use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};

/// Fill the whole surface.
pub fn fill(canvas: &mut RgbaImage, color: [u8; 4]) {
    for pixel in canvas.pixels_mut() {
        *pixel = Rgba(color);
    }
}

/// Fill an axis-aligned rectangle, clipped to the surface.
pub fn fill_rect(canvas: &mut RgbaImage, x: i64, y: i64, width: i64, height: i64, color: [u8; 4]) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + width).min(canvas.width() as i64);
    let y1 = (y + height).min(canvas.height() as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px as u32, py as u32, Rgba(color));
        }
    }
}

/// Scale a plane to exactly `width × height`.
pub fn scale_plane(plane: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if plane.dimensions() == (width, height) {
        return plane.clone();
    }
    imageops::resize(plane, width, height, FilterType::Triangle)
}

/// Alpha-composite a plane at the origin. The plane must already be canvas-sized.
pub fn draw_plane(canvas: &mut RgbaImage, plane: &RgbaImage) {
    imageops::overlay(canvas, plane, 0, 0);
}

/// Paint a region given in a rotated local frame.
///
/// `local_min`/`local_max` bound the region in the frame centered on
/// `center` and rotated by `rotation` degrees; `coverage` returns 0..1 for a
/// local point. Each canvas pixel is sampled at its center.
pub fn paint_rotated<F>(
    canvas: &mut RgbaImage,
    center: Point,
    rotation: f64,
    local_min: Point,
    local_max: Point,
    color: [u8; 4],
    coverage: F,
) where
    F: Fn(Point) -> f32,
{
    if color[3] == 0 || local_min.x >= local_max.x || local_min.y >= local_max.y {
        return;
    }

    let corners = [
        Point::new(local_min.x, local_min.y),
        Point::new(local_max.x, local_min.y),
        Point::new(local_min.x, local_max.y),
        Point::new(local_max.x, local_max.y),
    ];
    let mut min = Point::new(f64::MAX, f64::MAX);
    let mut max = Point::new(f64::MIN, f64::MIN);
    for corner in corners {
        let p = local_to_world(corner, center, rotation);
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    let x0 = min.x.floor().max(0.0) as i64;
    let y0 = min.y.floor().max(0.0) as i64;
    let x1 = (max.x.ceil() as i64).min(canvas.width() as i64);
    let y1 = (max.y.ceil() as i64).min(canvas.height() as i64);

    for py in y0..y1 {
        for px in x0..x1 {
            let world = Point::new(px as f64 + 0.5, py as f64 + 0.5);
            let local = world_to_local(world, center, rotation);
            if local.x < local_min.x || local.x >= local_max.x || local.y < local_min.y || local.y >= local_max.y {
                continue;
            }
            let c = coverage(local).clamp(0.0, 1.0);
            if c <= 0.0 {
                continue;
            }
            let alpha = (color[3] as f32 * c).round() as u8;
            if alpha == 0 {
                continue;
            }
            canvas
                .get_pixel_mut(px as u32, py as u32)
                .blend(&Rgba([color[0], color[1], color[2], alpha]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut canvas = RgbaImage::new(4, 4);
        fill_rect(&mut canvas, -2, 2, 4, 10, [9, 9, 9, 255]);
        assert_eq!(canvas.get_pixel(0, 3), &Rgba([9, 9, 9, 255]));
        assert_eq!(canvas.get_pixel(1, 2), &Rgba([9, 9, 9, 255]));
        assert_eq!(canvas.get_pixel(2, 2), &Rgba([0, 0, 0, 0]));
        assert_eq!(canvas.get_pixel(0, 1), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_paint_rotated_quarter_turn() {
        let mut canvas = RgbaImage::new(20, 20);
        fill(&mut canvas, [255, 255, 255, 255]);
        // A 10x2 bar turned upright around (10, 10).
        paint_rotated(
            &mut canvas,
            Point::new(10.0, 10.0),
            90.0,
            Point::new(-5.0, -1.0),
            Point::new(5.0, 1.0),
            [0, 0, 0, 255],
            |_| 1.0,
        );
        assert_eq!(canvas.get_pixel(10, 6), &Rgba([0, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(9, 13), &Rgba([0, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(14, 10), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_paint_rotated_blends_alpha() {
        let mut canvas = RgbaImage::new(2, 2);
        fill(&mut canvas, [0, 0, 0, 255]);
        paint_rotated(
            &mut canvas,
            Point::new(1.0, 1.0),
            0.0,
            Point::new(-1.0, -1.0),
            Point::new(1.0, 1.0),
            [255, 255, 255, 255],
            |_| 0.5,
        );
        let value = canvas.get_pixel(0, 0)[0];
        assert!((120..=135).contains(&value), "got {}", value);
        // Over an opaque base the result stays (near) opaque.
        assert!(canvas.get_pixel(0, 0)[3] >= 254);
    }

    #[test]
    fn test_draw_plane_respects_alpha() {
        let mut canvas = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 0, 255]));
        let mut plane = RgbaImage::new(2, 1);
        plane.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        draw_plane(&mut canvas, &plane);
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(1, 0), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_scale_plane() {
        let plane = RgbaImage::from_pixel(8, 4, Rgba([1, 2, 3, 255]));
        let scaled = scale_plane(&plane, 4, 2);
        assert_eq!(scaled.dimensions(), (4, 2));
        assert_eq!(scaled.get_pixel(3, 1), &Rgba([1, 2, 3, 255]));
    }
}

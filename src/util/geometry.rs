// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Rotation transforms, handle positions, rotated hit-testing and the
//! anchor-preserving resize solve. Everything here is pure math over the
//! layer's center, unrotated half-extents and rotation; angles are degrees,
//! clockwise-positive in the y-down canvas frame.

use crate::models::layer::{normalize_degrees, Point, TextLayer};

/// Stand-off of the rotate handle above the top edge.
pub const ROTATE_HANDLE_OFFSET: f64 = 20.0;

/// Smallest width or height a resize may produce.
pub const MIN_LAYER_SIZE: f64 = 10.0;

/// Points closer than this to the box edge count as outside it.
const EDGE_EPSILON: f64 = 1e-9;

/// One of the five control points of a selected layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Rotate,
}

impl Handle {
    /// Hit-test priority: corners before rotate.
    pub const ALL: [Handle; 5] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
        Handle::Rotate,
    ];

    pub const CORNERS: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    /// The corner held fixed while this one is dragged.
    pub fn opposite(self) -> Handle {
        match self {
            Handle::TopLeft => Handle::BottomRight,
            Handle::TopRight => Handle::BottomLeft,
            Handle::BottomLeft => Handle::TopRight,
            Handle::BottomRight => Handle::TopLeft,
            Handle::Rotate => Handle::Rotate,
        }
    }

    pub fn is_corner(self) -> bool {
        self != Handle::Rotate
    }

    /// Offset from the layer center in the unrotated local frame.
    pub fn local_offset(self, half_width: f64, half_height: f64) -> Point {
        match self {
            Handle::TopLeft => Point::new(-half_width, -half_height),
            Handle::TopRight => Point::new(half_width, -half_height),
            Handle::BottomLeft => Point::new(-half_width, half_height),
            Handle::BottomRight => Point::new(half_width, half_height),
            Handle::Rotate => Point::new(0.0, -half_height - ROTATE_HANDLE_OFFSET),
        }
    }
}

/// Rotate a vector by `degrees` (clockwise on a y-down screen).
pub fn rotate_vector(v: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Map a local-frame offset to world space for a given center and rotation.
pub fn local_to_world(local: Point, center: Point, degrees: f64) -> Point {
    let r = rotate_vector(local, degrees);
    Point::new(center.x + r.x, center.y + r.y)
}

/// Map a world point into the local frame of a rotated box.
pub fn world_to_local(world: Point, center: Point, degrees: f64) -> Point {
    rotate_vector(Point::new(world.x - center.x, world.y - center.y), -degrees)
}

/// World-space position of a handle.
pub fn handle_coordinates(handle: Handle, layer: &TextLayer) -> Point {
    let (hw, hh) = layer.half_extents();
    local_to_world(handle.local_offset(hw, hh), layer.center(), layer.rotation)
}

/// First handle, in priority order, within `handle_radius / 2` of `point`.
pub fn hit_test_handle(point: Point, layer: &TextLayer, handle_radius: f64) -> Option<Handle> {
    let reach = handle_radius / 2.0;
    Handle::ALL
        .into_iter()
        .find(|&h| handle_coordinates(h, layer).distance(point) <= reach)
}

/// Rotated bounding-box test, optionally inflated by `tolerance` on every side.
///
/// The edge itself is outside, so corner handles never hit the body.
pub fn point_in_layer(point: Point, layer: &TextLayer, tolerance: f64) -> bool {
    let local = world_to_local(point, layer.center(), layer.rotation);
    let (hw, hh) = layer.half_extents();
    local.x.abs() < hw + tolerance - EDGE_EPSILON && local.y.abs() < hh + tolerance - EDGE_EPSILON
}

/// New box produced by a corner drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeResult {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Solve a corner resize that keeps `anchor` (the opposite corner) fixed.
///
/// The anchor-to-grab vector is expressed along the layer's local axes; its
/// magnitudes become the new size, clamped to [`MIN_LAYER_SIZE`]. The center
/// sits half a box away from the anchor along those axes, which is the
/// anchor/grab midpoint whenever no clamp applies. `x`/`y` are the unrotated
/// top-left of the new box, so its center is `(x + w/2, y + h/2)`.
pub fn resize_from_handle(
    handle: Handle,
    anchor: Point,
    grab: Point,
    rotation: f64,
) -> ResizeResult {
    let local = rotate_vector(Point::new(grab.x - anchor.x, grab.y - anchor.y), -rotation);
    let width = local.x.abs().max(MIN_LAYER_SIZE);
    let height = local.y.abs().max(MIN_LAYER_SIZE);

    // Direction from anchor towards the dragged corner, per local axis.
    let fallback = handle.local_offset(1.0, 1.0);
    let sign = |component: f64, fallback: f64| {
        if component != 0.0 {
            component.signum()
        } else if fallback != 0.0 {
            fallback.signum()
        } else {
            1.0
        }
    };
    let half = Point::new(sign(local.x, fallback.x) * width / 2.0, sign(local.y, fallback.y) * height / 2.0);
    let center = local_to_world(half, anchor, rotation);

    ResizeResult {
        x: center.x - width / 2.0,
        y: center.y - height / 2.0,
        width,
        height,
    }
}

/// Angle swept around `center` from `start` to `current`, in degrees.
pub fn rotate_from_pointer(center: Point, start: Point, current: Point) -> f64 {
    let start_angle = (start.y - center.y).atan2(start.x - center.x);
    let current_angle = (current.y - center.y).atan2(current.x - center.x);
    normalize_degrees((current_angle - start_angle).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::layer::LayerId;

    const EPS: f64 = 1e-6;

    fn layer_at(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> TextLayer {
        let mut layer = TextLayer::new(LayerId(0), 0);
        layer.x = x;
        layer.y = y;
        layer.width = width;
        layer.height = height;
        layer.rotation = rotation;
        layer
    }

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_unrotated_handles() {
        let layer = layer_at(100.0, 100.0, 200.0, 60.0, 0.0);
        assert_close(handle_coordinates(Handle::TopLeft, &layer), Point::new(100.0, 100.0));
        assert_close(handle_coordinates(Handle::BottomRight, &layer), Point::new(300.0, 160.0));
        assert_close(handle_coordinates(Handle::Rotate, &layer), Point::new(200.0, 80.0));
    }

    #[test]
    fn test_rotation_is_clockwise_on_screen() {
        // A quarter turn moves the top-right corner to the bottom-right.
        let layer = layer_at(0.0, 0.0, 20.0, 20.0, 90.0);
        assert_close(handle_coordinates(Handle::TopRight, &layer), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_center_inside_and_corner_handles_outside() {
        for step in -16..=16 {
            let rotation = step as f64 * 11.25;
            let layer = layer_at(40.0, 70.0, 120.0, 50.0, rotation);
            assert!(point_in_layer(layer.center(), &layer, 0.0));

            for handle in Handle::CORNERS {
                let corner = handle_coordinates(handle, &layer);
                assert!(!point_in_layer(corner, &layer, 0.0), "rotation {} {:?}", rotation, handle);
            }
        }

        let layer = layer_at(100.0, 100.0, 200.0, 60.0, 0.0);
        assert!(!point_in_layer(Point::new(100.0, 100.0), &layer, 0.0));
        assert!(!point_in_layer(Point::new(200.0, 160.0), &layer, 0.0));
        assert!(point_in_layer(Point::new(100.5, 100.5), &layer, 0.0));
    }

    #[test]
    fn test_rotate_handle_outside_body() {
        let layer = layer_at(0.0, 0.0, 100.0, 40.0, 37.0);
        assert!(!point_in_layer(handle_coordinates(Handle::Rotate, &layer), &layer, 0.0));
    }

    #[test]
    fn test_point_in_rotated_layer() {
        let layer = layer_at(0.0, 0.0, 200.0, 20.0, 90.0);
        let center = layer.center();
        // Rotated upright: tall and thin around the center.
        assert!(point_in_layer(Point::new(center.x, center.y + 90.0), &layer, 0.0));
        assert!(!point_in_layer(Point::new(center.x + 90.0, center.y), &layer, 0.0));
        assert!(point_in_layer(Point::new(center.x + 14.0, center.y), &layer, 5.0));
    }

    #[test]
    fn test_hit_test_handle_priority_and_reach() {
        let layer = layer_at(100.0, 100.0, 200.0, 60.0, 0.0);
        assert_eq!(hit_test_handle(Point::new(103.0, 98.0), &layer, 16.0), Some(Handle::TopLeft));
        assert_eq!(hit_test_handle(Point::new(200.0, 82.0), &layer, 16.0), Some(Handle::Rotate));
        assert_eq!(hit_test_handle(Point::new(110.0, 100.0), &layer, 16.0), None);
        assert_eq!(hit_test_handle(Point::new(200.0, 130.0), &layer, 16.0), None);
    }

    #[test]
    fn test_resize_bottom_right_scenario() {
        let layer = layer_at(100.0, 100.0, 200.0, 60.0, 0.0);
        let anchor = handle_coordinates(Handle::TopLeft, &layer);
        let result = resize_from_handle(Handle::BottomRight, anchor, Point::new(400.0, 260.0), 0.0);

        assert!((result.width - 300.0).abs() < EPS);
        assert!((result.height - 160.0).abs() < EPS);
        assert_close(Point::new(result.x, result.y), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_resize_keeps_anchor_under_rotation() {
        let grabs = [Point::new(420.0, 15.0), Point::new(-60.0, 300.0), Point::new(250.0, 250.0)];
        for step in -8..=8 {
            let rotation = step as f64 * 22.5;
            for handle in Handle::CORNERS {
                for grab in grabs {
                    let layer = layer_at(100.0, 100.0, 200.0, 60.0, rotation);
                    let anchor_handle = handle.opposite();
                    let anchor = handle_coordinates(anchor_handle, &layer);

                    let r = resize_from_handle(handle, anchor, grab, rotation);
                    let resized = layer_at(r.x, r.y, r.width, r.height, rotation);

                    // The anchor stays at one of the resized box's corners.
                    let held = Handle::CORNERS
                        .into_iter()
                        .map(|h| handle_coordinates(h, &resized).distance(anchor))
                        .fold(f64::MAX, f64::min);
                    assert!(held < 1e-6, "rotation {} handle {:?}", rotation, handle);
                }
            }
        }
    }

    #[test]
    fn test_resize_anchor_is_opposite_corner_when_not_flipped() {
        let layer = layer_at(10.0, 20.0, 80.0, 40.0, 30.0);
        let anchor = handle_coordinates(Handle::TopLeft, &layer);
        let grab = local_to_world(Point::new(60.0, 35.0), layer.center(), 30.0);

        let r = resize_from_handle(Handle::BottomRight, anchor, grab, 30.0);
        let resized = layer_at(r.x, r.y, r.width, r.height, 30.0);
        assert_close(handle_coordinates(Handle::TopLeft, &resized), anchor);
        assert_close(handle_coordinates(Handle::BottomRight, &resized), grab);
    }

    #[test]
    fn test_zero_length_drag_keeps_rotated_geometry() {
        for rotation in [30.0, -75.0, 135.0, 180.0] {
            let layer = layer_at(100.0, 100.0, 200.0, 60.0, rotation);
            let anchor = handle_coordinates(Handle::TopLeft, &layer);
            let grab = handle_coordinates(Handle::BottomRight, &layer);

            let r = resize_from_handle(Handle::BottomRight, anchor, grab, rotation);
            assert!((r.x - 100.0).abs() < EPS && (r.y - 100.0).abs() < EPS, "rotation {}", rotation);
            assert!((r.width - 200.0).abs() < EPS && (r.height - 60.0).abs() < EPS);
        }
    }

    #[test]
    fn test_resize_clamps_degenerate_size() {
        let anchor = Point::new(50.0, 50.0);
        let r = resize_from_handle(Handle::BottomRight, anchor, anchor, 0.0);
        assert_eq!(r.width, MIN_LAYER_SIZE);
        assert_eq!(r.height, MIN_LAYER_SIZE);
        // Collapsed onto the anchor, the box still extends towards the dragged corner.
        assert_close(Point::new(r.x, r.y), anchor);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let center = Point::new(200.0, 200.0);
        let delta = rotate_from_pointer(center, Point::new(200.0, 100.0), Point::new(300.0, 200.0));
        assert!((delta - 90.0).abs() < EPS);
    }

    #[test]
    fn test_rotation_round_trip() {
        let center = Point::new(0.0, 0.0);
        let a = Point::new(10.0, 3.0);
        let b = Point::new(-4.0, 9.0);
        let start = 17.0;
        let there = start + rotate_from_pointer(center, a, b);
        let back = there + rotate_from_pointer(center, b, a);
        assert!((normalize_degrees(back) - start).abs() < 1e-9);
    }
}

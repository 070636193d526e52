// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the distance and coordinate-transform helpers used
//! wherever landmark positions cross from estimator space into surface
//! space. The horizontal mirror lives here so every crossing applies the
//! exact same transform.

use crate::models::hand::{NormPoint, Point};

/// Euclidean distance between two points in pixel space.
pub fn distance(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Scale a normalized (0.0 to 1.0) landmark position to pixel coordinates.
pub fn to_pixel_space(point: NormPoint, width: u32, height: u32) -> Point {
    Point {
        x: point.x * width as f32,
        y: point.y * height as f32,
    }
}

/// Mirror a pixel-space point horizontally across a surface of the given
/// width.
///
/// Landmarks arrive in the estimator's native orientation; the display
/// follows a mirror metaphor (moving right in the real world moves the
/// drawn point right). Both the overlay and the drawing surface must go
/// through this same function so the stroke stays aligned with the
/// fingertip indicator.
pub fn mirror_x(point: Point, width: u32) -> Point {
    Point {
        x: width as f32 - point.x,
        y: point.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point { x: 0.0, y: 0.0 };
        let b = Point { x: 3.0, y: 4.0 };
        assert!((distance(a, b) - 5.0).abs() < 1e-6);
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn test_to_pixel_space() {
        let center = to_pixel_space(NormPoint { x: 0.5, y: 0.5 }, 640, 360);
        assert!((center.x - 320.0).abs() < 1e-4);
        assert!((center.y - 180.0).abs() < 1e-4);

        let corner = to_pixel_space(NormPoint { x: 1.0, y: 1.0 }, 640, 360);
        assert_eq!(corner.x, 640.0);
        assert_eq!(corner.y, 360.0);
    }

    #[test]
    fn test_mirror_is_involution() {
        let p = Point { x: 123.0, y: 45.0 };
        let twice = mirror_x(mirror_x(p, 640), 640);
        assert!((twice.x - p.x).abs() < 1e-6);
        assert_eq!(twice.y, p.y);
    }

    #[test]
    fn test_mirror_maps_edges() {
        let left = Point { x: 0.0, y: 10.0 };
        assert_eq!(mirror_x(left, 640).x, 640.0);

        let center = Point { x: 320.0, y: 10.0 };
        assert_eq!(mirror_x(center, 640).x, 320.0);
    }
}

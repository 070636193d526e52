// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hand landmark data structures.
//!
//! This module defines the per-frame payload delivered by a landmark
//! source: an optional set of tracked-hand landmarks in normalized
//! coordinates, plus an optional camera image for the overlay background.
//! "No hand" is a valid frame value, not an error.

use image::RgbaImage;

/// A 2D point in normalized coordinates (0.0 to 1.0), as delivered by the
/// pose estimator. Z-depth is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormPoint {
    pub x: f32,
    pub y: f32,
}

/// A 2D point in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// Landmark indices in the standard 21-point hand topology.
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;

/// One tracked hand's landmark set.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: Vec<NormPoint>,
}

impl HandLandmarks {
    pub fn new(points: Vec<NormPoint>) -> Self {
        Self { points }
    }

    pub fn get(&self, index: usize) -> Option<NormPoint> {
        self.points.get(index).copied()
    }

    pub fn wrist(&self) -> Option<NormPoint> {
        self.get(WRIST)
    }

    pub fn thumb_tip(&self) -> Option<NormPoint> {
        self.get(THUMB_TIP)
    }

    pub fn index_tip(&self) -> Option<NormPoint> {
        self.get(INDEX_TIP)
    }

    /// Proxy for hand size: middle-finger MCP, falling back to the index
    /// MCP when the detector delivers a truncated landmark set.
    pub fn hand_base(&self) -> Option<NormPoint> {
        self.get(MIDDLE_MCP).or_else(|| self.get(INDEX_MCP))
    }
}

/// One tick of landmark-source output.
pub struct LandmarkFrame {
    /// Landmarks for the single tracked hand, if one is visible.
    pub hand: Option<HandLandmarks>,
    /// Camera image for the overlay background, when the source has one.
    pub image: Option<RgbaImage>,
}

impl LandmarkFrame {
    /// A frame with no hand and no camera image.
    pub fn empty() -> Self {
        Self {
            hand: None,
            image: None,
        }
    }
}

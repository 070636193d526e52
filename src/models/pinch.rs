// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pinch detection state machine.
//!
//! Converts raw thumb/index landmark geometry into a debounced,
//! hysteresis-stabilized pen-down signal. The update is a pure function of
//! (state, geometry) and carries no rendering dependency, so the filter is
//! testable headless.
//!
//! The pinch ratio is index-to-thumb distance divided by a hand-size proxy
//! (wrist to middle-finger MCP), which makes the thresholds invariant to
//! how far the hand is from the camera.

use crate::models::hand::{HandLandmarks, Point};
use crate::util::geometry::{distance, to_pixel_space};

/// Ratio below which a pinch may begin.
pub const START_RATIO: f32 = 0.18;
/// Ratio above which an active pinch releases. START < RELEASE creates a
/// dead band that holds the prior state near the boundary.
pub const RELEASE_RATIO: f32 = 0.24;
/// Consecutive qualifying frames required before the pen goes down.
pub const ACTIVATE_FRAMES: u8 = 3;
/// Cap on the debounce counter.
pub const DEBOUNCE_CAP: u8 = 10;
/// Floor on the hand-size proxy; prevents divide-by-zero and ratio blow-up
/// when landmarks coincide.
pub const MIN_HAND_SCALE: f32 = 1.0;

/// Debounce/hysteresis state carried across frames. Owned by the caller,
/// mutated only through [`update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PinchState {
    /// True while the pen is down.
    pub active: bool,
    /// Consecutive qualifying frames observed since the last inactive tick.
    pub debounce_count: u8,
}

/// The landmark geometry one pinch decision needs, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGeometry {
    pub thumb_tip: Point,
    pub index_tip: Point,
    pub wrist: Point,
    pub hand_base: Point,
}

impl PinchGeometry {
    /// Extract pinch geometry from a landmark set, scaled to pixel space.
    /// Returns `None` when any required landmark is missing.
    pub fn from_hand(hand: &HandLandmarks, width: u32, height: u32) -> Option<Self> {
        Some(Self {
            thumb_tip: to_pixel_space(hand.thumb_tip()?, width, height),
            index_tip: to_pixel_space(hand.index_tip()?, width, height),
            wrist: to_pixel_space(hand.wrist()?, width, height),
            hand_base: to_pixel_space(hand.hand_base()?, width, height),
        })
    }

    /// Unitless pinch ratio: fingertip gap over hand-size proxy.
    pub fn ratio(&self) -> f32 {
        let gap = distance(self.index_tip, self.thumb_tip);
        let hand_scale = distance(self.wrist, self.hand_base).max(MIN_HAND_SCALE);
        gap / hand_scale
    }
}

/// Advance the pinch state machine by one frame.
///
/// `None` geometry (no hand detected, or a truncated landmark set) forces
/// the inactive state immediately. Activation requires
/// [`ACTIVATE_FRAMES`] consecutive frames under [`START_RATIO`]; release
/// happens on the same tick the ratio exceeds [`RELEASE_RATIO`], with no
/// debounce, so lifting the pen feels instantaneous.
pub fn update(state: PinchState, hand: Option<&PinchGeometry>) -> PinchState {
    let Some(geometry) = hand else {
        return PinchState::default();
    };

    let ratio = geometry.ratio();
    let candidate = if ratio < START_RATIO {
        true
    } else if ratio > RELEASE_RATIO {
        false
    } else {
        // Dead band: hold whatever the previous frame decided.
        state.active
    };

    if !candidate {
        return PinchState::default();
    }
    if state.active {
        return state;
    }

    let debounce_count = state.debounce_count.saturating_add(1).min(DEBOUNCE_CAP);
    PinchState {
        active: debounce_count >= ACTIVATE_FRAMES,
        debounce_count,
    }
}

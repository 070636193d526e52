// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scripted landmark source: simulation mode, no hardware needed.
//!
//! Drives the whole pipeline without a camera or detector: a synthetic
//! hand sweeps a closed path, pinches for a few seconds at a time, and
//! periodically leaves the frame so the no-hand path gets exercised too.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::models::hand::{
    HandLandmarks, LandmarkFrame, NormPoint, INDEX_MCP, INDEX_TIP, MIDDLE_MCP, THUMB_TIP, WRIST,
};
use crate::tracking::{FrameThrottle, LandmarkSource};

/// Seconds per pinch cycle.
const PINCH_PERIOD: f32 = 6.0;
/// Seconds of each cycle spent pinching.
const PINCH_HELD: f32 = 3.5;
/// Seconds per hand-visibility cycle.
const PRESENCE_PERIOD: f32 = 12.0;
/// The hand leaves the frame for the last second of each presence cycle.
const ABSENT_FOR: f32 = 1.0;

/// Fingertip gap (normalized) while pinching; comfortably under the start
/// ratio once scaled against the simulated hand size.
const PINCHED_GAP: f32 = 0.005;
/// Fingertip gap while open; comfortably past the release ratio.
const OPEN_GAP: f32 = 0.06;

pub struct ScriptedSource {
    /// Simulated camera rate.
    pub fps: u32,
    /// Forward every Nth simulated frame.
    pub decimation: u32,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self {
            fps: 30,
            decimation: 2,
        }
    }
}

impl ScriptedSource {
    /// The simulated frame at elapsed time `t` seconds.
    fn frame_at(&self, t: f32) -> LandmarkFrame {
        if (t % PRESENCE_PERIOD) >= PRESENCE_PERIOD - ABSENT_FOR {
            return LandmarkFrame::empty();
        }

        let cx = 0.5 + 0.25 * (0.6 * t).sin();
        let cy = 0.45 + 0.20 * (0.8 * t + 1.0).sin();
        let gap = if (t % PINCH_PERIOD) < PINCH_HELD {
            PINCHED_GAP
        } else {
            OPEN_GAP
        };

        let mut points = vec![NormPoint { x: cx, y: cy }; 21];
        points[WRIST] = NormPoint { x: cx, y: cy + 0.18 };
        points[MIDDLE_MCP] = NormPoint { x: cx, y: cy + 0.08 };
        points[INDEX_MCP] = NormPoint {
            x: cx - 0.03,
            y: cy + 0.08,
        };
        points[INDEX_TIP] = NormPoint { x: cx, y: cy };
        points[THUMB_TIP] = NormPoint { x: cx + gap, y: cy };

        LandmarkFrame {
            hand: Some(HandLandmarks::new(points)),
            image: None,
        }
    }
}

impl LandmarkSource for ScriptedSource {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>, stop: Arc<AtomicBool>) {
        let mut throttle = FrameThrottle::new(self.decimation);
        let tick = Duration::from_secs_f32(1.0 / self.fps.max(1) as f32);
        let mut t = 0.0f32;

        log::info!(
            "Scripted landmark source running at {} Hz, forwarding every {} frames",
            self.fps,
            self.decimation.max(1)
        );

        while !stop.load(Ordering::Relaxed) {
            t += tick.as_secs_f32();
            if throttle.admit() && tx.send(self.frame_at(t)).is_err() {
                break;
            }
            thread::sleep(tick);
        }
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay + drawing composition.
//!
//! The recorder and the preview both need the same merged view: the live
//! overlay as the background with the persistent drawing on top, so
//! strokes occlude the camera image. The destination buffer is reused
//! across ticks; it has no lifecycle of its own.

use crate::render::surface::Surface;

/// Recompute `dst` as overlay (background) + drawing (foreground).
pub fn composite_into(dst: &mut Surface, overlay: &Surface, drawing: &Surface) {
    dst.clear();
    dst.draw_image(overlay);
    dst.draw_image(drawing);
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the AirScribe application.

pub mod palette;
pub mod toolbar;
pub mod viewport;

use crate::render::surface::Color;

/// Convert a surface color to an egui color.
pub(crate) fn color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Color palette and pen tool panel.

use crate::models::stroke::DrawMode;
use crate::render::surface::Color;
use crate::ui::color32;

/// Result of palette interaction.
pub enum PaletteAction {
    None,
    /// Pick a pen color (also leaves erase mode).
    SelectColor(usize),
    ToggleEraser,
    ClearDrawing,
}

/// Display the palette panel with color swatches and tool buttons.
pub fn show(
    ui: &mut egui::Ui,
    palette: &[Color],
    selected: usize,
    mode: DrawMode,
) -> PaletteAction {
    let mut action = PaletteAction::None;

    ui.label("Colors:");
    ui.add_space(4.0);

    for (i, &color) in palette.iter().enumerate() {
        let is_selected = mode == DrawMode::Draw && i == selected;
        let stroke = if is_selected {
            egui::Stroke::new(2.0, egui::Color32::WHITE)
        } else {
            egui::Stroke::new(1.0, egui::Color32::from_gray(90))
        };
        let swatch = egui::Button::new("").fill(color32(color)).stroke(stroke);
        if ui.add_sized([28.0, 28.0], swatch).clicked() {
            action = PaletteAction::SelectColor(i);
        }
    }

    ui.separator();

    if ui
        .selectable_label(mode == DrawMode::Erase, "Eraser")
        .clicked()
    {
        action = PaletteAction::ToggleEraser;
    }

    if ui.button("Clear").clicked() {
        action = PaletteAction::ClearDrawing;
    }

    ui.add_space(8.0);
    let hint = match mode {
        DrawMode::Draw => "Pinch thumb and index to draw",
        DrawMode::Erase => "Pinch thumb and index to erase",
    };
    ui.label(egui::RichText::new(hint).italics().weak());

    action
}

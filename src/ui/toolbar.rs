// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar: recording, export, captioning and status display.

use crate::io::export::Theme;
use crate::models::stroke::DrawMode;

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    ToggleRecording,
    SaveImage,
    RequestCaption,
    SetTheme(Theme),
}

/// Everything the toolbar needs to render.
pub struct ToolbarStatus {
    pub recording: bool,
    pub caption_busy: bool,
    pub caption_available: bool,
    pub theme: Theme,
    pub mode: DrawMode,
    pub pen_down: bool,
}

/// Display the toolbar row.
pub fn show(ui: &mut egui::Ui, status: &ToolbarStatus) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let record_label = if status.recording {
            "⏹ Stop recording"
        } else {
            "⏺ Record"
        };
        if ui.button(record_label).clicked() {
            action = ToolbarAction::ToggleRecording;
        }

        if ui.button("💾 Save image").clicked() {
            action = ToolbarAction::SaveImage;
        }

        let caption_button = egui::Button::new(if status.caption_busy {
            "✨ Thinking…"
        } else {
            "✨ Caption"
        });
        let caption_enabled = status.caption_available && !status.caption_busy;
        if ui.add_enabled(caption_enabled, caption_button).clicked() {
            action = ToolbarAction::RequestCaption;
        }

        ui.separator();

        ui.label("Export:");
        if ui
            .selectable_label(status.theme == Theme::Light, "Light")
            .clicked()
        {
            action = ToolbarAction::SetTheme(Theme::Light);
        }
        if ui
            .selectable_label(status.theme == Theme::Dark, "Dark")
            .clicked()
        {
            action = ToolbarAction::SetTheme(Theme::Dark);
        }

        ui.separator();

        // Pen status light.
        let (dot, text) = if status.pen_down {
            match status.mode {
                DrawMode::Draw => (egui::Color32::from_rgb(74, 222, 128), "Writing"),
                DrawMode::Erase => (egui::Color32::from_rgb(239, 68, 68), "Erasing"),
            }
        } else {
            (egui::Color32::from_gray(120), "Pen up")
        };
        ui.colored_label(dot, "●");
        ui.label(egui::RichText::new(text).small());

        if status.recording {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(239, 68, 68), "REC");
        }
    });

    action
}

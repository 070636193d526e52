// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview viewport.
//!
//! Shows the composited preview (mirrored camera overlay + drawing)
//! scaled to fit the available space, with the latest caption as a banner.

/// Display the preview area.
pub fn show(
    ui: &mut egui::Ui,
    texture: &Option<egui::TextureHandle>,
    size: Option<(u32, u32)>,
    caption: &str,
) {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(10);
    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        if let (Some(texture), Some((width, height))) = (texture, size) {
            // Scale the preview to fit while preserving aspect ratio.
            let available = ui.available_size();
            let image_aspect = width as f32 / height as f32;
            let available_aspect = available.x / available.y;

            let (display_width, display_height) = if image_aspect > available_aspect {
                let w = available.x;
                (w, w / image_aspect)
            } else {
                let h = available.y;
                (h * image_aspect, h)
            };

            let x_offset = (available.x - display_width) / 2.0;
            let y_offset = (available.y - display_height) / 2.0;
            let image_rect = egui::Rect::from_min_size(
                ui.min_rect().min + egui::vec2(x_offset, y_offset),
                egui::vec2(display_width, display_height),
            );

            ui.painter().image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            if !caption.is_empty() {
                let banner_pos = image_rect.center_top() + egui::vec2(0.0, 24.0);
                ui.painter().text(
                    banner_pos,
                    egui::Align2::CENTER_CENTER,
                    format!("\u{201C}{}\u{201D}", caption),
                    egui::FontId::proportional(18.0),
                    egui::Color32::WHITE,
                );
            }
        } else {
            // No frames yet: show a welcome message.
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.heading(
                        egui::RichText::new("AirScribe")
                            .size(32.0)
                            .color(egui::Color32::from_gray(200)),
                    );
                    ui.label(
                        egui::RichText::new("Draw in the air with your hand")
                            .size(14.0)
                            .color(egui::Color32::from_gray(150)),
                    );
                    ui.add_space(20.0);
                    ui.label(
                        egui::RichText::new("Waiting for the first landmark frame…")
                            .color(egui::Color32::from_gray(180)),
                    );
                });
            });
        }
    });
}

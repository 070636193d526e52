// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the pipeline together: it drains the landmark
//! channel (keeping only the newest pending frame), runs the pinch filter
//! and stroke planner, applies the resulting commands to the overlay and
//! drawing surfaces, ticks the recorder at repaint cadence, and hosts the
//! UI panels. All cross-task state lives here, with the UI as the single
//! writer of the drawing context.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::io::caption::{CaptionTask, Captioner};
use crate::io::export::{self, Theme};
use crate::models::hand::{LandmarkFrame, Point};
use crate::models::pinch::{self, PinchGeometry, PinchState};
use crate::models::stroke::{self, DrawCommand, DrawContext, DrawMode};
use crate::recorder::{default_encoder, CompositeRecorder, EncoderOptions, RecordedMedia};
use crate::render::composite::composite_into;
use crate::render::surface::{Color, Surface};
use crate::tracking::scripted::ScriptedSource;
use crate::tracking::{spawn_source, SourceHandle};
use crate::ui::{palette, toolbar, viewport};
use crate::util::geometry::mirror_x;

/// Session resolution when the source delivers no camera image.
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 360;

/// Overlay backdrop when no camera image is available.
const OVERLAY_BACKDROP: Color = Color::rgb(0x0F, 0x17, 0x2A);

/// The three raster buffers of a drawing session. Sized once, when the
/// first landmark frame reveals the source resolution.
struct Surfaces {
    /// Ephemeral per-frame layer: mirrored camera image + pen indicator.
    overlay: Surface,
    /// Persistent layer the strokes accumulate on.
    drawing: Surface,
    /// Merged view for the on-screen preview.
    preview: Surface,
}

impl Surfaces {
    fn new(width: u32, height: u32) -> Self {
        Self {
            overlay: Surface::new(width, height),
            drawing: Surface::new(width, height),
            preview: Surface::new(width, height),
        }
    }
}

/// Main application state.
pub struct AirScribeApp {
    config: AppConfig,

    /// Pen colors from the config palette.
    palette: Vec<Color>,
    selected_color: usize,
    /// The one mutable drawing context; the UI is its only writer.
    draw_ctx: DrawContext,

    /// Pinch filter state, carried across frames.
    pinch: PinchState,
    /// Stroke continuity cursor; `None` whenever no stroke is in progress.
    last_point: Option<Point>,
    /// Pen state of the most recent frame, for the status display.
    pen_down: bool,
    /// Whether the most recent frame contained a hand.
    hand_visible: bool,

    surfaces: Option<Surfaces>,
    source: Option<SourceHandle>,
    recorder: CompositeRecorder,

    caption: CaptionTask,
    captioner: Option<Arc<dyn Captioner>>,
    caption_text: String,

    export_theme: Theme,
    preview_texture: Option<egui::TextureHandle>,
}

impl AirScribeApp {
    /// Create the application and start the default (scripted) landmark
    /// source.
    pub fn new(config: AppConfig) -> Self {
        let palette = config.palette_colors();
        let draw_ctx = DrawContext {
            color: palette[0],
            mode: DrawMode::Draw,
        };
        let source = spawn_source(ScriptedSource {
            fps: 30,
            decimation: config.frame_decimation,
        });
        let export_theme = config.export_theme;
        Self {
            config,
            palette,
            selected_color: 0,
            draw_ctx,
            pinch: PinchState::default(),
            last_point: None,
            pen_down: false,
            hand_visible: false,
            surfaces: None,
            source: Some(source),
            recorder: CompositeRecorder::new(),
            caption: CaptionTask::new(),
            captioner: None,
            caption_text: String::new(),
            export_theme,
            preview_texture: None,
        }
    }

    /// Install an AI captioning collaborator. Without one the caption
    /// button stays disabled.
    pub fn with_captioner(mut self, captioner: Arc<dyn Captioner>) -> Self {
        self.captioner = Some(captioner);
        self
    }

    /// Process one landmark frame: pinch filter, stroke planning, command
    /// execution.
    fn handle_frame(&mut self, frame: LandmarkFrame) {
        let (width, height) = frame
            .image
            .as_ref()
            .map(|img| img.dimensions())
            .unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT));
        if self.surfaces.is_none() {
            log::info!("Sizing session surfaces to {}x{}", width, height);
            self.surfaces = Some(Surfaces::new(width, height));
        }
        let Some(surfaces) = self.surfaces.as_mut() else {
            return;
        };
        let surface_width = surfaces.drawing.width();
        let surface_height = surfaces.drawing.height();

        let geometry = frame
            .hand
            .as_ref()
            .and_then(|hand| PinchGeometry::from_hand(hand, surface_width, surface_height));

        let was_down = self.pinch.active;
        self.pinch = pinch::update(self.pinch, geometry.as_ref());
        let pen_down = self.pinch.active;
        if pen_down != was_down {
            log::info!("Pen {}", if pen_down { "down" } else { "up" });
        }

        // The overlay is rebuilt from scratch every frame.
        surfaces.overlay.clear();
        match frame.image.as_ref() {
            Some(img) => surfaces.overlay.draw_image_mirrored(img),
            None => surfaces.overlay.fill(OVERLAY_BACKDROP),
        }

        let fingertip = geometry.map(|g| g.index_tip);
        let (commands, cursor) = stroke::plan(pen_down, fingertip, &self.draw_ctx, self.last_point);
        self.last_point = cursor;
        for command in commands {
            apply_command(surfaces, command);
        }

        self.pen_down = pen_down;
        self.hand_visible = frame.hand.is_some();
    }

    fn toggle_recording(&mut self) {
        if self.recorder.is_recording() {
            match self.recorder.stop() {
                Some(Ok(media)) => self.save_recording(media),
                Some(Err(e)) => log::error!("Recording failed to finalize: {}", e),
                None => {}
            }
            return;
        }

        let Some(surfaces) = self.surfaces.as_ref() else {
            log::warn!("Cannot record before the first frame sizes the surfaces");
            return;
        };
        let options = EncoderOptions {
            width: surfaces.drawing.width(),
            height: surfaces.drawing.height(),
            frame_rate: self.config.capture_frame_rate,
        };
        if let Err(e) = self.recorder.start(options, default_encoder) {
            log::error!("Recording failed to start: {}", e);
        }
    }

    fn save_recording(&self, media: RecordedMedia) {
        let filename = export::recording_filename(media.extension, export::now_millis());
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&filename)
            .save_file()
        else {
            log::info!("Recording save cancelled");
            return;
        };
        match export::save_recording(&path, &media) {
            Ok(_) => log::info!("Saved recording to {}", path.display()),
            Err(e) => log::error!("Failed to save recording: {}", e),
        }
    }

    fn save_image(&self) {
        let Some(surfaces) = self.surfaces.as_ref() else {
            log::warn!("Nothing to save yet");
            return;
        };
        let filename = export::png_filename(self.export_theme, export::now_millis());
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(&filename)
            .save_file()
        else {
            return;
        };
        match export::save_png(&path, &surfaces.drawing, self.export_theme) {
            Ok(_) => log::info!("Saved image to {}", path.display()),
            Err(e) => log::error!("Failed to save image: {}", e),
        }
    }

    fn request_caption(&mut self) {
        let Some(captioner) = self.captioner.clone() else {
            return;
        };
        let Some(surfaces) = self.surfaces.as_ref() else {
            return;
        };
        // Snapshot at trigger time; drawing continues while the request
        // is in flight.
        let png = match export::encode_surface_png(&surfaces.drawing) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Failed to snapshot drawing for captioning: {}", e);
                return;
            }
        };
        if self.caption.request(captioner, png) {
            log::info!("Caption requested");
        }
    }

    fn clear_drawing(&mut self) {
        if let Some(surfaces) = self.surfaces.as_mut() {
            surfaces.drawing.clear();
        }
        self.caption_text.clear();
        log::info!("Drawing cleared");
    }

    fn update_preview(&mut self, ctx: &egui::Context) {
        let Some(surfaces) = self.surfaces.as_mut() else {
            return;
        };
        let Surfaces {
            overlay,
            drawing,
            preview,
        } = surfaces;
        composite_into(preview, overlay, drawing);

        let size = [preview.width() as usize, preview.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, preview.as_raw());
        match &mut self.preview_texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.preview_texture =
                    Some(ctx.load_texture("preview", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    /// Ordered teardown. Every step is idempotent, so an abrupt shutdown
    /// can call this more than once.
    fn shutdown(&mut self) {
        // 1. Stop the frame source; this also closes the estimator
        //    boundary, since the estimator lives on the source thread.
        if let Some(source) = self.source.as_mut() {
            source.stop();
        }
        self.source = None;

        // 2. Finalize any active recording to avoid losing the session.
        if let Some(result) = self.recorder.stop() {
            match result {
                Ok(media) => {
                    let filename =
                        export::recording_filename(media.extension, export::now_millis());
                    let path = std::path::PathBuf::from(&filename);
                    match export::save_recording(&path, &media) {
                        Ok(_) => log::info!("Saved partial recording to {}", path.display()),
                        Err(e) => log::error!("Failed to save partial recording: {}", e),
                    }
                }
                Err(e) => log::error!("Recording failed to finalize during shutdown: {}", e),
            }
        }

        // 3. Release surfaces.
        self.surfaces = None;
        self.preview_texture = None;
    }
}

/// Apply one planned command to the session surfaces, mirroring every
/// point into display space. Segments land on the persistent drawing
/// surface, indicators on the ephemeral overlay; both use the same mirror
/// so they stay aligned.
fn apply_command(surfaces: &mut Surfaces, command: DrawCommand) {
    match command {
        DrawCommand::Segment {
            from,
            to,
            width,
            color,
            blend,
        } => {
            let w = surfaces.drawing.width();
            surfaces
                .drawing
                .draw_line_segment(mirror_x(from, w), mirror_x(to, w), width, color, blend);
        }
        DrawCommand::Indicator {
            center,
            radius,
            fill,
            outline,
            outline_width,
        } => {
            let w = surfaces.overlay.width();
            surfaces
                .overlay
                .fill_circle(mirror_x(center, w), radius, fill, outline, outline_width);
        }
    }
}

impl eframe::App for AirScribeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Landmark-frame task: only the newest pending frame is processed;
        // stale frames are dropped to keep latency bounded.
        let frame = self.source.as_ref().and_then(|s| s.latest_frame());
        if let Some(frame) = frame {
            self.handle_frame(frame);
        }

        // Composite-recorder task, at repaint (display refresh) cadence.
        if let Some(surfaces) = self.surfaces.as_ref() {
            self.recorder.tick(&surfaces.overlay, &surfaces.drawing);
        }

        // Surface any finished caption.
        match self.caption.poll() {
            Some(Ok(title)) => {
                log::info!("Caption: {}", title);
                self.caption_text = title;
            }
            Some(Err(e)) => log::error!("Caption request failed: {}", e),
            None => {}
        }

        self.update_preview(ctx);

        // Toolbar
        let status = toolbar::ToolbarStatus {
            recording: self.recorder.is_recording(),
            caption_busy: self.caption.is_busy(),
            caption_available: self.captioner.is_some(),
            theme: self.export_theme,
            mode: self.draw_ctx.mode,
            pen_down: self.pen_down && self.hand_visible,
        };
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &status))
            .inner;
        match toolbar_action {
            toolbar::ToolbarAction::ToggleRecording => self.toggle_recording(),
            toolbar::ToolbarAction::SaveImage => self.save_image(),
            toolbar::ToolbarAction::RequestCaption => self.request_caption(),
            toolbar::ToolbarAction::SetTheme(theme) => self.export_theme = theme,
            toolbar::ToolbarAction::None => {}
        }

        // Palette (left side)
        let palette_action = egui::SidePanel::left("palette")
            .default_width(120.0)
            .show(ctx, |ui| {
                palette::show(ui, &self.palette, self.selected_color, self.draw_ctx.mode)
            })
            .inner;
        match palette_action {
            palette::PaletteAction::SelectColor(i) => {
                if let Some(&color) = self.palette.get(i) {
                    self.selected_color = i;
                    // Picking a color always returns to draw mode.
                    self.draw_ctx = DrawContext {
                        color,
                        mode: DrawMode::Draw,
                    };
                }
            }
            palette::PaletteAction::ToggleEraser => {
                self.draw_ctx.mode = match self.draw_ctx.mode {
                    DrawMode::Draw => DrawMode::Erase,
                    DrawMode::Erase => DrawMode::Draw,
                };
            }
            palette::PaletteAction::ClearDrawing => self.clear_drawing(),
            palette::PaletteAction::None => {}
        }

        // Preview (center)
        let preview_size = self
            .surfaces
            .as_ref()
            .map(|s| (s.preview.width(), s.preview.height()));
        egui::CentralPanel::default().show(ctx, |ui| {
            viewport::show(ui, &self.preview_texture, preview_size, &self.caption_text);
        });

        // Keep repainting: the recorder and the preview both run at
        // display-refresh cadence, independent of landmark arrival.
        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::time::{Duration, Instant};

    struct StubCaptioner;

    impl Captioner for StubCaptioner {
        fn interpret(&self, _png: &[u8]) -> Result<String> {
            Ok("a doodle in thin air".to_string())
        }
    }

    #[test]
    fn test_caption_request_snapshots_and_sets_busy_flag() {
        let mut app = AirScribeApp::new(AppConfig::default()).with_captioner(Arc::new(StubCaptioner));
        app.surfaces = Some(Surfaces::new(8, 8));

        app.request_caption();
        assert!(app.caption.is_busy());

        let deadline = Instant::now() + Duration::from_secs(2);
        let title = loop {
            if let Some(result) = app.caption.poll() {
                break result.unwrap();
            }
            assert!(Instant::now() < deadline, "caption never completed");
            std::thread::sleep(Duration::from_millis(5));
        };
        assert_eq!(title, "a doodle in thin air");
        app.shutdown();
    }

    #[test]
    fn test_clear_drawing_resets_surface_and_caption() {
        let mut app = AirScribeApp::new(AppConfig::default());
        app.surfaces = Some(Surfaces::new(8, 8));
        if let Some(surfaces) = app.surfaces.as_mut() {
            surfaces.drawing.fill(Color::rgb(1, 2, 3));
        }
        app.caption_text = "stale".to_string();

        app.clear_drawing();
        let drawing = &app.surfaces.as_ref().unwrap().drawing;
        assert!(drawing.as_raw().iter().all(|&b| b == 0));
        assert!(app.caption_text.is_empty());
        app.shutdown();
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut app = AirScribeApp::new(AppConfig::default());
        app.surfaces = Some(Surfaces::new(8, 8));
        app.shutdown();
        assert!(app.source.is_none());
        assert!(app.surfaces.is_none());
        app.shutdown();
        app.shutdown();
    }

    #[test]
    fn test_handle_frame_sizes_surfaces_once() {
        let mut app = AirScribeApp::new(AppConfig::default());
        app.handle_frame(LandmarkFrame::empty());
        {
            let surfaces = app.surfaces.as_ref().unwrap();
            assert_eq!(surfaces.drawing.width(), DEFAULT_WIDTH);
            assert_eq!(surfaces.drawing.height(), DEFAULT_HEIGHT);
        }
        // A later no-hand frame resets the pen without touching size.
        app.pinch = PinchState {
            active: true,
            debounce_count: 3,
        };
        app.last_point = Some(Point::new(1.0, 1.0));
        app.handle_frame(LandmarkFrame::empty());
        assert!(!app.pinch.active);
        assert_eq!(app.last_point, None);
        app.shutdown();
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing and recording export.
//!
//! Flattens the transparent drawing surface onto a themed background for
//! PNG export, and writes finished recordings to disk. Encoding identical
//! surface content with the same theme yields byte-identical output.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

use crate::recorder::RecordedMedia;
use crate::render::surface::{Color, Surface};

/// Application name used in export filenames.
pub const APP_NAME: &str = "airscribe";

/// Background theme for flattened exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn background(self) -> Color {
        match self {
            Theme::Light => Color::rgb(0xFF, 0xFF, 0xFF),
            Theme::Dark => Color::rgb(0x1E, 0x29, 0x3B),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Current wall-clock time in unix milliseconds, for export filenames.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// `{app}-{theme}-{unix_millis}.png`
pub fn png_filename(theme: Theme, timestamp_millis: i64) -> String {
    format!("{}-{}-{}.png", APP_NAME, theme.label(), timestamp_millis)
}

/// `{app}-recording-{unix_millis}.{ext}`
pub fn recording_filename(extension: &str, timestamp_millis: i64) -> String {
    format!("{}-recording-{}.{}", APP_NAME, timestamp_millis, extension)
}

/// Flatten the drawing onto a solid theme background.
pub fn flatten(drawing: &Surface, theme: Theme) -> Surface {
    let mut flat = Surface::new(drawing.width(), drawing.height());
    flat.fill(theme.background());
    flat.draw_image(drawing);
    flat
}

/// Encode the drawing, flattened onto the theme background, as PNG bytes.
pub fn encode_png(drawing: &Surface, theme: Theme) -> Result<Vec<u8>> {
    encode_surface_png(&flatten(drawing, theme))
}

/// Encode a surface as-is (transparent background preserved) as PNG
/// bytes. Used for caption snapshots.
pub fn encode_surface_png(surface: &Surface) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    surface
        .as_image()
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

/// Export the drawing as a themed PNG file.
pub fn save_png(path: &Path, drawing: &Surface, theme: Theme) -> Result<()> {
    let bytes = encode_png(drawing, theme)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Write a finished recording to disk.
pub fn save_recording(path: &Path, media: &RecordedMedia) -> Result<()> {
    std::fs::write(path, &media.data)?;
    Ok(())
}

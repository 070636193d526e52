// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! AirScribe - draw in the air with a camera-tracked hand.
//!
//! Pinching thumb and index finger lowers the pen; releasing lifts it.
//! Strokes accumulate on a persistent raster surface composited over a
//! mirrored live overlay, with optional video recording and PNG export.

mod app;
mod config;
mod io;
mod models;
mod recorder;
mod render;
mod tracking;
mod ui;
mod util;

use anyhow::Result;
use app::AirScribeApp;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load configuration, using defaults: {}", e);
            AppConfig::default()
        }
    };

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("AirScribe"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "AirScribe",
        options,
        Box::new(|_cc| Ok(Box::new(AirScribeApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

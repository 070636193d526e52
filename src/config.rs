// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings load from an optional `airscribe.yaml` (or `.yml` / `.json`)
//! in the working directory; a missing file means compiled-in defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::io::export::Theme;
use crate::render::surface::Color;

/// Candidate config filenames, checked in order.
const CONFIG_FILES: [&str; 3] = ["airscribe.yaml", "airscribe.yml", "airscribe.json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pen colors, as `#RRGGBB` hex strings.
    pub palette: Vec<String>,
    /// Default background theme for PNG export.
    pub export_theme: Theme,
    /// Capture-rate hint handed to the video encoder.
    pub capture_frame_rate: u32,
    /// Landmark sources forward every Nth camera frame.
    pub frame_decimation: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                "#38BDF8".to_string(), // sky
                "#F472B6".to_string(), // pink
                "#FACC15".to_string(), // yellow
                "#4ADE80".to_string(), // green
                "#A78BFA".to_string(), // violet
                "#F8FAFC".to_string(), // chalk
            ],
            export_theme: Theme::Dark,
            capture_frame_rate: 30,
            frame_decimation: 2,
        }
    }
}

impl AppConfig {
    /// Load the first config file present in the working directory, or
    /// defaults when there is none.
    pub fn load() -> Result<Self> {
        for name in CONFIG_FILES {
            let path = Path::new(name);
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_path(path);
            }
        }
        Ok(Self::default())
    }

    /// Parse a config file, dispatching on extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let extension = path.extension().and_then(|s| s.to_str());
        let config = match extension {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
            Some("json") => serde_json::from_str(&text)?,
            _ => anyhow::bail!("Unsupported config extension: {:?}", extension),
        };
        Ok(config)
    }

    /// The palette as parsed colors; invalid entries are skipped with a
    /// warning.
    pub fn palette_colors(&self) -> Vec<Color> {
        let colors: Vec<Color> = self
            .palette
            .iter()
            .filter_map(|hex| {
                let color = parse_hex(hex);
                if color.is_none() {
                    log::warn!("Ignoring invalid palette color {:?}", hex);
                }
                color
            })
            .collect();
        if colors.is_empty() {
            // An all-invalid palette still has to leave the pen usable.
            return AppConfig::default().palette_colors();
        }
        colors
    }
}

/// Parse a `#RRGGBB` hex string.
fn parse_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color::rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#38BDF8"), Some(Color::rgb(0x38, 0xBD, 0xF8)));
        assert_eq!(parse_hex("#000000"), Some(Color::rgb(0, 0, 0)));
        assert_eq!(parse_hex("38BDF8"), None);
        assert_eq!(parse_hex("#38BDF"), None);
        assert_eq!(parse_hex("#GGGGGG"), None);
    }

    #[test]
    fn test_defaults_have_a_usable_palette() {
        let config = AppConfig::default();
        assert!(!config.palette_colors().is_empty());
        assert_eq!(config.frame_decimation, 2);
        assert_eq!(config.capture_frame_rate, 30);
    }

    #[test]
    fn test_yaml_config_parses_with_partial_fields() {
        let config: AppConfig = serde_yaml::from_str(
            "export_theme: light\ncapture_frame_rate: 24\n",
        )
        .unwrap();
        assert_eq!(config.export_theme, Theme::Light);
        assert_eq!(config.capture_frame_rate, 24);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.frame_decimation, 2);
    }

    #[test]
    fn test_json_config_parses() {
        let config: AppConfig =
            serde_json::from_str(r##"{"palette": ["#112233"], "export_theme": "dark"}"##).unwrap();
        assert_eq!(config.palette_colors(), vec![Color::rgb(0x11, 0x22, 0x33)]);
    }

    #[test]
    fn test_invalid_palette_entries_are_skipped() {
        let config = AppConfig {
            palette: vec!["#112233".into(), "oops".into()],
            ..AppConfig::default()
        };
        assert_eq!(config.palette_colors(), vec![Color::rgb(0x11, 0x22, 0x33)]);
    }
}

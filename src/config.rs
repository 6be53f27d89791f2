// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tool configuration shared by every registered target tool.
//!
//! Loaded from YAML or JSON; any field missing from the file keeps its
//! default.

use crate::models::measurement::Point;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "LESIONMARK_CONFIG";

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);
    pub const GREEN_YELLOW: Rgba = Rgba([173, 255, 47, 255]);
}

/// Layout of the label box drawn next to a finalized target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBoxConfig {
    pub font_size: f64,
    /// Space between text and box edge
    pub padding: f64,
    /// Center the box horizontally on its anchor instead of starting there
    pub centering_x: bool,
    pub centering_y: bool,
    /// Minimum distance kept between the box and the canvas edges
    pub margin: f64,
}

impl Default for TextBoxConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            padding: 5.0,
            centering_x: true,
            centering_y: true,
            margin: 2.0,
        }
    }
}

/// Configuration object exposed by the tool registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfiguration {
    pub draw_handles: bool,
    pub draw_handles_on_hover: bool,
    /// Carried for compatibility with saved configurations.
    pub arrow_first: bool,
    /// Bit mask of mouse buttons accepted for double activation (bit 0 = primary)
    pub mouse_button_mask: u8,
    pub line_width: f64,
    pub tool_color: Rgba,
    pub active_color: Rgba,
    pub arrow_head_length: f64,
    pub handle_radius: f64,
    /// Canvas distance from the arrow that still counts as a hit
    pub hit_tolerance: f64,
    /// Image-space offset of a new text box from the arrow start
    pub text_box_offset: Point,
    /// Dash and gap lengths of the leader line
    pub leader_dash: [f64; 2],
    pub text_box: TextBoxConfig,
}

impl Default for ToolConfiguration {
    fn default() -> Self {
        Self {
            draw_handles: false,
            draw_handles_on_hover: true,
            arrow_first: true,
            mouse_button_mask: 1,
            line_width: 1.0,
            tool_color: Rgba::WHITE,
            active_color: Rgba::GREEN_YELLOW,
            arrow_head_length: 10.0,
            handle_radius: 6.0,
            hit_tolerance: 25.0,
            text_box_offset: Point::new(-50.0, -50.0),
            leader_dash: [2.0, 3.0],
            text_box: TextBoxConfig::default(),
        }
    }
}

impl ToolConfiguration {
    /// Whether a mouse button (`which`: 1 = primary, 2 = middle, 3 = secondary)
    /// is enabled by the configured mask.
    pub fn is_mouse_button_enabled(&self, which: u8) -> bool {
        if which == 0 || which > 8 {
            return false;
        }
        self.mouse_button_mask & (1 << (which - 1)) != 0
    }

    /// Load configuration from a YAML or JSON file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        let config = match extension {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .with_context(|| format!("Invalid YAML configuration {}", path.display()))?,
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON configuration {}", path.display()))?,
            _ => bail!("Unsupported configuration extension: {:?}", extension),
        };
        Ok(config)
    }

    /// Resolve configuration from an explicit path, then the environment,
    /// then defaults.
    pub fn resolve(cli_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_path {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}

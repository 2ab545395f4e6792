// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Engine configuration.
//!
//! Device-dependent behavior (handle reach, rotate handle availability,
//! canvas resolution cap) is a configuration value rather than a runtime
//! environment check. Configuration is read from YAML or JSON, picked by
//! file extension; every field has a default.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input device class the engine is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    #[default]
    Desktop,
    Touch,
}

/// Canvas backdrop theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Fill used behind everything on the canvas.
    pub fn backdrop(&self) -> [u8; 4] {
        match self {
            Theme::Light => [255, 255, 255, 255],
            Theme::Dark => [15, 23, 42, 255],
        }
    }

    /// Panel and text colors of the placeholder card.
    pub fn placeholder(&self) -> ([u8; 4], [u8; 4]) {
        match self {
            Theme::Light => ([241, 245, 249, 255], [100, 116, 139, 255]),
            Theme::Dark => ([30, 41, 59, 255], [148, 163, 184, 255]),
        }
    }
}

/// What a device can do, and how forgiving hit-testing is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputCapabilities {
    /// Whether the dedicated rotate handle is offered.
    pub rotate_handle: bool,
    /// Handle hit diameter in screen units; a handle is hit within half of it.
    pub handle_radius: f64,
    /// Symmetric inflation of layer bodies for hit-testing, in screen units.
    pub hit_tolerance: f64,
    /// Side of the drawn corner handle squares, in screen units.
    pub handle_size: f64,
    /// Longest canvas side before the canvas is scaled down.
    pub max_canvas_dimension: u32,
}

impl InputCapabilities {
    pub fn desktop() -> Self {
        Self {
            rotate_handle: true,
            handle_radius: 16.0,
            hit_tolerance: 0.0,
            handle_size: 8.0,
            max_canvas_dimension: 1600,
        }
    }

    pub fn touch() -> Self {
        Self {
            rotate_handle: false,
            handle_radius: 40.0,
            hit_tolerance: 10.0,
            handle_size: 16.0,
            max_canvas_dimension: 800,
        }
    }
}

impl Default for InputCapabilities {
    fn default() -> Self {
        Self::desktop()
    }
}

fn default_touch() -> InputCapabilities {
    InputCapabilities::touch()
}

fn default_export_file_name() -> String {
    "text-behind-image.png".to_string()
}

fn default_canvas() -> (u32, u32) {
    (800, 600)
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub device_class: DeviceClass,
    pub desktop: InputCapabilities,
    #[serde(default = "default_touch")]
    pub touch: InputCapabilities,
    pub theme: Theme,
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
    /// Canvas size used before any image is loaded.
    #[serde(default = "default_canvas")]
    pub default_canvas: (u32, u32),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            device_class: DeviceClass::default(),
            desktop: InputCapabilities::desktop(),
            touch: InputCapabilities::touch(),
            theme: Theme::default(),
            export_file_name: default_export_file_name(),
            default_canvas: default_canvas(),
        }
    }
}

impl EngineConfig {
    /// Capabilities of the configured device class.
    pub fn capabilities(&self) -> InputCapabilities {
        match self.device_class {
            DeviceClass::Desktop => self.desktop,
            DeviceClass::Touch => self.touch,
        }
    }
}

/// Load configuration from YAML format.
pub fn load_yaml(path: &Path) -> Result<EngineConfig> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = serde_yaml::from_str(&yaml)
        .with_context(|| format!("parsing YAML config {}", path.display()))?;
    Ok(config)
}

/// Load configuration from JSON format.
pub fn load_json(path: &Path) -> Result<EngineConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = serde_json::from_str(&json)
        .with_context(|| format!("parsing JSON config {}", path.display()))?;
    Ok(config)
}

/// Load configuration, choosing the format from the file extension.
pub fn load(path: &Path) -> Result<EngineConfig> {
    let extension = path.extension().and_then(|s| s.to_str());
    match extension {
        Some("yaml") | Some("yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => bail!("Unsupported config extension: {:?}", extension),
    }
}

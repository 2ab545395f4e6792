// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text Behind Image
//!
//! A desktop editor for placing text layers in front of or behind the
//! subject of a photo and exporting the composite at full resolution.
//!
//! Usage: `text-behind [config.yaml|config.json]`

use anyhow::Result;
use std::path::PathBuf;
use text_behind::app::TextBehindApp;
use text_behind::config::{self, EngineConfig};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match config::load(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default configuration: {:#}", e);
                EngineConfig::default()
            }
        },
        None => EngineConfig::default(),
    };

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Text Behind Image"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "text-behind",
        options,
        Box::new(move |_cc| Ok(Box::new(TextBehindApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! LESIONMARK - qualitative target annotation viewer
//!
//! A cross-platform desktop viewer for marking lesions on image frames with
//! labelled arrows of complete response (CR) or unknown (UN) targets.

mod app;
mod ui;

use anyhow::Result;
use app::LesionmarkApp;
use lesionmark::config::ToolConfiguration;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Optional configuration file as the first argument
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = ToolConfiguration::resolve(config_path.as_deref())?;
    log::info!("hit tolerance {} px, handles drawn: {}", config.hit_tolerance, config.draw_handles);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_drag_and_drop(true)
            .with_title("LESIONMARK - Qualitative Target Annotation"),
        ..Default::default()
    };

    eframe::run_native(
        "LESIONMARK",
        options,
        Box::new(|_cc| Ok(Box::new(LesionmarkApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

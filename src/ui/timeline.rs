// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame navigator.
//!
//! Steps through the loaded frames with a slider or previous/next buttons.

/// Display the navigator. Returns the newly requested frame index.
pub fn show(ui: &mut egui::Ui, current: usize, count: usize, label: &str) -> Option<usize> {
    if count == 0 {
        ui.label(egui::RichText::new("No frames loaded").weak());
        return None;
    }

    let mut requested = None;
    ui.horizontal(|ui| {
        if ui.add_enabled(current > 0, egui::Button::new("◀")).clicked() {
            requested = Some(current - 1);
        }

        let mut index = current;
        ui.add(egui::Slider::new(&mut index, 0..=count - 1).show_value(false));
        if index != current {
            requested = Some(index);
        }

        if ui.add_enabled(current + 1 < count, egui::Button::new("▶")).clicked() {
            requested = Some(current + 1);
        }

        ui.separator();
        ui.label(format!("{} / {}", current + 1, count));
        ui.label(egui::RichText::new(label).weak());
    });
    requested
}

/// Frame index after an arrow key press.
pub fn step(current: usize, count: usize, key: egui::Key) -> Option<usize> {
    match key {
        egui::Key::ArrowLeft | egui::Key::ArrowUp if current > 0 => Some(current - 1),
        egui::Key::ArrowRight | egui::Key::ArrowDown if current + 1 < count => Some(current + 1),
        egui::Key::Home if current > 0 => Some(0),
        egui::Key::End if current + 1 < count => Some(count - 1),
        _ => None,
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.

use lesionmark::models::measurement::TargetVariant;

/// Display the toolbar; `active` is the selected target variant, if any.
pub fn show(ui: &mut egui::Ui, active: &mut Option<TargetVariant>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");

        ui.separator();

        if ui.selectable_label(active.is_none(), "⬆ Select").clicked() {
            *active = None;
        }

        for variant in TargetVariant::ALL {
            let text = format!("➚ Target {}", variant.response());
            if ui.selectable_label(*active == Some(variant), text).clicked() {
                *active = Some(variant);
            }
        }

        ui.separator();

        let tool_text = match active {
            None => "Double-click a target to change its location or delete it",
            Some(_) => "Drag from the lesion outwards to place an arrow, Escape cancels",
        };

        ui.label(egui::RichText::new(tool_text).italics().weak());
    });
}

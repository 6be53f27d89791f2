// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Modal lesion location prompt.
//!
//! Requests from the target tools are queued and shown one at a time. The
//! answer is handed back to the app, which routes it to the tool registry.

use lesionmark::tools::{LabelPrompt, PromptKind, PromptRequest, PromptResponse};
use std::collections::VecDeque;

#[derive(Default)]
pub struct PromptDialog {
    queue: VecDeque<PromptRequest>,
    text: String,
    focused: bool,
}

impl LabelPrompt for PromptDialog {
    fn request(&mut self, request: PromptRequest) {
        log::debug!("prompt {:?} for {:?}", request.kind, request.measurement);
        if self.queue.is_empty() {
            self.reset_text(&request);
        }
        self.queue.push_back(request);
    }
}

impl PromptDialog {
    pub fn is_open(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Take every queued request off the dialog, unanswered.
    pub fn take_pending(&mut self) -> Vec<PromptRequest> {
        self.text.clear();
        self.focused = false;
        self.queue.drain(..).collect()
    }

    fn reset_text(&mut self, request: &PromptRequest) {
        self.text = request.current_location.clone().unwrap_or_default();
        self.focused = false;
    }

    /// Show the front request. Returns it with the answer once the user
    /// closes the dialog.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<(PromptRequest, PromptResponse)> {
        let request = self.queue.front()?.clone();
        let title = match request.kind {
            PromptKind::Location => "Enter your lesion location",
            PromptKind::Change => "Change your lesion location",
        };

        let mut answer = None;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Target ({})", request.tool.variant.response()));
                let edit = ui.text_edit_singleline(&mut self.text);
                if !self.focused {
                    edit.request_focus();
                    self.focused = true;
                }
                let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let escaped = ui.input(|i| i.key_pressed(egui::Key::Escape));

                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() || entered {
                        let text = self.text.trim();
                        answer = Some(PromptResponse::Submit((!text.is_empty()).then(|| text.to_string())));
                    }
                    if ui.button("Cancel").clicked() || escaped {
                        answer = Some(PromptResponse::Cancel);
                    }
                    if request.kind == PromptKind::Change
                        && ui
                            .button(egui::RichText::new("Delete").color(egui::Color32::LIGHT_RED))
                            .clicked()
                    {
                        answer = Some(PromptResponse::Delete);
                    }
                });
            });

        let answer = answer?;
        self.queue.pop_front();
        if let Some(next) = self.queue.front().cloned() {
            self.reset_text(&next);
        }
        Some((request, answer))
    }
}

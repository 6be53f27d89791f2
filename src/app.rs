// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The viewer is the host of the target tools: it owns the frames, the
//! annotation store and the label prompt, turns egui input into tool events
//! and runs the render pass over the displayed frame every update.

use crate::ui::canvas::{self, CanvasAction};
use crate::ui::prompt::PromptDialog;
use crate::ui::viewport::{ViewerViewport, MAIN_ELEMENT};
use crate::ui::{timeline, toolbar};
use lesionmark::config::ToolConfiguration;
use lesionmark::io::media::{self, FrameCatalog, LoadedFrame};
use lesionmark::io::serialization;
use lesionmark::models::measurement::{Measurement, TargetVariant};
use lesionmark::models::project::ProjectData;
use lesionmark::tools::{
    EditOutcome, GestureOutcome, InputModality, Key, PromptResolution, PromptResponse, StoreKey, ToolContext,
    ToolRegistry, ToolStateStore,
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

/// Result of background frame loading.
struct LoadedData {
    frames: Vec<LoadedFrame>,
    /// Measurements of an imported project
    measurements: Option<Vec<Measurement>>,
}

/// The parts of the app the tools borrow for each event.
#[derive(Default)]
struct Host {
    viewport: ViewerViewport,
    store: ToolStateStore,
    catalog: FrameCatalog,
    prompt: PromptDialog,
}

impl Host {
    fn tool_context(&mut self) -> ToolContext<'_> {
        ToolContext {
            viewport: &mut self.viewport,
            store: &mut self.store,
            metadata: &self.catalog,
            prompt: &mut self.prompt,
        }
    }
}

/// Main application state.
pub struct LesionmarkApp {
    registry: ToolRegistry,
    host: Host,

    /// Tool selected in the toolbar
    selected_tool: Option<TargetVariant>,

    /// Modality of the press that started the current pointer gesture
    press_modality: Option<InputModality>,

    /// Canvas panel size of the previous update
    canvas_size: egui::Vec2,

    /// Receiver for background frame loading
    frame_loader: Option<Receiver<Result<LoadedData, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Last load/save error shown in the status bar
    last_error: Option<String>,
}

impl LesionmarkApp {
    pub fn new(config: ToolConfiguration) -> Self {
        Self {
            registry: ToolRegistry::new(config),
            host: Host::default(),
            selected_tool: None,
            press_modality: None,
            canvas_size: egui::Vec2::ZERO,
            frame_loader: None,
            loading_message: None,
            last_error: None,
        }
    }

    /// Load frames from files and folders (asynchronously).
    fn load_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        let (sender, receiver) = channel();
        self.frame_loader = Some(receiver);
        self.loading_message = Some("Loading frames...".to_string());

        std::thread::spawn(move || {
            let result = media::load_frames(&paths)
                .map(|frames| LoadedData {
                    frames,
                    measurements: None,
                })
                .map_err(|e| format!("{:#}", e));
            let _ = sender.send(result);
        });
    }

    /// Import annotations and load the frames they reference (asynchronously).
    fn import_annotations(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.frame_loader = Some(receiver);
        self.loading_message = Some("Loading annotations and frames...".to_string());

        std::thread::spawn(move || {
            let result = (|| -> anyhow::Result<LoadedData> {
                let project = serialization::import(&path)?;
                log::info!(
                    "Imported {} measurement(s) from {}",
                    project.measurements.len(),
                    path.display()
                );
                let frame_paths: Vec<PathBuf> = project.frames.iter().map(|f| PathBuf::from(&f.path)).collect();
                let frames = media::load_frames(&frame_paths)?;
                Ok(LoadedData {
                    frames,
                    measurements: Some(project.measurements),
                })
            })()
            .map_err(|e| format!("{:#}", e));
            let _ = sender.send(result);
        });
    }

    /// Export the loaded frames and all measurements.
    fn export_annotations(&mut self, path: &Path) {
        let data = ProjectData::new(self.host.viewport.frames().to_vec(), self.host.store.all());
        match serialization::export(&data, path) {
            Ok(()) => log::info!("Exported {} measurement(s) to {}", data.measurements.len(), path.display()),
            Err(e) => {
                log::error!("Failed to export annotations: {:#}", e);
                self.last_error = Some(format!("{:#}", e));
            }
        }
    }

    fn poll_loader(&mut self, ctx: &egui::Context) {
        let Some(ref receiver) = self.frame_loader else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.frame_loader = None;
        self.loading_message = None;

        match result {
            Ok(data) => self.apply_loaded(ctx, data),
            Err(e) => {
                log::error!("Failed to load frames: {}", e);
                self.last_error = Some(e);
            }
        }
    }

    /// Replace the session with freshly loaded frames.
    fn apply_loaded(&mut self, ctx: &egui::Context, data: LoadedData) {
        // Unanswered prompts refer to the outgoing session; settle them first
        for request in self.host.prompt.take_pending() {
            let resolution = self
                .registry
                .resolve_prompt(&mut self.host.tool_context(), &request, PromptResponse::Cancel);
            log::debug!("dropped prompt for {:?}: {:?}", request.measurement, resolution);
        }
        self.host.catalog = FrameCatalog::from_frames(data.frames.iter().map(|f| &f.info));
        self.host.viewport.set_frames(ctx, data.frames);
        match data.measurements {
            Some(measurements) => self.host.store.replace_all(MAIN_ELEMENT, measurements),
            None => self.host.store.clear(),
        }
        self.last_error = None;
        log::info!(
            "{} frame(s), {} measurement(s) loaded",
            self.host.viewport.frame_count(),
            self.host.store.len()
        );

        if let Some(image_id) = self.host.viewport.current_frame().map(|f| f.image_id.clone()) {
            self.registry
                .frame_rendered(&mut self.host.tool_context(), MAIN_ELEMENT, &image_id);
        }
    }

    /// Display frame `index` and report the change to the tools.
    fn show_frame(&mut self, index: usize) {
        let Some(image_id) = self.host.viewport.show_index(index) else {
            return;
        };
        let outcomes = self
            .registry
            .frame_rendered(&mut self.host.tool_context(), MAIN_ELEMENT, &image_id);
        for outcome in outcomes {
            log::debug!("frame change: {:?}", outcome);
        }
    }

    fn handle_canvas_action(&mut self, action: CanvasAction) {
        match action {
            CanvasAction::Press { at, which, modality } => {
                let Some(event) = self.host.viewport.pointer_event(at, which) else {
                    return;
                };
                self.press_modality = Some(modality);
                let outcome = self
                    .registry
                    .pointer_down(&mut self.host.tool_context(), modality, &event);
                log::debug!("press at ({:.1}, {:.1}): {:?}", at.x, at.y, outcome);
            }
            CanvasAction::Drag(at) => {
                let (Some(modality), Some(event)) = (self.press_modality, self.host.viewport.pointer_event(at, 1))
                else {
                    return;
                };
                self.registry
                    .pointer_drag(&mut self.host.tool_context(), modality, &event);
            }
            CanvasAction::Release(at) => {
                let (Some(modality), Some(event)) =
                    (self.press_modality.take(), self.host.viewport.pointer_event(at, 1))
                else {
                    return;
                };
                let outcome = self
                    .registry
                    .pointer_up(&mut self.host.tool_context(), modality, &event);
                log::debug!("release: {:?}", outcome);
            }
            CanvasAction::DoubleClick { at, which } => {
                let Some(event) = self.host.viewport.pointer_event(at, which) else {
                    return;
                };
                if let EditOutcome::Opened(id) = self
                    .registry
                    .double_activate(&mut self.host.tool_context(), &event)
                {
                    log::info!("Editing {:?}", id);
                }
            }
            CanvasAction::Resized => {
                self.registry
                    .viewport_resized(&mut self.host.tool_context(), MAIN_ELEMENT);
            }
        }
    }

    /// Keys go to the active tool first; navigation only sees keys the tool
    /// left alone.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() || self.host.prompt.is_open() {
            return;
        }
        let keys: Vec<egui::Key> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key { key, pressed: true, .. } => Some(*key),
                    _ => None,
                })
                .collect()
        });

        for key in keys {
            let tool_key = if key == egui::Key::Escape { Key::Escape } else { Key::Other };
            let outcome = self
                .registry
                .key_down(&mut self.host.tool_context(), MAIN_ELEMENT, tool_key);
            if outcome != GestureOutcome::Ignored {
                continue;
            }
            let viewport = &self.host.viewport;
            if let Some(index) = timeline::step(viewport.current_index(), viewport.frame_count(), key) {
                self.show_frame(index);
            }
        }
    }

    fn handle_prompt(&mut self, ctx: &egui::Context) {
        let Some((request, response)) = self.host.prompt.show(ctx) else {
            return;
        };
        let resolution = self
            .registry
            .resolve_prompt(&mut self.host.tool_context(), &request, response);
        if let PromptResolution::Gesture(GestureOutcome::Committed(id)) = resolution {
            let key = StoreKey::new(request.element, request.image_id.clone(), request.tool.variant.tool_type());
            if let Some(number) = self.host.store.assign_next_number(&key, id) {
                log::info!("{:?} is target {}", id, number);
            }
        }
    }

    fn show_menu(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Load Files...").clicked() {
                    if let Some(paths) = rfd::FileDialog::new()
                        .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "tiff", "tif"])
                        .pick_files()
                    {
                        self.load_paths(paths);
                    }
                    ui.close_menu();
                }
                if ui.button("Load Folder...").clicked() {
                    if let Some(path) = rfd::FileDialog::new().pick_folder() {
                        self.load_paths(vec![path]);
                    }
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Load Annotations...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Annotations", &["yaml", "yml", "json"])
                        .pick_file()
                    {
                        self.import_annotations(path);
                    }
                    ui.close_menu();
                }
                let can_export = self.host.viewport.frame_count() > 0;
                ui.add_enabled_ui(can_export, |ui| {
                    ui.menu_button("Export Annotations", |ui| {
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("targets.yaml")
                                .save_file()
                            {
                                self.export_annotations(&path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("targets.json")
                                .save_file()
                            {
                                self.export_annotations(&path);
                            }
                            ui.close_menu();
                        }
                    });
                });
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
        });
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            match self.selected_tool {
                Some(variant) => ui.label(format!("Current tool: {}", variant.tool_type().name())),
                None => ui.label("Current tool: none"),
            };
            ui.separator();
            ui.label(format!("{} target(s)", self.host.store.len()));
            if let Some(ref error) = self.last_error {
                ui.separator();
                ui.label(egui::RichText::new(error).color(egui::Color32::LIGHT_RED));
            }
        });
    }
}

impl eframe::App for LesionmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader(ctx);

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        let dropped: Vec<PathBuf> = ctx.input(|i| i.raw.dropped_files.iter().filter_map(|f| f.path.clone()).collect());
        if !dropped.is_empty() {
            log::info!("{} item(s) dropped", dropped.len());
            self.load_paths(dropped);
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| self.show_menu(ctx, ui));

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar::show(ui, &mut self.selected_tool);
        });
        if self.selected_tool != self.registry.active() {
            self.registry
                .activate(&mut self.host.tool_context(), self.selected_tool);
        }

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.show_status(ui));

        let requested = egui::TopBottomPanel::bottom("navigator")
            .show(ctx, |ui| {
                let viewport = &self.host.viewport;
                let label = viewport.current_frame().map(|f| f.path.as_str()).unwrap_or_default();
                timeline::show(ui, viewport.current_index(), viewport.frame_count(), label)
            })
            .inner;
        if let Some(index) = requested {
            self.show_frame(index);
        }

        self.handle_keys(ctx);

        let (actions, overlay) = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    (Vec::new(), None)
                } else {
                    canvas::show(ui, &mut self.host.viewport, &mut self.canvas_size)
                }
            })
            .inner;

        // The prompt is modal
        if !self.host.prompt.is_open() {
            for action in actions {
                self.handle_canvas_action(action);
            }
        }

        if let Some(mut overlay) = overlay {
            self.registry
                .render(&self.host.viewport, &mut self.host.store, &mut overlay, MAIN_ELEMENT);
        }

        self.handle_prompt(ctx);

        if self.host.viewport.take_redraw_request() {
            ctx.request_repaint();
        }
    }
}

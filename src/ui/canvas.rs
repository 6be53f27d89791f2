// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for frame display and target annotation.
//!
//! Shows the current frame fitted to the panel, turns raw pointer and touch
//! input into [`CanvasAction`]s in canvas coordinates, and provides the
//! painter-backed [`Canvas`] the target tools render through.

use super::viewport::ViewerViewport;
use lesionmark::config::{Rgba, TextBoxConfig};
use lesionmark::models::measurement::{Point, Rect};
use lesionmark::tools::{Canvas, InputModality, StrokeStyle};
use lesionmark::util::geometry::FrameTransform;

/// Result of canvas interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    Press {
        at: Point,
        which: u8,
        modality: InputModality,
    },
    Drag(Point),
    Release(Point),
    DoubleClick {
        at: Point,
        which: u8,
    },
    Resized,
}

/// Display the current frame and collect this frame's interactions.
///
/// Returns the actions and a canvas for the overlay pass, if a frame is shown.
pub fn show(
    ui: &mut egui::Ui,
    viewport: &mut ViewerViewport,
    last_size: &mut egui::Vec2,
) -> (Vec<CanvasAction>, Option<EguiCanvas>) {
    let mut actions = Vec::new();
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let (panel, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    if panel.size() != *last_size {
        if *last_size != egui::Vec2::ZERO {
            actions.push(CanvasAction::Resized);
        }
        *last_size = panel.size();
    }
    ui.painter().rect_filled(panel, 0.0, egui::Color32::from_gray(40));

    let Some((width, height, texture)) = viewport
        .current_frame()
        .zip(viewport.current_texture())
        .map(|(frame, texture)| (frame.width, frame.height, texture.id()))
    else {
        welcome(ui, panel);
        return (actions, None);
    };

    let canvas_rect = Rect::new(0.0, 0.0, panel.width() as f64, panel.height() as f64);
    viewport.transform = FrameTransform::fit(width, height, &canvas_rect);

    let top_left = to_screen(panel, viewport.transform.pixel_to_canvas(Point::new(0.0, 0.0)));
    let bottom_right = to_screen(
        panel,
        viewport
            .transform
            .pixel_to_canvas(Point::new(width as f64, height as f64)),
    );
    ui.painter().image(
        texture,
        egui::Rect::from_min_max(top_left, bottom_right),
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    let (pressed, released, down, moved, pos, touching) = ui.input(|i| {
        (
            i.pointer.button_pressed(egui::PointerButton::Primary)
                || i.pointer.button_pressed(egui::PointerButton::Secondary),
            i.pointer.any_released(),
            i.pointer.any_down(),
            i.pointer.delta() != egui::Vec2::ZERO,
            i.pointer.latest_pos(),
            i.any_touches(),
        )
    });
    let which = ui.input(|i| {
        let secondary = egui::PointerButton::Secondary;
        if i.pointer.button_down(secondary) || i.pointer.button_released(secondary) {
            3
        } else {
            1
        }
    });
    let modality = if touching { InputModality::Touch } else { InputModality::Mouse };

    if let Some(pos) = pos {
        let at = to_canvas(panel, pos);
        if pressed && response.hovered() {
            actions.push(CanvasAction::Press { at, which, modality });
        } else if down && moved {
            actions.push(CanvasAction::Drag(at));
        }
        if released {
            actions.push(CanvasAction::Release(at));
        }
        if response.double_clicked() {
            actions.push(CanvasAction::DoubleClick { at, which: 1 });
        } else if response.double_clicked_by(egui::PointerButton::Secondary) {
            actions.push(CanvasAction::DoubleClick { at, which: 3 });
        }
    }

    let painter = ui.painter_at(panel);
    (actions, Some(EguiCanvas::new(painter, panel)))
}

fn welcome(ui: &mut egui::Ui, panel: egui::Rect) {
    let painter = ui.painter_at(panel);
    painter.text(
        panel.center() - egui::vec2(0.0, 20.0),
        egui::Align2::CENTER_CENTER,
        "LESIONMARK",
        egui::FontId::proportional(32.0),
        egui::Color32::from_gray(200),
    );
    painter.text(
        panel.center() + egui::vec2(0.0, 20.0),
        egui::Align2::CENTER_CENTER,
        "Drop frames here, or File → Load Files...",
        egui::FontId::proportional(14.0),
        egui::Color32::from_gray(150),
    );
}

fn to_screen(panel: egui::Rect, point: Point) -> egui::Pos2 {
    egui::pos2(panel.min.x + point.x as f32, panel.min.y + point.y as f32)
}

fn to_canvas(panel: egui::Rect, pos: egui::Pos2) -> Point {
    Point::new((pos.x - panel.min.x) as f64, (pos.y - panel.min.y) as f64)
}

fn color32(color: Rgba) -> egui::Color32 {
    let [r, g, b, a] = color.0;
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn stroke(style: &StrokeStyle) -> egui::Stroke {
    egui::Stroke::new(style.width as f32, color32(style.color))
}

/// Overlay canvas over an egui painter, clipped to the panel.
pub struct EguiCanvas {
    painter: egui::Painter,
    panel: egui::Rect,
}

impl EguiCanvas {
    pub fn new(painter: egui::Painter, panel: egui::Rect) -> Self {
        Self { painter, panel }
    }

    fn screen_points(&self, points: &[Point]) -> Vec<egui::Pos2> {
        points.iter().map(|p| to_screen(self.panel, *p)).collect()
    }

    fn layout(&self, lines: &[String], font_size: f64, color: egui::Color32) -> std::sync::Arc<egui::Galley> {
        self.painter
            .layout_no_wrap(lines.join("\n"), egui::FontId::proportional(font_size as f32), color)
    }
}

impl Canvas for EguiCanvas {
    fn size(&self) -> (f64, f64) {
        (self.panel.width() as f64, self.panel.height() as f64)
    }

    fn stroke_path(&mut self, points: &[Point], style: &StrokeStyle) {
        let points = self.screen_points(points);
        match style.dash {
            Some([dash, gap]) => {
                self.painter
                    .extend(egui::Shape::dashed_line(&points, stroke(style), dash as f32, gap as f32));
            }
            None => {
                self.painter.add(egui::Shape::line(points, stroke(style)));
            }
        }
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        let points = self.screen_points(points);
        self.painter
            .add(egui::Shape::convex_polygon(points, color32(color), egui::Stroke::NONE));
    }

    fn draw_handle(&mut self, center: Point, radius: f64, style: &StrokeStyle) {
        self.painter
            .circle_stroke(to_screen(self.panel, center), radius as f32, stroke(style));
    }

    fn measure_text(&self, lines: &[String], font_size: f64) -> (f64, f64) {
        let size = self.layout(lines, font_size, egui::Color32::WHITE).size();
        (size.x as f64, size.y as f64)
    }

    fn draw_text_box(&mut self, lines: &[String], bounds: &Rect, color: Rgba, config: &TextBoxConfig) {
        let rect = egui::Rect::from_min_size(
            to_screen(self.panel, bounds.top_left()),
            egui::vec2(bounds.width as f32, bounds.height as f32),
        );
        self.painter.rect_filled(rect, 2.0, egui::Color32::from_black_alpha(160));

        let color = color32(color);
        let galley = self.layout(lines, config.font_size, color);
        let origin = rect.min + egui::vec2(config.padding as f32, config.padding as f32);
        self.painter.galley(origin, galley, color);
    }
}

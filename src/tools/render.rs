// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Render pass for qualitative targets.
//!
//! Draws every target stored for the displayed frame: the arrow (tip on the
//! start handle), hover or always-on handles, and for numbered targets the
//! label box with a dashed leader line back to the arrow.

use super::host::{Canvas, ElementId, StrokeStyle, Viewport};
use super::state::{AnnotationStore, StoreKey};
use crate::config::{TextBoxConfig, ToolConfiguration};
use crate::models::measurement::{Measurement, Point, Rect, ToolType};
use crate::util::geometry::{closest_point, midpoint};
use std::f64::consts::PI;

/// Half-angle between the shaft and each side of the arrow head.
pub const ARROW_HEAD_ANGLE: f64 = PI / 7.0;

/// The two side points of an arrow head whose tip is `tip`, for a shaft
/// coming from `tail`.
pub fn arrow_head(tail: Point, tip: Point, length: f64) -> [Point; 2] {
    let angle = (tip.y - tail.y).atan2(tip.x - tail.x);
    let side = |a: f64| Point::new(tip.x - length * a.cos(), tip.y - length * a.sin());
    [side(angle - ARROW_HEAD_ANGLE), side(angle + ARROW_HEAD_ANGLE)]
}

/// Label box around `anchor` for a padded text extent.
pub fn text_box_bounds(anchor: Point, text_size: (f64, f64), config: &TextBoxConfig) -> Rect {
    let width = text_size.0 + 2.0 * config.padding;
    let height = text_size.1 + 2.0 * config.padding;
    let left = if config.centering_x { anchor.x - width / 2.0 } else { anchor.x };
    let top = if config.centering_y { anchor.y - height / 2.0 } else { anchor.y };
    Rect::new(left, top, width, height)
}

/// Shift `bounds` so it stays `margin` inside a canvas of `canvas_size`.
/// Boxes larger than the canvas stick to the top-left margin.
pub fn keep_on_canvas(bounds: Rect, canvas_size: (f64, f64), margin: f64) -> Rect {
    let max_left = (canvas_size.0 - bounds.width - margin).max(margin);
    let max_top = (canvas_size.1 - bounds.height - margin).max(margin);
    Rect {
        left: bounds.left.clamp(margin, max_left),
        top: bounds.top.clamp(margin, max_top),
        ..bounds
    }
}

/// Leader line from the arrow to its label: the start is whichever of arrow
/// start, end or midpoint lies nearest the label anchor; the end is the
/// label edge midpoint nearest that start.
pub fn leader_line(start: Point, end: Point, anchor: Point, label: &Rect) -> Option<(Point, Point)> {
    let from = closest_point(&[start, end, midpoint(start, end)], anchor)?;
    let to = closest_point(&label.edge_midpoints(), from)?;
    Some((from, to))
}

/// Draw all targets of `tool_type` on the frame shown by `element`.
/// Missing data draws nothing.
pub fn render_targets(
    viewport: &dyn Viewport,
    store: &mut dyn AnnotationStore,
    config: &ToolConfiguration,
    canvas: &mut dyn Canvas,
    element: ElementId,
    tool_type: ToolType,
) {
    let Some(image_id) = viewport.current_image_id(element) else {
        return;
    };
    let key = StoreKey::new(element, image_id, tool_type);

    for measurement in store.query_mut(&key).iter_mut() {
        if measurement.visible {
            draw_target(viewport, element, config, canvas, measurement);
        }
    }
}

fn draw_target(
    viewport: &dyn Viewport,
    element: ElementId,
    config: &ToolConfiguration,
    canvas: &mut dyn Canvas,
    measurement: &mut Measurement,
) {
    let color = if measurement.active {
        config.active_color
    } else {
        config.tool_color
    };
    let stroke = StrokeStyle::solid(color, config.line_width);

    let start = viewport.pixel_to_canvas(element, measurement.handles.start.point());
    let end = viewport.pixel_to_canvas(element, measurement.handles.end.point());
    let mut anchor = viewport.pixel_to_canvas(element, measurement.handles.text_box.point());

    let [left_wing, right_wing] = arrow_head(end, start, config.arrow_head_length);
    canvas.stroke_path(&[end, start], &stroke);
    canvas.stroke_path(&[start, left_wing, right_wing, start], &stroke);
    canvas.fill_polygon(&[start, left_wing, right_wing], color);

    let handles = &measurement.handles;
    if config.draw_handles {
        canvas.draw_handle(start, config.handle_radius, &stroke);
        canvas.draw_handle(end, config.handle_radius, &stroke);
    } else if config.draw_handles_on_hover && handles.start.active {
        canvas.draw_handle(start, config.handle_radius, &stroke);
    } else if config.draw_handles_on_hover && handles.end.active {
        canvas.draw_handle(end, config.handle_radius, &stroke);
    }

    let Some(lines) = measurement.label_lines() else {
        return;
    };

    let text_size = canvas.measure_text(&lines, config.text_box.font_size);
    let placed = text_box_bounds(anchor, text_size, &config.text_box);
    let bounds = keep_on_canvas(placed, canvas.size(), config.text_box.margin);
    if bounds != placed {
        anchor = Point::new(anchor.x + bounds.left - placed.left, anchor.y + bounds.top - placed.top);
        measurement
            .handles
            .text_box
            .set_point(viewport.canvas_to_pixel(element, anchor));
    }
    measurement.handles.text_box.bounding_box = Some(bounds);
    canvas.draw_text_box(&lines, &bounds, color, &config.text_box);

    if let Some((from, to)) = leader_line(start, end, anchor, &bounds) {
        canvas.stroke_path(
            &[from, to],
            &StrokeStyle::dashed(color, config.line_width, config.leader_dash),
        );
    }
}

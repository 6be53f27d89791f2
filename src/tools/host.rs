// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interfaces of the host rendering engine.
//!
//! The target tools never own a window, an image or a dialog. Everything
//! they need from the outside world comes through the traits in this module:
//! the viewport showing a frame, the frame metadata source, the label prompt
//! and a 2D canvas for the render pass.

use super::state::AnnotationStore;
use crate::config::{Rgba, TextBoxConfig};
use crate::models::measurement::{FrameMetadata, Handles, MeasurementId, Point, Rect, TargetVariant};

/// Identifies one viewport element of the host.
pub type ElementId = u32;

/// Which family of input events drives a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputModality {
    Mouse,
    Touch,
}

/// A pointer or touch event, already resolved to both coordinate spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub element: ElementId,
    /// Frame displayed when the event happened
    pub image_id: String,
    pub image: Point,
    pub canvas: Point,
    /// Mouse button (1 = primary, 2 = middle, 3 = secondary); 0 for touch
    pub which: u8,
}

/// Keys the tools care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// The displayed frame of each element and its coordinate mapping.
pub trait Viewport {
    fn current_image_id(&self, element: ElementId) -> Option<&str>;

    fn display_frame(&mut self, element: ElementId, image_id: &str);

    fn pixel_to_canvas(&self, element: ElementId, point: Point) -> Point;

    fn canvas_to_pixel(&self, element: ElementId, point: Point) -> Point;

    /// Columns and rows of the displayed frame.
    fn frame_size(&self, element: ElementId) -> Option<(f64, f64)>;

    fn request_redraw(&mut self, element: ElementId);

    /// Whether a handle lies outside the region it is allowed in.
    fn is_handle_outside_frame(&self, element: ElementId, point: Point, allowed_outside: bool) -> bool {
        if allowed_outside {
            return false;
        }
        match self.frame_size(element) {
            Some((columns, rows)) => point.x < 0.0 || point.y < 0.0 || point.x > columns || point.y > rows,
            None => true,
        }
    }

    fn any_handles_outside_frame(&self, element: ElementId, handles: &Handles) -> bool {
        self.is_handle_outside_frame(element, handles.start.point(), handles.start.allowed_outside_frame)
            || self.is_handle_outside_frame(element, handles.end.point(), handles.end.allowed_outside_frame)
            || self.is_handle_outside_frame(
                element,
                handles.text_box.point(),
                handles.text_box.allowed_outside_frame,
            )
    }
}

/// Resolves series and study identifiers for a frame.
pub trait MetadataProvider {
    fn frame_metadata(&self, image_id: &str) -> Option<FrameMetadata>;
}

/// Registered name of a tool: one variant driven by one input modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToolName {
    pub variant: TargetVariant,
    pub modality: InputModality,
}

impl ToolName {
    pub fn name(&self) -> String {
        let base = self.variant.tool_type().name();
        match self.modality {
            InputModality::Mouse => base.to_string(),
            InputModality::Touch => format!("{}Touch", base),
        }
    }
}

/// Correlates a prompt request with its later response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PromptTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Location entry for a freshly placed target
    Location,
    /// Relabel or delete an existing target
    Change,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub ticket: PromptTicket,
    pub kind: PromptKind,
    pub tool: ToolName,
    pub element: ElementId,
    pub image_id: String,
    pub measurement: MeasurementId,
    pub current_location: Option<String>,
}

/// What the user answered. `Delete` on a location prompt discards the target.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptResponse {
    Submit(Option<String>),
    Cancel,
    Delete,
}

/// Pluggable asynchronous label prompt. The request is answered later
/// through the tool registry, possibly never.
pub trait LabelPrompt {
    fn request(&mut self, request: PromptRequest);
}

/// Stroke of a path; `dash` holds dash and gap lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f64,
    pub dash: Option<[f64; 2]>,
}

impl StrokeStyle {
    pub fn solid(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgba, width: f64, dash: [f64; 2]) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

/// 2D drawing surface in canvas coordinates.
pub trait Canvas {
    /// Width and height of the drawable area.
    fn size(&self) -> (f64, f64);

    fn stroke_path(&mut self, points: &[Point], style: &StrokeStyle);

    fn fill_polygon(&mut self, points: &[Point], color: Rgba);

    fn draw_handle(&mut self, center: Point, radius: f64, style: &StrokeStyle);

    /// Extent of the text lines without padding.
    fn measure_text(&self, lines: &[String], font_size: f64) -> (f64, f64);

    /// Draw the text lines inside `bounds` (padding included).
    fn draw_text_box(&mut self, lines: &[String], bounds: &Rect, color: Rgba, config: &TextBoxConfig);
}

/// Everything a gesture needs from the host, borrowed for one event.
pub struct ToolContext<'a> {
    pub viewport: &'a mut dyn Viewport,
    pub store: &'a mut dyn AnnotationStore,
    pub metadata: &'a dyn MetadataProvider,
    pub prompt: &'a mut dyn LabelPrompt,
}

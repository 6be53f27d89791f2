// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory host used by the tool tests.

use super::host::{
    Canvas, ElementId, LabelPrompt, MetadataProvider, PointerEvent, PromptRequest, StrokeStyle, ToolContext,
    Viewport,
};
use super::state::ToolStateStore;
use crate::config::{Rgba, TextBoxConfig};
use crate::models::measurement::{FrameMetadata, Point, Rect};
use crate::util::geometry::FrameTransform;
use std::collections::HashMap;

pub const ELEMENT: ElementId = 0;
pub const FRAME_A: &str = "frame-a";
pub const FRAME_B: &str = "frame-b";

pub struct FakeViewport {
    pub current: String,
    /// Every frame passed to `display_frame`, in order
    pub displayed: Vec<String>,
    pub redraws: usize,
    pub transform: FrameTransform,
    pub size: (f64, f64),
}

impl Viewport for FakeViewport {
    fn current_image_id(&self, _element: ElementId) -> Option<&str> {
        Some(&self.current)
    }

    fn display_frame(&mut self, _element: ElementId, image_id: &str) {
        self.current = image_id.to_string();
        self.displayed.push(image_id.to_string());
    }

    fn pixel_to_canvas(&self, _element: ElementId, point: Point) -> Point {
        self.transform.pixel_to_canvas(point)
    }

    fn canvas_to_pixel(&self, _element: ElementId, point: Point) -> Point {
        self.transform.canvas_to_pixel(point)
    }

    fn frame_size(&self, _element: ElementId) -> Option<(f64, f64)> {
        Some(self.size)
    }

    fn request_redraw(&mut self, _element: ElementId) {
        self.redraws += 1;
    }
}

#[derive(Default)]
pub struct FakeMetadata {
    pub frames: HashMap<String, FrameMetadata>,
}

impl MetadataProvider for FakeMetadata {
    fn frame_metadata(&self, image_id: &str) -> Option<FrameMetadata> {
        self.frames.get(image_id).cloned()
    }
}

#[derive(Default)]
pub struct RecordingPrompt {
    pub requests: Vec<PromptRequest>,
}

impl LabelPrompt for RecordingPrompt {
    fn request(&mut self, request: PromptRequest) {
        self.requests.push(request);
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Path(Vec<Point>, StrokeStyle),
    Fill(Vec<Point>, Rgba),
    Handle(Point),
    Text(Vec<String>, Rect, Rgba),
}

/// Canvas that records calls. Text measures 8 px per character and 10 px
/// per line.
pub struct RecordingCanvas {
    pub size: (f64, f64),
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: (width, height),
            ops: Vec::new(),
        }
    }

    pub fn dashed_paths(&self) -> Vec<&Vec<Point>> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Path(points, style) if style.dash.is_some() => Some(points),
                _ => None,
            })
            .collect()
    }

    pub fn handles(&self) -> Vec<Point> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Handle(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<(&Vec<String>, &Rect)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(lines, rect, _) => Some((lines, rect)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (f64, f64) {
        self.size
    }

    fn stroke_path(&mut self, points: &[Point], style: &StrokeStyle) {
        self.ops.push(DrawOp::Path(points.to_vec(), *style));
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        self.ops.push(DrawOp::Fill(points.to_vec(), color));
    }

    fn draw_handle(&mut self, center: Point, _radius: f64, _style: &StrokeStyle) {
        self.ops.push(DrawOp::Handle(center));
    }

    fn measure_text(&self, lines: &[String], _font_size: f64) -> (f64, f64) {
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f64 * 8.0;
        (width, lines.len() as f64 * 10.0)
    }

    fn draw_text_box(&mut self, lines: &[String], bounds: &Rect, color: Rgba, _config: &TextBoxConfig) {
        self.ops.push(DrawOp::Text(lines.to_vec(), *bounds, color));
    }
}

/// A 512x512 frame `FRAME_A` shown 1:1 on element `ELEMENT`, with metadata
/// for `FRAME_A` and `FRAME_B`.
pub struct Harness {
    pub viewport: FakeViewport,
    pub store: ToolStateStore,
    pub metadata: FakeMetadata,
    pub prompt: RecordingPrompt,
}

impl Harness {
    pub fn new() -> Self {
        let mut metadata = FakeMetadata::default();
        for frame in [FRAME_A, FRAME_B] {
            metadata.frames.insert(
                frame.to_string(),
                FrameMetadata {
                    series_instance_uid: "series-1".to_string(),
                    study_instance_uid: "study-1".to_string(),
                    patient_id: "patient-1".to_string(),
                },
            );
        }
        Self {
            viewport: FakeViewport {
                current: FRAME_A.to_string(),
                displayed: Vec::new(),
                redraws: 0,
                transform: FrameTransform::default(),
                size: (512.0, 512.0),
            },
            store: ToolStateStore::new(),
            metadata,
            prompt: RecordingPrompt::default(),
        }
    }

    pub fn ctx(&mut self) -> ToolContext<'_> {
        ToolContext {
            viewport: &mut self.viewport,
            store: &mut self.store,
            metadata: &self.metadata,
            prompt: &mut self.prompt,
        }
    }
}

/// Primary-button event at an image position on `FRAME_A`, with canvas
/// coordinates equal to image coordinates.
pub fn event(x: f64, y: f64) -> PointerEvent {
    event_with_canvas(Point::new(x, y), Point::new(x, y))
}

pub fn event_with_canvas(image: Point, canvas: Point) -> PointerEvent {
    PointerEvent {
        element: ELEMENT,
        image_id: FRAME_A.to_string(),
        image,
        canvas,
        which: 1,
    }
}

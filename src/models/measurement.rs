// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Measurement data structures.
//!
//! This module defines the qualitative target annotation: an arrow made of
//! two handles plus a text box, bound to one image frame and its series and
//! study.

use serde::{Deserialize, Serialize};

/// A 2D point. Image-space or canvas-space depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by a delta.
    pub fn offset(self, delta: Point) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Midpoints of the top, left, bottom and right edges, in that order.
    pub fn edge_midpoints(&self) -> [Point; 4] {
        let cx = self.left + self.width / 2.0;
        let cy = self.top + self.height / 2.0;
        [
            Point::new(cx, self.top),
            Point::new(self.left, cy),
            Point::new(cx, self.bottom()),
            Point::new(self.right(), cy),
        ]
    }
}

/// Unique identifier for measurements within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeasurementId(pub u64);

/// The two qualitative target kinds. They differ only in their response text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetVariant {
    /// Complete response
    CR,
    /// Unknown
    UN,
}

impl TargetVariant {
    pub const ALL: [TargetVariant; 2] = [TargetVariant::CR, TargetVariant::UN];

    /// Tool type name as registered with the host.
    pub fn tool_type(self) -> ToolType {
        match self {
            TargetVariant::CR => ToolType::TargetCR,
            TargetVariant::UN => ToolType::TargetUN,
        }
    }

    /// Fixed response text stored on every measurement of this variant.
    pub fn response(self) -> &'static str {
        match self {
            TargetVariant::CR => "CR",
            TargetVariant::UN => "UN",
        }
    }
}

/// Tool type key used by the annotation store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolType {
    TargetCR,
    TargetUN,
}

impl ToolType {
    pub fn name(self) -> &'static str {
        match self {
            ToolType::TargetCR => "targetCR",
            ToolType::TargetUN => "targetUN",
        }
    }
}

/// One draggable end of the arrow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    pub x: f64,
    pub y: f64,
    /// Set while hovered or dragged
    pub active: bool,
    pub highlight: bool,
    pub allowed_outside_frame: bool,
}

impl Handle {
    fn at(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
            active: false,
            highlight: true,
            allowed_outside_frame: false,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_point(&mut self, point: Point) {
        self.x = point.x;
        self.y = point.y;
    }
}

/// Anchor of the label. The bounding box is in canvas space and only known
/// after the label has been rendered once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextBoxHandle {
    pub x: f64,
    pub y: f64,
    pub active: bool,
    pub moves_independently: bool,
    pub drawn_independently: bool,
    pub allowed_outside_frame: bool,
    pub has_bounding_box: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Rect>,
}

impl TextBoxHandle {
    fn at(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
            active: false,
            moves_independently: false,
            drawn_independently: true,
            allowed_outside_frame: true,
            has_bounding_box: true,
            bounding_box: None,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_point(&mut self, point: Point) {
        self.x = point.x;
        self.y = point.y;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handles {
    pub start: Handle,
    pub end: Handle,
    pub text_box: TextBoxHandle,
}

/// Series/study identifiers of a frame, as served by the metadata provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameMetadata {
    pub series_instance_uid: String,
    pub study_instance_uid: String,
    pub patient_id: String,
}

/// A placed qualitative target annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: MeasurementId,
    pub tool_type: ToolType,
    pub handles: Handles,
    /// Fixed classification text of the variant
    pub response: String,
    /// Free-text lesion location supplied by the label prompt
    #[serde(default)]
    pub location: Option<String>,
    pub image_id: String,
    pub series_instance_uid: String,
    pub study_instance_uid: String,
    pub patient_id: String,
    pub is_creating: bool,
    pub visible: bool,
    pub active: bool,
    pub is_target: bool,
    /// Display number assigned by the host once the measurement is persisted
    #[serde(default)]
    pub measurement_number: Option<u32>,
}

impl Measurement {
    /// Create a measurement at `at` (image space) with both arrow handles on
    /// the pointer and the text box shifted by `text_box_offset`.
    pub fn create(
        id: MeasurementId,
        variant: TargetVariant,
        image_id: impl Into<String>,
        metadata: &FrameMetadata,
        at: Point,
        text_box_offset: Point,
    ) -> Self {
        Self {
            id,
            tool_type: variant.tool_type(),
            handles: Handles {
                start: Handle::at(at),
                end: Handle::at(at),
                text_box: TextBoxHandle::at(at.offset(text_box_offset)),
            },
            response: variant.response().to_string(),
            location: None,
            image_id: image_id.into(),
            series_instance_uid: metadata.series_instance_uid.clone(),
            study_instance_uid: metadata.study_instance_uid.clone(),
            patient_id: metadata.patient_id.clone(),
            is_creating: true,
            visible: true,
            active: true,
            is_target: true,
            measurement_number: None,
        }
    }

    /// A zero-length arrow can never be committed.
    pub fn has_extent(&self) -> bool {
        crate::util::geometry::distance(self.handles.start.point(), self.handles.end.point()) > 0.0
    }

    /// Text lines of the rendered label, once a display number exists.
    pub fn label_lines(&self) -> Option<Vec<String>> {
        let number = self.measurement_number?;
        let mut lines = vec![format!("Target {}", number), self.response.clone()];
        if let Some(location) = self.location.as_deref().filter(|l| !l.is_empty()) {
            lines.push(location.to_string());
        }
        Some(lines)
    }
}

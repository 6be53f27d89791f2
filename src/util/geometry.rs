// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Distances, containment and nearest-point selection used by hit-testing
//! and the leader line, plus the mapping between image pixels and canvas
//! coordinates.

use crate::models::measurement::{Point, Rect};

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Midpoint of a segment.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Shortest distance from `point` to the segment `start`-`end`.
pub fn distance_point_to_segment(start: Point, end: Point, point: Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return distance(start, point);
    }

    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq).clamp(0.0, 1.0);
    distance(Point::new(start.x + t * dx, start.y + t * dy), point)
}

/// Inclusive containment test.
pub fn point_in_rect(rect: &Rect, point: Point) -> bool {
    point.x >= rect.left && point.x <= rect.right() && point.y >= rect.top && point.y <= rect.bottom()
}

/// Candidate nearest to `target`. Ties keep the earliest candidate.
pub fn closest_point(candidates: &[Point], target: Point) -> Option<Point> {
    let mut best: Option<(Point, f64)> = None;
    for &candidate in candidates {
        let d = distance(candidate, target);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((candidate, d)),
        }
    }
    best.map(|(p, _)| p)
}

/// True when `point` (canvas space) lies inside the label box or within
/// `tolerance` of the arrow segment (canvas space).
pub fn point_near_arrow(
    start: Point,
    end: Point,
    label_box: Option<&Rect>,
    point: Point,
    tolerance: f64,
) -> bool {
    if label_box.is_some_and(|rect| point_in_rect(rect, point)) {
        return true;
    }
    distance_point_to_segment(start, end, point) < tolerance
}

/// Maps image pixels onto a canvas region where the frame is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    /// Canvas position of image pixel (0, 0)
    pub origin: Point,
    /// Canvas units per image pixel
    pub scale: f64,
}

impl Default for FrameTransform {
    fn default() -> Self {
        Self {
            origin: Point::default(),
            scale: 1.0,
        }
    }
}

impl FrameTransform {
    /// Fit a `width` x `height` frame centered inside `canvas`.
    pub fn fit(width: u32, height: u32, canvas: &Rect) -> Self {
        if width == 0 || height == 0 {
            return Self::default();
        }
        let scale = (canvas.width / width as f64).min(canvas.height / height as f64);
        let display_width = width as f64 * scale;
        let display_height = height as f64 * scale;
        Self {
            origin: Point::new(
                canvas.left + (canvas.width - display_width) / 2.0,
                canvas.top + (canvas.height - display_height) / 2.0,
            ),
            scale,
        }
    }

    pub fn pixel_to_canvas(&self, point: Point) -> Point {
        Point::new(
            self.origin.x + point.x * self.scale,
            self.origin.y + point.y * self.scale,
        )
    }

    pub fn canvas_to_pixel(&self, point: Point) -> Point {
        if self.scale == 0.0 {
            return point;
        }
        Point::new(
            (point.x - self.origin.x) / self.scale,
            (point.y - self.origin.y) / self.scale,
        )
    }
}

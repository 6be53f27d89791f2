// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The viewer's single viewport element.
//!
//! Holds the loaded frames and their textures, which frame is shown, and
//! how image pixels map onto the canvas panel.

use lesionmark::io::media::LoadedFrame;
use lesionmark::models::measurement::Point;
use lesionmark::models::project::FrameInfo;
use lesionmark::tools::{ElementId, PointerEvent, Viewport};
use lesionmark::util::geometry::FrameTransform;

/// The only element the desktop viewer shows.
pub const MAIN_ELEMENT: ElementId = 0;

#[derive(Default)]
pub struct ViewerViewport {
    frames: Vec<FrameInfo>,
    textures: Vec<egui::TextureHandle>,
    current: usize,
    /// Pixel to canvas mapping, canvas origin at the panel's top-left
    pub transform: FrameTransform,
    redraw_requested: bool,
}

impl ViewerViewport {
    /// Replace the loaded frames and upload their textures.
    pub fn set_frames(&mut self, ctx: &egui::Context, frames: Vec<LoadedFrame>) {
        self.textures = frames
            .iter()
            .map(|frame| {
                let size = [frame.info.width as usize, frame.info.height as usize];
                let image = egui::ColorImage::from_rgba_unmultiplied(size, &frame.pixels);
                ctx.load_texture(frame.info.image_id.clone(), image, egui::TextureOptions::LINEAR)
            })
            .collect();
        self.frames = frames.into_iter().map(|f| f.info).collect();
        self.current = 0;
        self.redraw_requested = true;
    }

    pub fn frames(&self) -> &[FrameInfo] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_frame(&self) -> Option<&FrameInfo> {
        self.frames.get(self.current)
    }

    pub fn current_texture(&self) -> Option<&egui::TextureHandle> {
        self.textures.get(self.current)
    }

    /// Show frame `index`, returning its image id if it changed.
    pub fn show_index(&mut self, index: usize) -> Option<String> {
        if index == self.current || index >= self.frames.len() {
            return None;
        }
        self.current = index;
        self.redraw_requested = true;
        Some(self.frames[index].image_id.clone())
    }

    /// Resolve a canvas position on the displayed frame.
    pub fn pointer_event(&self, canvas: Point, which: u8) -> Option<PointerEvent> {
        let frame = self.current_frame()?;
        Some(PointerEvent {
            element: MAIN_ELEMENT,
            image_id: frame.image_id.clone(),
            image: self.transform.canvas_to_pixel(canvas),
            canvas,
            which,
        })
    }

    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}

impl Viewport for ViewerViewport {
    fn current_image_id(&self, _element: ElementId) -> Option<&str> {
        self.current_frame().map(|f| f.image_id.as_str())
    }

    fn display_frame(&mut self, _element: ElementId, image_id: &str) {
        if let Some(index) = self.frames.iter().position(|f| f.image_id == image_id) {
            self.current = index;
            self.redraw_requested = true;
        }
    }

    fn pixel_to_canvas(&self, _element: ElementId, point: Point) -> Point {
        self.transform.pixel_to_canvas(point)
    }

    fn canvas_to_pixel(&self, _element: ElementId, point: Point) -> Point {
        self.transform.canvas_to_pixel(point)
    }

    fn frame_size(&self, _element: ElementId) -> Option<(f64, f64)> {
        self.current_frame().map(|f| (f.width as f64, f.height as f64))
    }

    fn request_redraw(&mut self, _element: ElementId) {
        self.redraw_requested = true;
    }
}

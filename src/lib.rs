// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! LESIONMARK - qualitative target annotations for medical image frames.
//!
//! Arrow-and-label lesion markers placed with a mouse or touch gesture,
//! labelled through a pluggable prompt and redrawn on every frame render.
//! The desktop viewer in `main.rs` hosts these tools on top of egui.

pub mod config;
pub mod io;
pub mod models;
pub mod tools;
pub mod util;

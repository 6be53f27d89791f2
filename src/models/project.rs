// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project state management.
//!
//! A project is the set of loaded frames plus every measurement placed on
//! them, in the shape written to and read from disk.

use super::measurement::{FrameMetadata, Measurement};
use serde::{Deserialize, Serialize};

/// One loaded frame as referenced by measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub image_id: String,
    pub path: String,
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub metadata: FrameMetadata,
}

/// Complete project data for serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    pub frames: Vec<FrameInfo>,
    pub measurements: Vec<Measurement>,
}

impl ProjectData {
    /// Create a new project with the given frames and measurements.
    pub fn new(frames: Vec<FrameInfo>, measurements: Vec<Measurement>) -> Self {
        Self {
            frames,
            measurements,
        }
    }
}

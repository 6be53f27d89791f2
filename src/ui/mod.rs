// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the LESIONMARK viewer.

pub mod canvas;
pub mod prompt;
pub mod timeline;
pub mod toolbar;
pub mod viewport;

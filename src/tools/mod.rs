// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Qualitative target annotation tools.
//!
//! The tools plug into a host that displays frames and dispatches input.
//! [`registry::ToolRegistry`] is the entry point: it owns the registered
//! tools and routes pointer, key, frame and prompt events to them.

pub mod gesture;
pub mod hit_test;
pub mod host;
pub mod registry;
pub mod render;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use gesture::{CancelReason, GestureOutcome, GesturePhase, QualitativeTargetTool};
pub use hit_test::{hit_test, EditOutcome};
pub use host::{
    Canvas, ElementId, InputModality, Key, LabelPrompt, MetadataProvider, PointerEvent, PromptKind, PromptRequest,
    PromptResponse, PromptTicket, StrokeStyle, ToolContext, ToolName, Viewport,
};
pub use registry::{PromptResolution, ToolRegistry};
pub use state::{AnnotationStore, StoreKey, ToolStateStore};

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tool registry.
//!
//! Registers `targetCR`, `targetCRTouch`, `targetUN` and `targetUNTouch`
//! over one shared configuration, and routes host events to them.

use super::gesture::{GestureOutcome, QualitativeTargetTool};
use super::hit_test::EditOutcome;
use super::host::{
    Canvas, ElementId, InputModality, Key, PointerEvent, PromptKind, PromptRequest, PromptResponse, ToolContext,
    Viewport,
};
use super::render::render_targets;
use super::state::AnnotationStore;
use crate::config::ToolConfiguration;
use crate::models::measurement::TargetVariant;
use std::rc::Rc;

/// How a prompt response was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptResolution {
    Gesture(GestureOutcome),
    Edit(EditOutcome),
}

pub struct ToolRegistry {
    config: Rc<ToolConfiguration>,
    tools: Vec<QualitativeTargetTool>,
    active: Option<TargetVariant>,
}

impl ToolRegistry {
    /// Register both target variants, each with a mouse and a touch tool.
    pub fn new(config: ToolConfiguration) -> Self {
        let config = Rc::new(config);
        let mut tools = Vec::new();
        for variant in TargetVariant::ALL {
            for modality in [InputModality::Mouse, InputModality::Touch] {
                tools.push(QualitativeTargetTool::new(variant, modality, Rc::clone(&config)));
            }
        }
        log::debug!("registered {} target tools", tools.len());
        Self {
            config,
            tools,
            active: None,
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().name()).collect()
    }

    pub fn tool(&self, name: &str) -> Option<&QualitativeTargetTool> {
        self.tools.iter().find(|t| t.name().name() == name)
    }

    pub fn configuration(&self) -> &ToolConfiguration {
        &self.config
    }

    /// Replace the configuration shared by every registered tool.
    pub fn set_configuration(&mut self, config: ToolConfiguration) {
        self.config = Rc::new(config);
        for tool in &mut self.tools {
            tool.set_configuration(Rc::clone(&self.config));
        }
    }

    pub fn active(&self) -> Option<TargetVariant> {
        self.active
    }

    /// Switch the active variant. Placements of the previous variant are
    /// cancelled on every element.
    pub fn activate(&mut self, ctx: &mut ToolContext<'_>, variant: Option<TargetVariant>) {
        if self.active == variant {
            return;
        }
        if let Some(previous) = self.active {
            for tool in self.tools.iter_mut().filter(|t| t.name().variant == previous) {
                for element in tool.placing_elements() {
                    tool.deactivated(ctx, element);
                }
            }
        }
        log::info!("active tool: {:?}", variant);
        self.active = variant;
    }

    /// Any tool mid-gesture on `element`.
    pub fn is_busy(&self, element: ElementId) -> bool {
        self.tools.iter().any(|t| t.is_busy(element))
    }

    fn active_tool_mut(&mut self, modality: InputModality) -> Option<&mut QualitativeTargetTool> {
        let variant = self.active?;
        self.tools
            .iter_mut()
            .find(|t| t.name().variant == variant && t.name().modality == modality)
    }

    pub fn pointer_down(
        &mut self,
        ctx: &mut ToolContext<'_>,
        modality: InputModality,
        event: &PointerEvent,
    ) -> GestureOutcome {
        if self.is_busy(event.element) {
            return GestureOutcome::Ignored;
        }
        match self.active_tool_mut(modality) {
            Some(tool) => tool.begin(ctx, event),
            None => GestureOutcome::Ignored,
        }
    }

    pub fn pointer_drag(
        &mut self,
        ctx: &mut ToolContext<'_>,
        modality: InputModality,
        event: &PointerEvent,
    ) -> GestureOutcome {
        match self.active_tool_mut(modality) {
            Some(tool) => tool.drag(ctx, event),
            None => GestureOutcome::Ignored,
        }
    }

    pub fn pointer_up(
        &mut self,
        ctx: &mut ToolContext<'_>,
        modality: InputModality,
        event: &PointerEvent,
    ) -> GestureOutcome {
        match self.active_tool_mut(modality) {
            Some(tool) => tool.release(ctx, event),
            None => GestureOutcome::Ignored,
        }
    }

    pub fn key_down(&mut self, ctx: &mut ToolContext<'_>, element: ElementId, key: Key) -> GestureOutcome {
        match self.active_tool_mut(InputModality::Mouse) {
            Some(tool) => tool.key_down(ctx, element, key),
            None => GestureOutcome::Ignored,
        }
    }

    /// Offer a double activation to each mouse tool in registration order;
    /// the first one that opens a prompt consumes it.
    pub fn double_activate(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> EditOutcome {
        if self.is_busy(event.element) {
            return EditOutcome::Ignored;
        }
        let mut outcome = EditOutcome::Ignored;
        for tool in self
            .tools
            .iter_mut()
            .filter(|t| t.name().modality == InputModality::Mouse)
        {
            match tool.double_activate(ctx, event) {
                opened @ EditOutcome::Opened(_) => return opened,
                EditOutcome::Missed => outcome = EditOutcome::Missed,
                _ => {}
            }
        }
        outcome
    }

    /// Report a rendered frame to every tool.
    pub fn frame_rendered(&mut self, ctx: &mut ToolContext<'_>, element: ElementId, image_id: &str) -> Vec<GestureOutcome> {
        self.tools
            .iter_mut()
            .map(|tool| tool.frame_rendered(ctx, element, image_id))
            .filter(|outcome| *outcome != GestureOutcome::Ignored)
            .collect()
    }

    pub fn viewport_resized(&mut self, ctx: &mut ToolContext<'_>, element: ElementId) {
        for tool in &mut self.tools {
            tool.viewport_resized(ctx, element);
        }
    }

    /// Route a prompt response back to the tool that asked.
    pub fn resolve_prompt(
        &mut self,
        ctx: &mut ToolContext<'_>,
        request: &PromptRequest,
        response: PromptResponse,
    ) -> PromptResolution {
        let Some(tool) = self.tools.iter_mut().find(|t| t.name() == request.tool) else {
            return PromptResolution::Gesture(GestureOutcome::Ignored);
        };
        match request.kind {
            PromptKind::Location => PromptResolution::Gesture(tool.resolve_location(ctx, request.ticket, response)),
            PromptKind::Change => PromptResolution::Edit(tool.resolve_edit(ctx, request.ticket, response)),
        }
    }

    /// Render pass for every variant, once each.
    pub fn render(
        &self,
        viewport: &dyn Viewport,
        store: &mut dyn AnnotationStore,
        canvas: &mut dyn Canvas,
        element: ElementId,
    ) {
        for variant in TargetVariant::ALL {
            render_targets(viewport, store, &self.config, canvas, element, variant.tool_type());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::measurement::{Point, ToolType};
    use crate::tools::gesture::CancelReason;
    use crate::tools::state::StoreKey;
    use crate::tools::testing::{event, Harness, RecordingCanvas, ELEMENT, FRAME_A, FRAME_B};

    fn key(tool_type: ToolType) -> StoreKey {
        StoreKey::new(ELEMENT, FRAME_A, tool_type)
    }

    #[test]
    fn test_registers_four_named_tools() {
        let registry = ToolRegistry::new(ToolConfiguration::default());
        assert_eq!(
            registry.names(),
            vec!["targetCR", "targetCRTouch", "targetUN", "targetUNTouch"]
        );
        let touch = registry.tool("targetUNTouch").unwrap();
        assert_eq!(touch.name().variant, TargetVariant::UN);
        assert_eq!(touch.name().modality, InputModality::Touch);
        assert!(registry.tool("targetXX").is_none());
    }

    #[test]
    fn test_configuration_is_shared() {
        let mut registry = ToolRegistry::new(ToolConfiguration::default());
        registry.set_configuration(ToolConfiguration {
            draw_handles: true,
            ..ToolConfiguration::default()
        });
        for name in registry.names() {
            assert!(registry.tool(&name).unwrap().config().draw_handles);
        }
    }

    #[test]
    fn test_no_active_tool_ignores_pointer() {
        let mut h = Harness::new();
        let mut registry = ToolRegistry::new(ToolConfiguration::default());
        assert_eq!(
            registry.pointer_down(&mut h.ctx(), InputModality::Mouse, &event(10.0, 10.0)),
            GestureOutcome::Ignored
        );
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_end_to_end_lung_nodule() {
        let mut h = Harness::new();
        let mut registry = ToolRegistry::new(ToolConfiguration::default());
        registry.activate(&mut h.ctx(), Some(TargetVariant::CR));

        registry.pointer_down(&mut h.ctx(), InputModality::Mouse, &event(100.0, 100.0));
        registry.pointer_drag(&mut h.ctx(), InputModality::Mouse, &event(150.0, 140.0));
        registry.pointer_up(&mut h.ctx(), InputModality::Mouse, &event(150.0, 140.0));

        let request = h.prompt.requests.pop().unwrap();
        let resolution = registry.resolve_prompt(&mut h.ctx(), &request, PromptResponse::Submit(Some("Lung nodule".into())));
        assert!(matches!(resolution, PromptResolution::Gesture(GestureOutcome::Committed(_))));

        assert_eq!(h.store.len(), 1);
        let m = &h.store.query(&key(ToolType::TargetCR))[0];
        assert_eq!(m.handles.start.point(), Point::new(100.0, 100.0));
        assert_eq!(m.handles.end.point(), Point::new(150.0, 140.0));
        assert_eq!(m.location.as_deref(), Some("Lung nodule"));
        assert!(m.active);
    }

    #[test]
    fn test_cancelling_pending_prompts_frees_element() {
        let mut h = Harness::new();
        let mut registry = ToolRegistry::new(ToolConfiguration::default());
        registry.activate(&mut h.ctx(), Some(TargetVariant::CR));
        registry.pointer_down(&mut h.ctx(), InputModality::Mouse, &event(100.0, 100.0));
        registry.pointer_up(&mut h.ctx(), InputModality::Mouse, &event(150.0, 140.0));
        assert!(registry.is_busy(ELEMENT));

        for request in h.prompt.requests.drain(..).collect::<Vec<_>>() {
            registry.resolve_prompt(&mut h.ctx(), &request, PromptResponse::Cancel);
        }
        assert!(!registry.is_busy(ELEMENT));
        assert!(h.store.is_empty());
        assert!(matches!(
            registry.pointer_down(&mut h.ctx(), InputModality::Mouse, &event(200.0, 200.0)),
            GestureOutcome::Started(_)
        ));
    }

    #[test]
    fn test_switching_tool_cancels_placement() {
        let mut h = Harness::new();
        let mut registry = ToolRegistry::new(ToolConfiguration::default());
        registry.activate(&mut h.ctx(), Some(TargetVariant::CR));
        registry.pointer_down(&mut h.ctx(), InputModality::Mouse, &event(100.0, 100.0));
        assert!(registry.is_busy(ELEMENT));

        registry.activate(&mut h.ctx(), Some(TargetVariant::UN));
        assert!(!registry.is_busy(ELEMENT));
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_one_gesture_per_element_across_variants() {
        let mut h = Harness::new();
        let mut registry = ToolRegistry::new(ToolConfiguration::default());
        registry.activate(&mut h.ctx(), Some(TargetVariant::CR));
        registry.pointer_down(&mut h.ctx(), InputModality::Mouse, &event(100.0, 100.0));

        assert_eq!(
            registry.pointer_down(&mut h.ctx(), InputModality::Touch, &event(200.0, 200.0)),
            GestureOutcome::Ignored
        );
        assert_eq!(h.store.len(), 1);
    }

    #[test]
    fn test_frame_change_reported_to_placing_tool() {
        let mut h = Harness::new();
        let mut registry = ToolRegistry::new(ToolConfiguration::default());
        registry.activate(&mut h.ctx(), Some(TargetVariant::UN));
        registry.pointer_down(&mut h.ctx(), InputModality::Touch, &event(100.0, 100.0));

        h.viewport.current = FRAME_B.to_string();
        let outcomes = registry.frame_rendered(&mut h.ctx(), ELEMENT, FRAME_B);
        assert_eq!(outcomes, vec![GestureOutcome::Cancelled(CancelReason::FrameChanged)]);
        assert_eq!(h.viewport.current, FRAME_B);
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_double_activation_reaches_inactive_variant() {
        let mut h = Harness::new();
        let mut registry = ToolRegistry::new(ToolConfiguration::default());
        registry.activate(&mut h.ctx(), Some(TargetVariant::UN));
        registry.pointer_down(&mut h.ctx(), InputModality::Mouse, &event(100.0, 100.0));
        registry.pointer_up(&mut h.ctx(), InputModality::Mouse, &event(200.0, 100.0));
        let request = h.prompt.requests.pop().unwrap();
        registry.resolve_prompt(&mut h.ctx(), &request, PromptResponse::Submit(None));

        registry.activate(&mut h.ctx(), Some(TargetVariant::CR));
        let outcome = registry.double_activate(&mut h.ctx(), &event(150.0, 105.0));
        assert!(matches!(outcome, EditOutcome::Opened(_)));
        let request = h.prompt.requests.pop().unwrap();
        assert_eq!(request.tool.variant, TargetVariant::UN);

        let resolution = registry.resolve_prompt(&mut h.ctx(), &request, PromptResponse::Delete);
        assert!(matches!(resolution, PromptResolution::Edit(EditOutcome::Deleted(_))));
        assert!(h.store.query(&key(ToolType::TargetUN)).is_empty());

        let mut canvas = RecordingCanvas::new(512.0, 512.0);
        registry.render(&h.viewport, &mut h.store, &mut canvas, ELEMENT);
        assert!(canvas.ops.is_empty());
    }
}

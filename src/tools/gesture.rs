// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Placement gesture of a qualitative target.
//!
//! A placement runs `Idle -> Placing -> AwaitingLabel -> Idle`. While an
//! element is anywhere but `Idle` it is busy: new placements and edits on
//! that element are refused until the gesture resolves. Every cancellation
//! removes the measurement from the store before the element returns to
//! `Idle`, so no half-placed target survives.

use super::host::{
    ElementId, InputModality, Key, PointerEvent, PromptKind, PromptRequest, PromptResponse, PromptTicket,
    ToolContext, ToolName,
};
use super::state::StoreKey;
use crate::config::ToolConfiguration;
use crate::models::measurement::{Measurement, MeasurementId, TargetVariant};
use std::collections::HashMap;
use std::rc::Rc;

static IDLE: GesturePhase = GesturePhase::Idle;

/// Where an element stands in the placement gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum GesturePhase {
    Idle,
    Placing {
        key: StoreKey,
        measurement: MeasurementId,
        /// The first key press during a mouse placement belongs to the tool
        key_listener_armed: bool,
    },
    AwaitingLabel {
        key: StoreKey,
        measurement: MeasurementId,
        ticket: PromptTicket,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Escape,
    ZeroLength,
    OutsideFrame,
    FrameChanged,
    ToolDeactivated,
    ViewportResized,
}

/// Result of feeding one event to a tool.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// The event does not concern this tool in its current phase
    Ignored,
    Started(MeasurementId),
    Updated,
    /// A key press swallowed by the placement
    Consumed,
    Cancelled(CancelReason),
    AwaitingLabel(PromptTicket),
    Committed(MeasurementId),
    /// The location prompt was declined
    Discarded(MeasurementId),
}

/// Edit requested on an existing target through a change prompt.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct PendingEdit {
    pub(super) key: StoreKey,
    pub(super) measurement: MeasurementId,
}

/// One registered qualitative target tool.
#[derive(Debug)]
pub struct QualitativeTargetTool {
    pub(super) name: ToolName,
    pub(super) config: Rc<ToolConfiguration>,
    sessions: HashMap<ElementId, GesturePhase>,
    pub(super) pending_edits: HashMap<PromptTicket, PendingEdit>,
    next_ticket: u64,
}

impl QualitativeTargetTool {
    pub fn new(variant: TargetVariant, modality: InputModality, config: Rc<ToolConfiguration>) -> Self {
        Self {
            name: ToolName { variant, modality },
            config,
            sessions: HashMap::new(),
            pending_edits: HashMap::new(),
            next_ticket: 0,
        }
    }

    pub fn name(&self) -> ToolName {
        self.name
    }

    pub fn config(&self) -> &ToolConfiguration {
        &self.config
    }

    pub fn set_configuration(&mut self, config: Rc<ToolConfiguration>) {
        self.config = config;
    }

    pub fn phase(&self, element: ElementId) -> &GesturePhase {
        self.sessions.get(&element).unwrap_or(&IDLE)
    }

    /// An element is busy from pointer-down until its label prompt resolves.
    pub fn is_busy(&self, element: ElementId) -> bool {
        !matches!(self.phase(element), GesturePhase::Idle)
    }

    pub(super) fn next_ticket(&mut self) -> PromptTicket {
        self.next_ticket += 1;
        PromptTicket(self.next_ticket)
    }

    pub(super) fn store_key(&self, element: ElementId, image_id: &str) -> StoreKey {
        StoreKey::new(element, image_id, self.name.variant.tool_type())
    }

    /// Pointer or touch begin: create a target on the frame and start
    /// dragging its end handle.
    pub fn begin(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> GestureOutcome {
        if self.name.modality == InputModality::Mouse && !self.config.is_mouse_button_enabled(event.which) {
            return GestureOutcome::Ignored;
        }
        if self.is_busy(event.element) {
            log::debug!("{}: element {} busy, ignoring new placement", self.name.name(), event.element);
            return GestureOutcome::Ignored;
        }

        let Some(metadata) = ctx.metadata.frame_metadata(&event.image_id) else {
            log::warn!("{}: no metadata for frame {}, placement refused", self.name.name(), event.image_id);
            return GestureOutcome::Ignored;
        };

        let id = ctx.store.next_id();
        let mut measurement = Measurement::create(
            id,
            self.name.variant,
            event.image_id.clone(),
            &metadata,
            event.image,
            self.config.text_box_offset,
        );
        measurement.handles.end.active = true;

        let key = self.store_key(event.element, &event.image_id);
        ctx.store.add(&key, measurement);
        self.sessions.insert(
            event.element,
            GesturePhase::Placing {
                key,
                measurement: id,
                key_listener_armed: self.name.modality == InputModality::Mouse,
            },
        );

        log::debug!(
            "{}: placement of {:?} started at ({:.1}, {:.1})",
            self.name.name(),
            id,
            event.image.x,
            event.image.y
        );
        ctx.viewport.request_redraw(event.element);
        GestureOutcome::Started(id)
    }

    /// The end handle follows the pointer while placing.
    pub fn drag(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> GestureOutcome {
        let GesturePhase::Placing { key, measurement, .. } = self.phase(event.element) else {
            return GestureOutcome::Ignored;
        };

        match ctx.store.get_mut(key, *measurement) {
            Some(m) => {
                m.handles.end.set_point(event.image);
                ctx.viewport.request_redraw(event.element);
                GestureOutcome::Updated
            }
            None => GestureOutcome::Ignored,
        }
    }

    /// Drag completion. Invalid placements are removed; valid ones wait for
    /// their location label.
    pub fn release(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> GestureOutcome {
        let element = event.element;
        let Some((key, id)) = self.take_placement(element) else {
            return GestureOutcome::Ignored;
        };

        let Some(m) = ctx.store.get_mut(&key, id) else {
            return GestureOutcome::Ignored;
        };
        m.handles.end.set_point(event.image);
        m.handles.end.active = false;
        m.active = false;
        let handles = m.handles;
        let has_extent = m.has_extent();
        let current_location = m.location.clone();

        // Touch has no zero-length trigger of its own; the extent check below
        // still keeps a degenerate arrow out of the store.
        let reason = if self.name.modality == InputModality::Mouse && !has_extent {
            Some(CancelReason::ZeroLength)
        } else if ctx.viewport.any_handles_outside_frame(element, &handles) {
            Some(CancelReason::OutsideFrame)
        } else if !has_extent {
            Some(CancelReason::ZeroLength)
        } else {
            None
        };

        if let Some(reason) = reason {
            ctx.store.remove(&key, id);
            log::info!("{}: placement of {:?} cancelled ({:?})", self.name.name(), id, reason);
            ctx.viewport.request_redraw(element);
            return GestureOutcome::Cancelled(reason);
        }

        let ticket = self.next_ticket();
        self.sessions.insert(
            element,
            GesturePhase::AwaitingLabel {
                key: key.clone(),
                measurement: id,
                ticket,
            },
        );
        ctx.viewport.request_redraw(element);
        ctx.prompt.request(PromptRequest {
            ticket,
            kind: PromptKind::Location,
            tool: self.name,
            element,
            image_id: key.image_id,
            measurement: id,
            current_location,
        });
        GestureOutcome::AwaitingLabel(ticket)
    }

    /// Key press during a mouse placement. Only the first key is seen; Escape
    /// cancels.
    pub fn key_down(&mut self, ctx: &mut ToolContext<'_>, element: ElementId, key: Key) -> GestureOutcome {
        let Some(GesturePhase::Placing { key_listener_armed, .. }) = self.sessions.get_mut(&element) else {
            return GestureOutcome::Ignored;
        };
        if !*key_listener_armed {
            return GestureOutcome::Ignored;
        }
        *key_listener_armed = false;

        match key {
            Key::Escape => self.cancel(ctx, element, CancelReason::Escape),
            Key::Other => GestureOutcome::Consumed,
        }
    }

    /// A frame finished rendering. If it is not the frame the placement
    /// started on, the original frame is restored, the target removed, and
    /// the new frame displayed again.
    pub fn frame_rendered(&mut self, ctx: &mut ToolContext<'_>, element: ElementId, image_id: &str) -> GestureOutcome {
        let GesturePhase::Placing { key, .. } = self.phase(element) else {
            return GestureOutcome::Ignored;
        };
        if key.image_id == image_id {
            return GestureOutcome::Ignored;
        }

        let original = key.image_id.clone();
        ctx.viewport.display_frame(element, &original);
        let outcome = self.cancel(ctx, element, CancelReason::FrameChanged);
        ctx.viewport.display_frame(element, image_id);
        outcome
    }

    pub fn deactivated(&mut self, ctx: &mut ToolContext<'_>, element: ElementId) -> GestureOutcome {
        self.cancel(ctx, element, CancelReason::ToolDeactivated)
    }

    pub fn viewport_resized(&mut self, ctx: &mut ToolContext<'_>, element: ElementId) -> GestureOutcome {
        self.cancel(ctx, element, CancelReason::ViewportResized)
    }

    /// Elements currently mid-placement.
    pub fn placing_elements(&self) -> Vec<ElementId> {
        self.sessions
            .iter()
            .filter(|(_, phase)| matches!(phase, GesturePhase::Placing { .. }))
            .map(|(element, _)| *element)
            .collect()
    }

    /// Answer to a location prompt. A submitted label (possibly empty)
    /// commits the target; anything else discards it.
    pub fn resolve_location(
        &mut self,
        ctx: &mut ToolContext<'_>,
        ticket: PromptTicket,
        response: PromptResponse,
    ) -> GestureOutcome {
        let element = self.sessions.iter().find_map(|(element, phase)| match phase {
            GesturePhase::AwaitingLabel { ticket: t, .. } if *t == ticket => Some(*element),
            _ => None,
        });
        let Some(element) = element else {
            return GestureOutcome::Ignored;
        };
        let Some(GesturePhase::AwaitingLabel { key, measurement: id, .. }) = self.sessions.remove(&element) else {
            return GestureOutcome::Ignored;
        };

        let outcome = match response {
            PromptResponse::Submit(location) => match ctx.store.get_mut(&key, id) {
                Some(m) => {
                    m.location = location;
                    m.active = true;
                    m.is_creating = false;
                    log::info!(
                        "{}: committed {:?} on {} ({:?})",
                        self.name.name(),
                        id,
                        key.image_id,
                        m.location
                    );
                    GestureOutcome::Committed(id)
                }
                None => GestureOutcome::Ignored,
            },
            PromptResponse::Cancel | PromptResponse::Delete => {
                ctx.store.remove(&key, id);
                log::info!("{}: location prompt declined, {:?} discarded", self.name.name(), id);
                GestureOutcome::Discarded(id)
            }
        };
        ctx.viewport.request_redraw(element);
        outcome
    }

    /// End a placement on `element`. A session awaiting its label is left alone.
    fn take_placement(&mut self, element: ElementId) -> Option<(StoreKey, MeasurementId)> {
        if !matches!(self.sessions.get(&element), Some(GesturePhase::Placing { .. })) {
            return None;
        }
        match self.sessions.remove(&element) {
            Some(GesturePhase::Placing { key, measurement, .. }) => Some((key, measurement)),
            _ => None,
        }
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>, element: ElementId, reason: CancelReason) -> GestureOutcome {
        let Some((key, measurement)) = self.take_placement(element) else {
            return GestureOutcome::Ignored;
        };
        ctx.store.remove(&key, measurement);
        log::info!("{}: placement of {:?} cancelled ({:?})", self.name.name(), measurement, reason);
        ctx.viewport.request_redraw(element);
        GestureOutcome::Cancelled(reason)
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Double activation on an existing target: relabel or delete.

use super::gesture::{PendingEdit, QualitativeTargetTool};
use super::host::{ElementId, PointerEvent, PromptKind, PromptRequest, PromptResponse, PromptTicket, ToolContext, Viewport};
use crate::models::measurement::{Measurement, MeasurementId, Point};
use crate::util::geometry::point_near_arrow;

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Wrong button, busy element, or unknown ticket
    Ignored,
    /// No target under the pointer
    Missed,
    /// A change prompt is open for this target; the activation is consumed
    Opened(MeasurementId),
    Relabeled(MeasurementId),
    Deleted(MeasurementId),
    Dismissed(MeasurementId),
}

/// True if canvas point `coords` is on the label box of `measurement` or
/// within `tolerance` of its arrow.
pub fn hit_test(
    viewport: &dyn Viewport,
    element: ElementId,
    measurement: &Measurement,
    coords: Point,
    tolerance: f64,
) -> bool {
    let start = viewport.pixel_to_canvas(element, measurement.handles.start.point());
    let end = viewport.pixel_to_canvas(element, measurement.handles.end.point());
    point_near_arrow(
        start,
        end,
        measurement.handles.text_box.bounding_box.as_ref(),
        coords,
        tolerance,
    )
}

impl QualitativeTargetTool {
    /// Open the change prompt for the first target hit by `event`.
    pub fn double_activate(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> EditOutcome {
        if !self.config.is_mouse_button_enabled(event.which) {
            return EditOutcome::Ignored;
        }
        if self.is_busy(event.element) {
            return EditOutcome::Ignored;
        }

        let key = self.store_key(event.element, &event.image_id);
        let tolerance = self.config.hit_tolerance;
        let viewport: &dyn Viewport = &*ctx.viewport;
        let hit = ctx
            .store
            .query(&key)
            .iter()
            .find(|m| hit_test(viewport, event.element, m, event.canvas, tolerance))
            .map(|m| m.id);
        let Some(id) = hit else {
            return EditOutcome::Missed;
        };

        let current_location = match ctx.store.get_mut(&key, id) {
            Some(m) => {
                m.active = true;
                m.location.clone()
            }
            None => return EditOutcome::Missed,
        };
        ctx.viewport.request_redraw(event.element);

        let ticket = self.next_ticket();
        self.pending_edits.insert(
            ticket,
            PendingEdit {
                key: key.clone(),
                measurement: id,
            },
        );
        ctx.prompt.request(PromptRequest {
            ticket,
            kind: PromptKind::Change,
            tool: self.name,
            element: event.element,
            image_id: key.image_id,
            measurement: id,
            current_location,
        });
        log::debug!("{}: change prompt opened for {:?}", self.name.name(), id);
        EditOutcome::Opened(id)
    }

    /// Answer to a change prompt.
    pub fn resolve_edit(
        &mut self,
        ctx: &mut ToolContext<'_>,
        ticket: PromptTicket,
        response: PromptResponse,
    ) -> EditOutcome {
        let Some(PendingEdit { key, measurement: id }) = self.pending_edits.remove(&ticket) else {
            return EditOutcome::Ignored;
        };

        let outcome = match response {
            PromptResponse::Delete => match ctx.store.remove(&key, id) {
                Some(_) => {
                    log::info!("{}: deleted {:?}", self.name.name(), id);
                    EditOutcome::Deleted(id)
                }
                None => EditOutcome::Ignored,
            },
            PromptResponse::Submit(location) => match ctx.store.get_mut(&key, id) {
                Some(m) => {
                    log::info!("{}: relabeled {:?} as {:?}", self.name.name(), id, location);
                    m.location = location;
                    m.active = false;
                    EditOutcome::Relabeled(id)
                }
                None => EditOutcome::Ignored,
            },
            PromptResponse::Cancel => match ctx.store.get_mut(&key, id) {
                Some(m) => {
                    m.active = false;
                    EditOutcome::Dismissed(id)
                }
                None => EditOutcome::Ignored,
            },
        };
        ctx.viewport.request_redraw(key.element);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolConfiguration;
    use crate::models::measurement::{Rect, TargetVariant};
    use crate::tools::gesture::GestureOutcome;
    use crate::tools::host::InputModality;
    use crate::tools::render::render_targets;
    use crate::tools::state::{AnnotationStore, StoreKey};
    use crate::tools::testing::{event, event_with_canvas, Harness, RecordingCanvas, ELEMENT, FRAME_A};
    use crate::util::geometry::FrameTransform;
    use std::rc::Rc;

    fn tool() -> QualitativeTargetTool {
        QualitativeTargetTool::new(TargetVariant::CR, InputModality::Mouse, Rc::new(ToolConfiguration::default()))
    }

    fn key() -> StoreKey {
        StoreKey::new(ELEMENT, FRAME_A, TargetVariant::CR.tool_type())
    }

    /// Place and commit a target from `from` to `to`, numbered `number`.
    fn place(h: &mut Harness, tool: &mut QualitativeTargetTool, from: (f64, f64), to: (f64, f64), number: u32) -> MeasurementId {
        let GestureOutcome::Started(id) = tool.begin(&mut h.ctx(), &event(from.0, from.1)) else {
            panic!("placement did not start");
        };
        tool.drag(&mut h.ctx(), &event(to.0, to.1));
        let GestureOutcome::AwaitingLabel(ticket) = tool.release(&mut h.ctx(), &event(to.0, to.1)) else {
            panic!("placement did not reach the label prompt");
        };
        tool.resolve_location(&mut h.ctx(), ticket, PromptResponse::Submit(Some(format!("site {}", number))));
        let m = h.store.get_mut(&key(), id).unwrap();
        m.measurement_number = Some(number);
        m.active = false;
        id
    }

    #[test]
    fn test_hit_inside_label_box_far_from_arrow() {
        let h = Harness::new();
        let mut m = Measurement::create(
            MeasurementId(1),
            TargetVariant::CR,
            FRAME_A,
            &Default::default(),
            Point::new(10.0, 10.0),
            Point::new(-50.0, -50.0),
        );
        m.handles.end.set_point(Point::new(20.0, 10.0));
        m.handles.text_box.bounding_box = Some(Rect::new(300.0, 300.0, 50.0, 20.0));

        assert!(hit_test(&h.viewport, ELEMENT, &m, Point::new(310.0, 315.0), 25.0));
        assert!(hit_test(&h.viewport, ELEMENT, &m, Point::new(15.0, 34.0), 25.0));
        assert!(!hit_test(&h.viewport, ELEMENT, &m, Point::new(200.0, 200.0), 25.0));
    }

    #[test]
    fn test_hit_uses_canvas_space() {
        let mut h = Harness::new();
        h.viewport.transform = FrameTransform {
            origin: Point::new(100.0, 0.0),
            scale: 2.0,
        };
        let mut m = Measurement::create(
            MeasurementId(1),
            TargetVariant::CR,
            FRAME_A,
            &Default::default(),
            Point::new(0.0, 0.0),
            Point::new(-50.0, -50.0),
        );
        m.handles.end.set_point(Point::new(50.0, 0.0));

        // Arrow spans canvas x 100..200 on y = 0
        assert!(hit_test(&h.viewport, ELEMENT, &m, Point::new(150.0, 20.0), 25.0));
        assert!(!hit_test(&h.viewport, ELEMENT, &m, Point::new(25.0, 0.0), 25.0));
    }

    #[test]
    fn test_double_activation_edits_only_nearest_and_delete_removes() {
        let mut h = Harness::new();
        let mut tool = tool();
        let upper = place(&mut h, &mut tool, (100.0, 100.0), (200.0, 100.0), 1);
        let lower = place(&mut h, &mut tool, (100.0, 140.0), (200.0, 140.0), 2);

        // Label boxes close together but away from the click
        h.store.get_mut(&key(), upper).unwrap().handles.text_box.bounding_box = Some(Rect::new(300.0, 100.0, 60.0, 20.0));
        h.store.get_mut(&key(), lower).unwrap().handles.text_box.bounding_box = Some(Rect::new(300.0, 122.0, 60.0, 20.0));
        h.prompt.requests.clear();

        // 10 px below the upper arrow's midpoint, 30 px above the lower one
        let outcome = tool.double_activate(&mut h.ctx(), &event(150.0, 110.0));
        assert_eq!(outcome, EditOutcome::Opened(upper));
        assert_eq!(h.prompt.requests.len(), 1);
        assert_eq!(h.prompt.requests[0].kind, PromptKind::Change);
        assert_eq!(h.prompt.requests[0].measurement, upper);
        assert_eq!(h.prompt.requests[0].current_location.as_deref(), Some("site 1"));
        assert!(h.store.query(&key())[0].active);
        assert!(!h.store.query(&key())[1].active);

        let ticket = h.prompt.requests[0].ticket;
        assert_eq!(
            tool.resolve_edit(&mut h.ctx(), ticket, PromptResponse::Delete),
            EditOutcome::Deleted(upper)
        );
        let remaining: Vec<_> = h.store.query(&key()).iter().map(|m| m.id).collect();
        assert_eq!(remaining, vec![lower]);

        let mut canvas = RecordingCanvas::new(512.0, 512.0);
        render_targets(&h.viewport, &mut h.store, tool.config(), &mut canvas, ELEMENT, TargetVariant::CR.tool_type());
        let labels: Vec<_> = canvas.texts().into_iter().map(|(lines, _)| lines[0].clone()).collect();
        assert_eq!(labels, vec!["Target 2".to_string()]);
    }

    #[test]
    fn test_relabel_and_dismiss_clear_active() {
        let mut h = Harness::new();
        let mut tool = tool();
        let id = place(&mut h, &mut tool, (100.0, 100.0), (200.0, 100.0), 1);

        tool.double_activate(&mut h.ctx(), &event(150.0, 100.0));
        let ticket = h.prompt.requests.last().unwrap().ticket;
        assert_eq!(
            tool.resolve_edit(&mut h.ctx(), ticket, PromptResponse::Submit(Some("Right lobe".into()))),
            EditOutcome::Relabeled(id)
        );
        let m = &h.store.query(&key())[0];
        assert_eq!(m.location.as_deref(), Some("Right lobe"));
        assert!(!m.active);

        tool.double_activate(&mut h.ctx(), &event(150.0, 100.0));
        let ticket = h.prompt.requests.last().unwrap().ticket;
        assert_eq!(tool.resolve_edit(&mut h.ctx(), ticket, PromptResponse::Cancel), EditOutcome::Dismissed(id));
        assert!(!h.store.query(&key())[0].active);
        assert_eq!(tool.resolve_edit(&mut h.ctx(), ticket, PromptResponse::Cancel), EditOutcome::Ignored);
    }

    #[test]
    fn test_masked_button_and_miss() {
        let mut h = Harness::new();
        let mut tool = tool();
        place(&mut h, &mut tool, (100.0, 100.0), (200.0, 100.0), 1);
        h.prompt.requests.clear();

        let mut secondary = event(150.0, 100.0);
        secondary.which = 3;
        assert_eq!(tool.double_activate(&mut h.ctx(), &secondary), EditOutcome::Ignored);

        let far = event_with_canvas(Point::new(400.0, 400.0), Point::new(400.0, 400.0));
        assert_eq!(tool.double_activate(&mut h.ctx(), &far), EditOutcome::Missed);
        assert!(h.prompt.requests.is_empty());
    }

    #[test]
    fn test_busy_element_ignores_double_activation() {
        let mut h = Harness::new();
        let mut tool = tool();
        place(&mut h, &mut tool, (100.0, 100.0), (200.0, 100.0), 1);
        tool.begin(&mut h.ctx(), &event(300.0, 300.0));

        assert_eq!(tool.double_activate(&mut h.ctx(), &event(150.0, 100.0)), EditOutcome::Ignored);
    }
}

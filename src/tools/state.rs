// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-element annotation store.
//!
//! Measurements are kept in insertion order under the element, the frame
//! and the tool type that created them. The tools read and write only
//! through [`AnnotationStore`].

use super::host::ElementId;
use crate::models::measurement::{Measurement, MeasurementId, ToolType};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    pub element: ElementId,
    pub image_id: String,
    pub tool_type: ToolType,
}

impl StoreKey {
    pub fn new(element: ElementId, image_id: impl Into<String>, tool_type: ToolType) -> Self {
        Self {
            element,
            image_id: image_id.into(),
            tool_type,
        }
    }
}

pub trait AnnotationStore {
    fn next_id(&mut self) -> MeasurementId;

    fn add(&mut self, key: &StoreKey, measurement: Measurement);

    fn remove(&mut self, key: &StoreKey, id: MeasurementId) -> Option<Measurement>;

    fn query(&self, key: &StoreKey) -> &[Measurement];

    fn query_mut(&mut self, key: &StoreKey) -> &mut [Measurement];

    fn get_mut(&mut self, key: &StoreKey, id: MeasurementId) -> Option<&mut Measurement> {
        self.query_mut(key).iter_mut().find(|m| m.id == id)
    }
}

/// In-memory store used by the desktop host.
#[derive(Debug, Default)]
pub struct ToolStateStore {
    entries: HashMap<StoreKey, Vec<Measurement>>,
    next_id: u64,
}

impl ToolStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of measurements across all keys.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All measurements, ordered by id so that exports are stable.
    pub fn all(&self) -> Vec<Measurement> {
        let mut all: Vec<Measurement> = self.entries.values().flatten().cloned().collect();
        all.sort_by_key(|m| m.id);
        all
    }

    /// Give a committed measurement the next display number of its study.
    pub fn assign_next_number(&mut self, key: &StoreKey, id: MeasurementId) -> Option<u32> {
        let study = self.query(key).iter().find(|m| m.id == id)?.study_instance_uid.clone();
        let next = self
            .entries
            .values()
            .flatten()
            .filter(|m| m.study_instance_uid == study)
            .filter_map(|m| m.measurement_number)
            .max()
            .unwrap_or(0)
            + 1;
        let measurement = self.get_mut(key, id)?;
        measurement.measurement_number = Some(next);
        Some(next)
    }

    /// Replace the contents with previously saved measurements on `element`.
    pub fn replace_all(&mut self, element: ElementId, measurements: Vec<Measurement>) {
        self.entries.clear();
        self.next_id = measurements.iter().map(|m| m.id.0).max().unwrap_or(0);
        for measurement in measurements {
            let key = StoreKey::new(element, measurement.image_id.clone(), measurement.tool_type);
            self.entries.entry(key).or_default().push(measurement);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl AnnotationStore for ToolStateStore {
    fn next_id(&mut self) -> MeasurementId {
        self.next_id = self.next_id.saturating_add(1);
        MeasurementId(self.next_id)
    }

    fn add(&mut self, key: &StoreKey, measurement: Measurement) {
        self.entries.entry(key.clone()).or_default().push(measurement);
    }

    fn remove(&mut self, key: &StoreKey, id: MeasurementId) -> Option<Measurement> {
        let list = self.entries.get_mut(key)?;
        let index = list.iter().position(|m| m.id == id)?;
        let removed = list.remove(index);
        if list.is_empty() {
            self.entries.remove(key);
        }
        Some(removed)
    }

    fn query(&self, key: &StoreKey) -> &[Measurement] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn query_mut(&mut self, key: &StoreKey) -> &mut [Measurement] {
        match self.entries.get_mut(key) {
            Some(list) => list.as_mut_slice(),
            None => &mut [],
        }
    }
}

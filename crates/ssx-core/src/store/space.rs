//! Keyed record spaces: job handles and references.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::RecordCell;
use crate::domain::{JobRecord, SimulatorError};

/// String-keyed map of record cells.
///
/// The map lock guards structural changes only (insert/remove). It is released
/// before any record lock is taken.
#[derive(Debug, Default)]
struct RecordSpace {
    records: RwLock<HashMap<String, RecordCell>>,
}

impl RecordSpace {
    fn ensure(&self, key: &str) -> RecordCell {
        if let Some(cell) = self.records.read().get(key) {
            return cell.clone();
        }

        let mut records = self.records.write();
        records
            .entry(key.to_string())
            .or_insert_with(|| {
                tracing::debug!(key, "record created");
                RecordCell::new(JobRecord::new(key))
            })
            .clone()
    }

    fn get(&self, key: &str) -> Option<RecordCell> {
        self.records.read().get(key).cloned()
    }

    fn remove(&self, key: &str) -> Option<RecordCell> {
        let removed = self.records.write().remove(key);
        if removed.is_some() {
            tracing::debug!(key, "record removed");
        }
        removed
    }

    fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Cells collected under the map lock; callers inspect them after it is released.
    fn cells(&self) -> Vec<RecordCell> {
        self.records.read().values().cloned().collect()
    }
}

/// Job handle -> job record. Handles stay pollable forever, so there is no `remove`.
#[derive(Debug, Default)]
pub struct JobStore {
    space: RecordSpace,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a default record for `handle` if absent; return the existing one otherwise.
    pub fn ensure(&self, handle: &str) -> RecordCell {
        self.space.ensure(handle)
    }

    pub fn get(&self, handle: &str) -> Result<RecordCell, SimulatorError> {
        self.space
            .get(handle)
            .ok_or_else(|| SimulatorError::NotFound(handle.to_string()))
    }

    pub fn len(&self) -> usize {
        self.space.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cells(&self) -> Vec<RecordCell> {
        self.space.cells()
    }
}

/// Reference id -> resource state, independent of any job handle.
#[derive(Debug, Default)]
pub struct ReferenceStore {
    space: RecordSpace,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a default record for `reference` if absent; return the existing one otherwise.
    pub fn ensure(&self, reference: &str) -> RecordCell {
        self.space.ensure(reference)
    }

    pub fn get(&self, reference: &str) -> Result<RecordCell, SimulatorError> {
        self.space
            .get(reference)
            .ok_or_else(|| SimulatorError::NotFound(reference.to_string()))
    }

    /// Drop the mapping. Completions already holding the cell still run against it.
    pub fn remove(&self, reference: &str) -> Option<RecordCell> {
        self.space.remove(reference)
    }

    pub fn len(&self) -> usize {
        self.space.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

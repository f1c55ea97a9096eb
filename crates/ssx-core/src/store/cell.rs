//! Record cell: one shared record and its own lock.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::JobRecord;

/// Shared handle to a single record.
///
/// Design:
/// - Each record owns its exclusion domain; every reader and writer goes through it.
/// - The lock is held only for the duration of a closure, never across an `.await`.
/// - Cloning the cell clones the handle, not the record.
#[derive(Debug, Clone)]
pub struct RecordCell {
    inner: Arc<Mutex<JobRecord>>,
}

impl RecordCell {
    pub fn new(record: JobRecord) -> Self {
        Self {
            inner: Arc::new(Mutex::new(record)),
        }
    }

    /// Consistent copy of the current record.
    pub fn snapshot(&self) -> JobRecord {
        self.inner.lock().clone()
    }

    /// Read under the record lock.
    pub fn with<R>(&self, f: impl FnOnce(&JobRecord) -> R) -> R {
        f(&*self.inner.lock())
    }

    /// Mutate under the record lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut JobRecord) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    /// Do both cells point at the same record?
    pub fn same_record(&self, other: &RecordCell) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

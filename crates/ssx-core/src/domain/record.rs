//! Job record and its I/O entries.

use serde::{Deserialize, Serialize};

/// Label used for the single output entry carrying a serialized field bag.
pub const JSON_LABEL: &str = "JSON";

/// Entry index of the serialized field bag output.
pub const JSON_ENTRY_INDEX: i64 = 1;

/// Result status name reported by every completed record.
pub const RESULT_STATUS_SUCCESS: &str = "success";

/// Result status type reported by every completed record.
pub const RESULT_STATUS_RESOLVED: &str = "RESOLVED";

/// Record status.
///
/// State transitions:
/// - Pending -> Completed (exactly once, by a completion)
///
/// `Unset` only appears on a blank record (unknown scenario, not-found body).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecordStatus {
    #[default]
    #[serde(rename = "")]
    Unset,

    #[serde(rename = "PENDING")]
    Pending,

    #[serde(rename = "COMPLETED")]
    Completed,
}

impl RecordStatus {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, RecordStatus::Completed)
    }
}

/// Named value attached to a record's inputs or outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoEntry {
    pub label: String,
    #[serde(rename = "entryIndex")]
    pub entry_index: i64,
    pub value: String,
}

impl IoEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>, index: i64) -> Self {
        Self {
            label: label.into(),
            entry_index: index,
            value: value.into(),
        }
    }

    /// The `"JSON"` entry holding a serialized field bag.
    pub fn json(value: impl Into<String>) -> Self {
        Self::new(JSON_LABEL, value, JSON_ENTRY_INDEX)
    }
}

/// Externally visible unit of work, also used for reference state.
///
/// Design:
/// - Serialized field names follow the wire contract (`Inputs`/`Outputs` are capitalized).
/// - The terminal transition goes through `mark_completed` so the status and
///   result fields always change together.
/// - `inputs`/`outputs` are `None` only on a blank record, so it encodes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub status: RecordStatus,
    #[serde(rename = "resultStatusName")]
    pub result_status_name: String,
    #[serde(rename = "resultStatusType")]
    pub result_status_type: String,
    #[serde(rename = "Inputs")]
    pub inputs: Option<Vec<IoEntry>>,
    #[serde(rename = "Outputs")]
    pub outputs: Option<Vec<IoEntry>>,
}

impl JobRecord {
    /// Default-initialized record: `{id, PENDING, "", "", [], []}`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: RecordStatus::Pending,
            result_status_name: String::new(),
            result_status_type: String::new(),
            inputs: Some(Vec::new()),
            outputs: Some(Vec::new()),
        }
    }

    /// Bare record with every field empty.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Replace the outputs with a single entry.
    pub fn set_sole_output(&mut self, entry: IoEntry) {
        self.outputs = Some(vec![entry]);
    }

    /// Value of the first output entry, if any.
    pub fn first_output_value(&self) -> Option<&str> {
        self.outputs
            .as_deref()
            .and_then(|outputs| outputs.first())
            .map(|entry| entry.value.as_str())
    }

    /// Mark as completed (success / RESOLVED).
    pub fn mark_completed(&mut self) {
        self.status = RecordStatus::Completed;
        self.result_status_name = RESULT_STATUS_SUCCESS.to_string();
        self.result_status_type = RESULT_STATUS_RESOLVED.to_string();
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }
}

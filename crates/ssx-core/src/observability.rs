use serde::{Deserialize, Serialize};

/// Point-in-time view of the store, for logs and diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    pub jobs: usize,
    pub pending_jobs: usize,
    pub completed_jobs: usize,
    pub references: usize,
    /// Completions scheduled but not yet applied.
    pub in_flight_completions: usize,
}

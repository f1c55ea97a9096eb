//! Store - ジョブとリファレンスの 2 つのキー空間
//!
//! # ロックの粒度
//! - キー空間ごとに 1 つ（insert/remove の直列化）
//! - レコードごとに 1 つ（内容の更新とスナップショット読み取り）
//!
//! キー空間のロックを保持したままレコードのロックを取ることはありません。

mod cell;
mod space;

pub use cell::RecordCell;
pub use space::{JobStore, ReferenceStore};

use crate::domain::RecordStatus;
use crate::observability::StoreCounts;

/// In-memory store owning both key spaces. Lost on restart.
#[derive(Debug, Default)]
pub struct Store {
    jobs: JobStore,
    references: ReferenceStore,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> &JobStore {
        &self.jobs
    }

    pub fn references(&self) -> &ReferenceStore {
        &self.references
    }

    /// Get counts for observability.
    pub fn counts(&self) -> StoreCounts {
        let mut counts = StoreCounts {
            references: self.references.len(),
            ..StoreCounts::default()
        };
        for cell in self.jobs.cells() {
            counts.jobs += 1;
            match cell.with(|r| r.status) {
                RecordStatus::Completed => counts.completed_jobs += 1,
                RecordStatus::Pending | RecordStatus::Unset => counts.pending_jobs += 1,
            }
        }
        counts
    }
}

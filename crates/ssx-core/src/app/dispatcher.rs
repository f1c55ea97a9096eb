//! Dispatcher - scenario id から create/read/update/delete への振り分け
//!
//! # フロー
//! 1. handle を生成し、Job Record と Reference Record を `ensure`
//! 2. scenario ごとの処理（completion の予約を含む）
//! 3. まだ PENDING の Job Record のスナップショットを返す
//!
//! 未知の scenario id は空のレコードを返すだけで、completion は予約しません。

use std::sync::Arc;

use crate::app::completion::{Completion, CompletionScheduler};
use crate::app::payload::ActivityPayload;
use crate::domain::{FieldBag, JobRecord, Scenario, SimulatorError};
use crate::observability::StoreCounts;
use crate::ports::{HandleGenerator, RandomHandleGenerator};
use crate::store::Store;

/// Entry point for the four store operations.
///
/// Cheap to share behind an `Arc`; all state lives in the store and the scheduler.
pub struct Dispatcher {
    store: Store,
    scheduler: CompletionScheduler,
    handles: Arc<dyn HandleGenerator>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            store: Store::new(),
            scheduler: CompletionScheduler::new(),
            handles: Arc::new(RandomHandleGenerator::new()),
        }
    }

    /// Replace the handle generator (deterministic handles in tests).
    pub fn with_handle_generator(mut self, handles: impl HandleGenerator + 'static) -> Self {
        self.handles = Arc::new(handles);
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn scheduler(&self) -> &CompletionScheduler {
        &self.scheduler
    }

    /// Submit a decoded activity. The reference id comes from the field bag.
    pub fn submit_activity(&self, payload: &ActivityPayload) -> JobRecord {
        let _span = tracing::info_span!("activity", trigger = %payload.trigger_name).entered();
        self.submit(
            payload.scenario_id,
            payload.reference(),
            payload.scenario_inputs_value.clone(),
        )
    }

    /// Start a scenario and return the job record as it is right now (PENDING).
    pub fn submit(&self, scenario_id: i64, reference: &str, fields: FieldBag) -> JobRecord {
        let handle = self.handles.generate();
        let job = self.store.jobs().ensure(&handle);
        let reference_record = self.store.references().ensure(reference);

        let Some(scenario) = Scenario::from_id(scenario_id) else {
            tracing::debug!(scenario_id, handle = %handle, reference, "unknown scenario; nothing scheduled");
            return JobRecord::blank();
        };
        tracing::info!(%scenario, handle = %handle, reference, "activity accepted");

        match scenario {
            Scenario::Create => {
                self.scheduler.schedule(Completion::Create {
                    record: job.clone(),
                    fields: fields.clone(),
                });
                self.scheduler.schedule(Completion::Create {
                    record: reference_record,
                    fields,
                });
            }
            Scenario::Read => {
                reference_record.update(|r| r.id = handle.clone());
                self.scheduler.schedule(Completion::Read {
                    job: job.clone(),
                    reference: reference_record,
                });
            }
            Scenario::Update => {
                reference_record.update(|r| r.id = handle.clone());
                self.scheduler.schedule(Completion::Update {
                    job: job.clone(),
                    reference: reference_record,
                    fields,
                });
            }
            Scenario::Delete => {
                self.store.references().remove(reference);
                self.scheduler
                    .schedule(Completion::Delete { job: job.clone() });
            }
        }

        job.snapshot()
    }

    /// Live job record for `handle`.
    pub fn status(&self, handle: &str) -> Result<JobRecord, SimulatorError> {
        self.store.jobs().get(handle).map(|cell| cell.snapshot())
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            in_flight_completions: self.scheduler.in_flight(),
            ..self.store.counts()
        }
    }

    /// Wait for every scheduled completion to run.
    pub async fn wait_idle(&self) {
        self.scheduler.wait_idle().await;
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

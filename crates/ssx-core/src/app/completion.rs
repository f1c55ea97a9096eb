//! CompletionScheduler - 遅延付きの終端遷移
//!
//! # フロー
//! 1. `schedule()` で completion を tracker に spawn（呼び出し側は待たない）
//! 2. `COMPLETION_DELAY` だけ sleep
//! 3. 対象レコードのロックを取り、終端遷移を 1 回だけ適用
//!
//! キャンセル・リトライはありません。spawn した completion は tracker が保持し、
//! 実行されるまで到達可能なままです。

use std::time::Duration;

use tokio_util::task::TaskTracker;
use tracing::Instrument;

use crate::domain::{FieldBag, IoEntry};
use crate::store::RecordCell;

/// Simulated backend latency before a record reaches its terminal state.
pub const COMPLETION_DELAY: Duration = Duration::from_secs(30);

/// One delayed terminal mutation.
#[derive(Debug)]
pub enum Completion {
    /// Store the serialized bag as the sole `"JSON"` output.
    Create { record: RecordCell, fields: FieldBag },

    /// Copy the reference record over the job record, keeping the job's id.
    Read { job: RecordCell, reference: RecordCell },

    /// Merge the bag into the reference's last output and apply it to both records.
    Update {
        job: RecordCell,
        reference: RecordCell,
        fields: FieldBag,
    },

    /// Status change only.
    Delete { job: RecordCell },
}

impl Completion {
    pub fn kind(&self) -> &'static str {
        match self {
            Completion::Create { .. } => "create",
            Completion::Read { .. } => "read",
            Completion::Update { .. } => "update",
            Completion::Delete { .. } => "delete",
        }
    }

    /// Apply the terminal mutation now.
    ///
    /// At most one record lock is held at any point.
    pub fn apply(self) {
        match self {
            Completion::Create { record, fields } => {
                let output = IoEntry::json(fields.to_json());
                record.update(|r| {
                    r.set_sole_output(output);
                    r.mark_completed();
                });
            }
            Completion::Read { job, reference } => {
                let source = reference.snapshot();
                job.update(|r| {
                    let id = std::mem::take(&mut r.id);
                    *r = source;
                    r.id = id;
                    r.mark_completed();
                });
            }
            Completion::Update {
                job,
                reference,
                fields,
            } => {
                let output = reference.update(|r| {
                    let mut merged = match r.first_output_value() {
                        Some(stored) => FieldBag::from_json_or_empty(stored),
                        None => {
                            tracing::debug!("reference has no stored output; merging against empty base");
                            FieldBag::default()
                        }
                    };
                    merged.merge_from(&fields);

                    let output = IoEntry::json(merged.to_json());
                    r.set_sole_output(output.clone());
                    r.mark_completed();
                    output
                });
                job.update(|r| {
                    r.set_sole_output(output);
                    r.mark_completed();
                });
            }
            Completion::Delete { job } => {
                job.update(|r| r.mark_completed());
            }
        }
    }
}

/// Spawns completions and keeps them reachable until they run.
#[derive(Debug, Clone, Default)]
pub struct CompletionScheduler {
    tracker: TaskTracker,
}

impl CompletionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire-and-forget: the completion runs after `COMPLETION_DELAY`.
    pub fn schedule(&self, completion: Completion) {
        let span = tracing::info_span!("completion", kind = completion.kind());
        self.tracker.spawn(
            async move {
                tokio::time::sleep(COMPLETION_DELAY).await;
                completion.apply();
                tracing::info!("completion applied");
            }
            .instrument(span),
        );
    }

    /// Number of completions scheduled but not yet finished.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every completion scheduled so far (and any scheduled meanwhile) has run.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobRecord, RecordStatus};
    use pretty_assertions::assert_eq;

    fn bag(pairs: &[(&str, &str)]) -> FieldBag {
        let mut bag = FieldBag::default();
        for (name, value) in pairs {
            bag.set(name, *value);
        }
        bag
    }

    fn cell(id: &str) -> RecordCell {
        RecordCell::new(JobRecord::new(id))
    }

    fn stored_bag(cell: &RecordCell) -> FieldBag {
        let record = cell.snapshot();
        let outputs = record.outputs.unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].label, "JSON");
        assert_eq!(outputs[0].entry_index, 1);
        FieldBag::from_json_or_empty(&outputs[0].value)
    }

    #[test]
    fn create_stores_serialized_bag() {
        let record = cell("1000");
        let fields = bag(&[("OSName", "linux"), ("CPUcount", "4")]);

        Completion::Create {
            record: record.clone(),
            fields: fields.clone(),
        }
        .apply();

        assert!(record.snapshot().is_completed());
        assert_eq!(stored_bag(&record), fields);
    }

    #[test]
    fn read_copies_reference_but_keeps_job_id() {
        let job = cell("1000");
        let reference = cell("R1");
        reference.update(|r| {
            r.set_sole_output(IoEntry::json(r#"{"OSName":"linux"}"#));
            r.result_status_name = "stale".to_string();
        });

        Completion::Read {
            job: job.clone(),
            reference: reference.clone(),
        }
        .apply();

        let record = job.snapshot();
        assert_eq!(record.id, "1000");
        assert_eq!(record.status, RecordStatus::Completed);
        assert_eq!(record.result_status_name, "success");
        assert_eq!(record.first_output_value(), Some(r#"{"OSName":"linux"}"#));
        // The source is untouched.
        assert_eq!(reference.snapshot().status, RecordStatus::Pending);
    }

    #[test]
    fn read_of_default_reference_completes_with_empty_outputs() {
        let job = cell("1000");
        let reference = cell("R1");

        Completion::Read {
            job: job.clone(),
            reference,
        }
        .apply();

        let record = job.snapshot();
        assert_eq!(record.id, "1000");
        assert!(record.is_completed());
        assert_eq!(record.outputs, Some(vec![]));
    }

    #[test]
    fn update_merges_into_stored_output_and_applies_to_both() {
        let job = cell("1001");
        let reference = cell("R1");
        let base = bag(&[("OSName", "linux"), ("CPUcount", "4")]);
        reference.update(|r| r.set_sole_output(IoEntry::json(base.to_json())));

        Completion::Update {
            job: job.clone(),
            reference: reference.clone(),
            fields: bag(&[("CPUcount", "8")]),
        }
        .apply();

        let expected = bag(&[("OSName", "linux"), ("CPUcount", "8")]);
        assert_eq!(stored_bag(&job), expected);
        assert_eq!(stored_bag(&reference), expected);
        assert!(job.snapshot().is_completed());
        assert!(reference.snapshot().is_completed());
    }

    #[test]
    fn update_against_empty_reference_yields_incoming_bag() {
        let job = cell("1001");
        let reference = cell("R1");
        let incoming = bag(&[("CPUcount", "8")]);

        Completion::Update {
            job: job.clone(),
            reference,
            fields: incoming.clone(),
        }
        .apply();

        assert_eq!(stored_bag(&job), incoming);
    }

    #[test]
    fn update_against_garbage_output_still_completes() {
        let job = cell("1001");
        let reference = cell("R1");
        reference.update(|r| r.set_sole_output(IoEntry::json("{not json")));
        let incoming = bag(&[("SiteID", "dc-1")]);

        Completion::Update {
            job: job.clone(),
            reference,
            fields: incoming.clone(),
        }
        .apply();

        assert!(job.snapshot().is_completed());
        assert_eq!(stored_bag(&job), incoming);
    }

    #[test]
    fn delete_only_changes_status() {
        let job = cell("1002");

        Completion::Delete { job: job.clone() }.apply();

        let record = job.snapshot();
        assert!(record.is_completed());
        assert_eq!(record.outputs, Some(vec![]));
    }

    #[test]
    fn polls_never_observe_a_partial_completion() {
        let store = crate::store::Store::new();
        let handles: Vec<String> = (1000..1032).map(|h| h.to_string()).collect();
        for handle in &handles {
            store.jobs().ensure(handle);
        }
        let fields = bag(&[("OSName", "linux"), ("Reference", "R1")]);

        std::thread::scope(|s| {
            for chunk in handles.chunks(8) {
                let store = &store;
                let fields = &fields;
                s.spawn(move || {
                    for handle in chunk {
                        let record = store.jobs().get(handle).unwrap();
                        Completion::Create {
                            record,
                            fields: fields.clone(),
                        }
                        .apply();
                    }
                });
            }

            for _ in 0..4 {
                let store = &store;
                let handles = &handles;
                s.spawn(move || {
                    loop {
                        let mut done = 0;
                        for handle in handles {
                            let record = store.jobs().get(handle).unwrap().snapshot();
                            match record.status {
                                RecordStatus::Completed => {
                                    assert_eq!(record.result_status_name, "success");
                                    assert_eq!(record.result_status_type, "RESOLVED");
                                    assert_eq!(record.outputs.as_ref().map(Vec::len), Some(1));
                                    done += 1;
                                }
                                status => {
                                    assert_eq!(status, RecordStatus::Pending);
                                    assert_eq!(record.result_status_name, "");
                                    assert_eq!(record.outputs, Some(vec![]));
                                }
                            }
                        }
                        if done == handles.len() {
                            break;
                        }
                    }
                });
            }
        });
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_completion_waits_for_delay() {
        let scheduler = CompletionScheduler::new();
        let job = cell("1003");

        scheduler.schedule(Completion::Delete { job: job.clone() });
        assert_eq!(scheduler.in_flight(), 1);

        tokio::time::advance(COMPLETION_DELAY - Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert!(!job.snapshot().is_completed());

        scheduler.wait_idle().await;
        assert!(job.snapshot().is_completed());
        assert_eq!(scheduler.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_accepts_work_after_wait_idle() {
        let scheduler = CompletionScheduler::new();
        scheduler.wait_idle().await;

        let job = cell("1004");
        scheduler.schedule(Completion::Delete { job: job.clone() });
        scheduler.wait_idle().await;

        assert!(job.snapshot().is_completed());
    }
}

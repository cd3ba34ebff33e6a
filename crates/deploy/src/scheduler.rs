//! Bounded-concurrency upload execution with per-file retry.
//!
//! Every task runs its own sequential retry loop. A shared semaphore caps
//! the number of attempts in flight across all tasks. Tasks never cancel
//! each other: all of them run to completion and their outcomes are joined.

use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, warn};

use crate::store::RemoteStore;
use crate::types::{DeployEvent, UploadOptions, UploadOutcome, UploadTask};

/// Executes upload tasks against a [`RemoteStore`].
#[derive(Debug, Clone)]
pub struct UploadScheduler {
    parallel: usize,
    retry: u32,
    retry_delay: Duration,
}

impl Default for UploadScheduler {
    fn default() -> Self {
        Self::new(&UploadOptions::default())
    }
}

impl UploadScheduler {
    /// Creates a scheduler; `parallel` and `retry` are raised to 1 if lower.
    ///
    /// `parallel` is capped at [`Semaphore::MAX_PERMITS`].
    pub fn new(options: &UploadOptions) -> Self {
        Self {
            parallel: options.parallel.clamp(1, Semaphore::MAX_PERMITS),
            retry: options.retry.max(1),
            retry_delay: options.retry_delay,
        }
    }

    pub fn parallel(&self) -> usize {
        self.parallel
    }

    pub fn retry(&self) -> u32 {
        self.retry
    }

    /// Uploads every task and returns one outcome per task.
    ///
    /// Returns only after all tasks have settled.
    pub async fn run(
        &self,
        store: &dyn RemoteStore,
        domain: &str,
        version: u32,
        tasks: Vec<UploadTask>,
        events_tx: &mpsc::UnboundedSender<DeployEvent>,
    ) -> Vec<(UploadTask, UploadOutcome)> {
        let semaphore = Semaphore::new(self.parallel);
        debug!(
            tasks = tasks.len(),
            parallel = self.parallel,
            retry = self.retry,
            "starting uploads"
        );

        let uploads = tasks.into_iter().map(|task| {
            let semaphore = &semaphore;
            async move {
                let outcome = self
                    .upload_with_retry(store, domain, version, &task, semaphore, events_tx)
                    .await;
                (task, outcome)
            }
        });
        join_all(uploads).await
    }

    async fn upload_with_retry(
        &self,
        store: &dyn RemoteStore,
        domain: &str,
        version: u32,
        task: &UploadTask,
        semaphore: &Semaphore,
        events_tx: &mpsc::UnboundedSender<DeployEvent>,
    ) -> UploadOutcome {
        let mut last_error = String::new();
        let mut attempts = 0;

        while attempts < self.retry {
            attempts += 1;

            let result = {
                let Ok(_permit) = semaphore.acquire().await else {
                    last_error = "upload scheduler closed".into();
                    break;
                };
                store
                    .upload_file(domain, version, &task.key, &task.absolute_path)
                    .await
            };

            match result {
                Ok(()) => {
                    debug!(key = %task.key, attempt = attempts, "uploaded");
                    let _ = events_tx.send(DeployEvent::FileUploaded {
                        key: task.key.clone(),
                    });
                    return UploadOutcome::Success { attempts };
                }
                Err(e) => {
                    warn!(key = %task.key, attempt = attempts, error = %e, "upload attempt failed");
                    last_error = e.to_string();
                    let _ = events_tx.send(DeployEvent::AttemptFailed {
                        key: task.key.clone(),
                        attempt: attempts,
                        error: last_error.clone(),
                    });
                    if e.is_auth() {
                        break;
                    }
                    if attempts < self.retry && !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        let _ = events_tx.send(DeployEvent::FileFailed {
            key: task.key.clone(),
            error: last_error.clone(),
        });
        UploadOutcome::Failed {
            attempts,
            error: last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockStore;
    use std::path::PathBuf;

    fn tasks(n: usize) -> Vec<UploadTask> {
        (0..n)
            .map(|i| UploadTask {
                key: format!("static/{i}.js"),
                absolute_path: PathBuf::from(format!("/bundle/static/{i}.js")),
            })
            .collect()
    }

    fn scheduler(parallel: usize, retry: u32) -> UploadScheduler {
        UploadScheduler::new(&UploadOptions {
            parallel,
            retry,
            retry_delay: Duration::ZERO,
        })
    }

    async fn run(
        sched: &UploadScheduler,
        store: &MockStore,
        tasks: Vec<UploadTask>,
    ) -> (Vec<(UploadTask, UploadOutcome)>, Vec<DeployEvent>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let outcomes = sched.run(store, "www.example.com", 1, tasks, &tx).await;
        drop(tx);
        let mut events = Vec::new();
        while let Some(e) = rx.recv().await {
            events.push(e);
        }
        (outcomes, events)
    }

    #[test]
    fn bounds_are_clamped_to_one() {
        let sched = scheduler(0, 0);
        assert_eq!(sched.parallel(), 1);
        assert_eq!(sched.retry(), 1);
    }

    #[tokio::test]
    async fn oversized_parallel_is_capped() {
        let sched = scheduler(usize::MAX, 1);
        assert_eq!(sched.parallel(), Semaphore::MAX_PERMITS);

        let store = MockStore::new();
        let (outcomes, _) = run(&sched, &store, tasks(2)).await;
        assert!(
            outcomes
                .iter()
                .all(|(_, o)| *o == UploadOutcome::Success { attempts: 1 })
        );
    }

    #[tokio::test]
    async fn all_tasks_succeed() {
        let store = MockStore::new();
        let (outcomes, events) = run(&scheduler(3, 3), &store, tasks(5)).await;

        assert_eq!(outcomes.len(), 5);
        assert!(
            outcomes
                .iter()
                .all(|(_, o)| *o == UploadOutcome::Success { attempts: 1 })
        );
        let uploaded = events
            .iter()
            .filter(|e| matches!(e, DeployEvent::FileUploaded { .. }))
            .count();
        assert_eq!(uploaded, 5);
    }

    #[tokio::test]
    async fn in_flight_attempts_never_exceed_bound() {
        let store = MockStore::new().with_delay(Duration::from_millis(20));
        let (outcomes, _) = run(&scheduler(3, 1), &store, tasks(12)).await;

        assert_eq!(outcomes.len(), 12);
        assert_eq!(store.max_in_flight(), 3);
    }

    #[tokio::test]
    async fn single_worker_is_sequential() {
        let store = MockStore::new().with_delay(Duration::from_millis(5));
        run(&scheduler(1, 1), &store, tasks(4)).await;
        assert_eq!(store.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn exhausted_retries_record_last_error() {
        let store = MockStore::new().failing("static/1.js", u32::MAX);
        let (outcomes, events) = run(&scheduler(2, 3), &store, tasks(3)).await;

        let (_, outcome) = outcomes
            .iter()
            .find(|(t, _)| t.key == "static/1.js")
            .unwrap();
        match outcome {
            UploadOutcome::Failed { attempts, error } => {
                assert_eq!(*attempts, 3);
                assert!(error.contains("upload of static/1.js failed"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(store.upload_calls("static/1.js"), 3);

        let attempt_failures = events
            .iter()
            .filter(|e| matches!(e, DeployEvent::AttemptFailed { .. }))
            .count();
        assert_eq!(attempt_failures, 3);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, DeployEvent::FileFailed { key, .. } if key == "static/1.js"))
        );
    }

    #[tokio::test]
    async fn failure_does_not_cancel_siblings() {
        let store = MockStore::new().failing("static/0.js", u32::MAX);
        let (outcomes, _) = run(&scheduler(1, 2), &store, tasks(4)).await;

        let succeeded = outcomes
            .iter()
            .filter(|(_, o)| matches!(o, UploadOutcome::Success { .. }))
            .count();
        assert_eq!(succeeded, 3);
        for i in 1..4 {
            assert_eq!(store.upload_calls(&format!("static/{i}.js")), 1);
        }
    }

    #[tokio::test]
    async fn success_on_kth_attempt_stops_retrying() {
        let store = MockStore::new().failing("static/0.js", 2);
        let (outcomes, _) = run(&scheduler(1, 3), &store, tasks(1)).await;

        assert_eq!(outcomes[0].1, UploadOutcome::Success { attempts: 3 });
        assert_eq!(store.upload_calls("static/0.js"), 3);
    }

    #[tokio::test]
    async fn success_before_budget_issues_no_more_attempts() {
        let store = MockStore::new().failing("static/0.js", 1);
        let (outcomes, _) = run(&scheduler(1, 5), &store, tasks(1)).await;

        assert_eq!(outcomes[0].1, UploadOutcome::Success { attempts: 2 });
        assert_eq!(store.upload_calls("static/0.js"), 2);
    }

    #[tokio::test]
    async fn auth_rejection_is_not_retried() {
        let store = MockStore::new().rejecting_auth();
        let (outcomes, _) = run(&scheduler(2, 3), &store, tasks(2)).await;

        for (task, outcome) in &outcomes {
            assert!(matches!(outcome, UploadOutcome::Failed { attempts: 1, .. }));
            assert_eq!(store.upload_calls(&task.key), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retry_delay_is_applied_between_attempts() {
        let store = MockStore::new().failing("static/0.js", u32::MAX);
        let sched = UploadScheduler::new(&UploadOptions {
            parallel: 1,
            retry: 3,
            retry_delay: Duration::from_secs(1),
        });

        let start = tokio::time::Instant::now();
        run(&sched, &store, tasks(1)).await;
        // Two pauses between three attempts, none after the last.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(3), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn empty_task_set_returns_immediately() {
        let store = MockStore::new();
        let (outcomes, events) = run(&scheduler(3, 3), &store, Vec::new()).await;
        assert!(outcomes.is_empty());
        assert!(events.is_empty());
        assert!(store.calls().is_empty());
    }
}

//! Async batch task tracking.
//!
//! Records the lifecycle of batch parse jobs (`queued → processing →
//! done | failed`) in the backing store, independent of the result cache.
//! A task is created *before* the external request goes out, so a client
//! polling immediately after submission always finds a record. Updates are
//! last-writer-wins per task id; tasks never interact.

pub mod error;
pub mod types;


pub use error::TaskError;
pub use types::{BatchTask, FileManifestEntry, ResultSummary, TaskLookup, TaskStatus};

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::store::KvStore;

fn task_key(task_id: &str) -> String {
    format!("resume:task:{}", task_id)
}

/// Generates a unique, collision-resistant task id
/// (`batch_<utc-timestamp>_<uuid>`).
pub fn new_task_id() -> String {
    format!(
        "batch_{}_{}",
        Utc::now().format("%Y%m%d%H%M%S"),
        Uuid::new_v4().simple()
    )
}

/// Tracker for batch parse jobs over a [`KvStore`].
pub struct TaskTracker<S: KvStore> {
    store: S,
    ttl: Duration,
}

impl<S: KvStore> std::fmt::Debug for TaskTracker<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskTracker")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl<S: KvStore> TaskTracker<S> {
    pub fn new(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Creates a new task in `Queued` state and persists it.
    #[instrument(skip(self, file_manifest, metadata), fields(files = file_manifest.len()))]
    pub async fn create(
        &self,
        file_manifest: Vec<FileManifestEntry>,
        metadata: serde_json::Value,
    ) -> Result<BatchTask, TaskError> {
        let now = Utc::now();
        let task = BatchTask {
            task_id: new_task_id(),
            status: TaskStatus::Queued,
            file_manifest,
            metadata,
            created_at: now,
            updated_at: now,
            result_summary: None,
            failure_reason: None,
        };

        self.save(&task).await?;
        debug!(task_id = %task.task_id, "task created");
        Ok(task)
    }

    /// Marks a queued task as accepted by the gateway.
    pub async fn mark_processing(&self, task_id: &str) -> Result<BatchTask, TaskError> {
        self.update(task_id, |task| {
            task.status = TaskStatus::Processing;
        })
        .await
    }

    /// Completes a task with its result summary. Terminal afterwards.
    pub async fn complete(
        &self,
        task_id: &str,
        summary: ResultSummary,
    ) -> Result<BatchTask, TaskError> {
        self.update(task_id, |task| {
            task.status = TaskStatus::Done;
            task.result_summary = Some(summary);
        })
        .await
    }

    /// Fails a task with a reason. Terminal afterwards.
    pub async fn fail(&self, task_id: &str, reason: &str) -> Result<BatchTask, TaskError> {
        self.update(task_id, |task| {
            task.status = TaskStatus::Failed;
            task.failure_reason = Some(reason.to_string());
        })
        .await
    }

    /// Reads a task's current state. Side-effect-free and idempotent.
    ///
    /// Missing/expired records come back as [`TaskLookup::Unknown`] — never
    /// conflated with a task that exists in `Failed` state.
    #[instrument(skip(self))]
    pub async fn status(&self, task_id: &str) -> TaskLookup {
        match self.store.get(&task_key(task_id)).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<BatchTask>(&bytes) {
                Ok(task) => TaskLookup::Found(task),
                Err(e) => {
                    warn!(task_id, error = %e, "corrupt task record");
                    TaskLookup::Degraded {
                        reason: format!("corrupt record: {}", e),
                    }
                }
            },
            Ok(None) => TaskLookup::Unknown,
            Err(e) => {
                warn!(task_id, error = %e, "task status read failed");
                TaskLookup::Degraded {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn load(&self, task_id: &str) -> Result<BatchTask, TaskError> {
        let bytes = self
            .store
            .get(&task_key(task_id))
            .await?
            .ok_or_else(|| TaskError::NotFound {
                task_id: task_id.to_string(),
            })?;

        serde_json::from_slice(&bytes).map_err(|e| TaskError::Corrupt {
            task_id: task_id.to_string(),
            reason: e.to_string(),
        })
    }

    async fn save(&self, task: &BatchTask) -> Result<(), TaskError> {
        let bytes = serde_json::to_vec(task).map_err(|e| TaskError::Corrupt {
            task_id: task.task_id.clone(),
            reason: e.to_string(),
        })?;
        self.store.put(&task_key(&task.task_id), bytes, self.ttl).await?;
        Ok(())
    }

    /// Load-mutate-save on a single task. Terminal states reject updates;
    /// otherwise last-writer-wins, which is the contract for a single-writer
    /// owner per task.
    async fn update(
        &self,
        task_id: &str,
        apply: impl FnOnce(&mut BatchTask),
    ) -> Result<BatchTask, TaskError> {
        let mut task = self.load(task_id).await?;

        if task.status.is_terminal() {
            return Err(TaskError::Terminal {
                task_id: task_id.to_string(),
                status: task.status,
            });
        }

        apply(&mut task);
        task.updated_at = Utc::now();
        self.save(&task).await?;
        debug!(task_id, status = %task.status, "task updated");
        Ok(task)
    }
}

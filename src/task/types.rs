use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of an asynchronous batch parse job.
///
/// `Done` and `Failed` are terminal; a task in either state is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    Processing,
    Done,
    Failed,
}

impl TaskStatus {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Queued => "queued",
            TaskStatus::Processing => "processing",
            TaskStatus::Done => "done",
            TaskStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One file in a batch submission, as recorded at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileManifestEntry {
    pub filename: String,
    pub size_bytes: u64,
}

/// Aggregate counts recorded onto a task when its batch finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub rejected: usize,
}

/// A tracked batch parse job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchTask {
    pub task_id: String,
    pub status: TaskStatus,
    pub file_manifest: Vec<FileManifestEntry>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub result_summary: Option<ResultSummary>,
    /// Failure reason, set only when `status` is `Failed`.
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// Outcome of a task status read.
///
/// `Unknown` (missing or TTL-expired) is deliberately distinct from a task
/// that exists in `Failed` state, and `Degraded` is distinct from both.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskLookup {
    Found(BatchTask),
    Unknown,
    Degraded { reason: String },
}

impl TaskLookup {
    pub fn into_task(self) -> Option<BatchTask> {
        match self {
            TaskLookup::Found(task) => Some(task),
            TaskLookup::Unknown | TaskLookup::Degraded { .. } => None,
        }
    }
}

use thiserror::Error;

use crate::store::StoreError;

use super::types::TaskStatus;

/// Errors from task lifecycle updates.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task record is gone (never existed, or its TTL elapsed).
    #[error("task {task_id} not found (missing or expired)")]
    NotFound {
        /// Requested task id.
        task_id: String,
    },

    /// Update attempted on a task already in a terminal state.
    #[error("task {task_id} is already {status}; terminal states are immutable")]
    Terminal {
        /// Task id.
        task_id: String,
        /// The terminal status the task is in.
        status: TaskStatus,
    },

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored task record could not be decoded.
    #[error("corrupt task record for {task_id}: {reason}")]
    Corrupt {
        /// Task id.
        task_id: String,
        /// Decode error message.
        reason: String,
    },
}

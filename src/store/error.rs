use thiserror::Error;

/// Errors surfaced by a backing key-value store.
///
/// Callers on the cache path treat every variant as a soft failure and
/// degrade to full reprocessing; nothing here is a user-facing error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store did not answer within the bounded wait.
    #[error("store operation timed out after {waited_ms}ms")]
    Timeout {
        /// How long the caller waited.
        waited_ms: u64,
    },

    /// The store is unreachable or refused the operation.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Error message from the backing client.
        reason: String,
    },

    /// A stored value could not be decoded.
    #[error("corrupt value at {key}: {reason}")]
    Corrupt {
        /// Key the value was read from.
        key: String,
        /// Decode error message.
        reason: String,
    },
}

//! Failure-injecting store wrapper for exercising degraded paths.

use std::time::Duration;

use parking_lot::Mutex;

use super::{KvStore, MemoryStore, StoreError};

/// How the wrapped store should misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Delegate normally.
    Healthy,
    /// Every operation returns [`StoreError::Unavailable`].
    Errors,
    /// Every operation stalls for the given duration before delegating,
    /// long enough to trip a caller's bounded wait.
    Stall(Duration),
}

/// A [`MemoryStore`] that can be switched into failure or latency-injection
/// mode at any point mid-test.
pub struct FlakyStore {
    inner: MemoryStore,
    mode: Mutex<FailureMode>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            mode: Mutex::new(FailureMode::Healthy),
        }
    }

    /// Switches the failure mode; takes effect on the next operation.
    pub fn set_mode(&self, mode: FailureMode) {
        *self.mode.lock() = mode;
    }

    /// Direct access to the healthy inner store (bypasses injection).
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    async fn gate(&self) -> Result<(), StoreError> {
        let mode = *self.mode.lock();
        match mode {
            FailureMode::Healthy => Ok(()),
            FailureMode::Errors => Err(StoreError::Unavailable {
                reason: "injected failure".to_string(),
            }),
            FailureMode::Stall(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}

impl Default for FlakyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.gate().await?;
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        self.gate().await?;
        self.inner.put(key, value, ttl).await
    }

    async fn incr(&self, key: &str) -> Result<u64, StoreError> {
        self.gate().await?;
        self.inner.incr(key).await
    }

    async fn read_counter(&self, key: &str) -> Result<u64, StoreError> {
        self.gate().await?;
        self.inner.read_counter(key).await
    }
}

//! Backing key-value store seam.
//!
//! Everything shared and mutable (cache entries, task records, counters) goes
//! through [`KvStore`]: single-key `get` / `put`-with-TTL / atomic `incr`.
//! The bundled [`MemoryStore`] is the in-process implementation; remote
//! stores plug in behind the same trait with their own per-call timeouts.

pub mod error;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use memory::MemoryStore;
#[cfg(any(test, feature = "mock"))]
pub use mock::{FailureMode, FlakyStore};

use std::time::Duration;

/// Atomic single-key store operations.
///
/// All operations are single-key and atomic; no multi-step read-modify-write
/// sequence is ever required of callers. `incr` returns the post-increment
/// value and creates the counter at 1 when absent.
pub trait KvStore: Send + Sync {
    /// Fetches the value stored at `key`, if present and unexpired.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>, StoreError>> + Send;

    /// Stores `value` at `key` with the given TTL, overwriting any previous
    /// value (idempotent overwrite semantics).
    fn put(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Atomically increments the counter at `key` and returns the new value.
    fn incr(&self, key: &str) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;

    /// Reads a counter previously written by [`KvStore::incr`]. Absent
    /// counters read as 0.
    fn read_counter(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}

impl<S: KvStore> KvStore for std::sync::Arc<S> {
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>, StoreError>> + Send {
        (**self).get(key)
    }

    fn put(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send {
        (**self).put(key, value, ttl)
    }

    fn incr(&self, key: &str) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send {
        (**self).incr(key)
    }

    fn read_counter(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send {
        (**self).read_counter(key)
    }
}

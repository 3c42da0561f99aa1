//! In-process [`KvStore`] implementation.
//!
//! Values live in a `moka` cache with per-entry TTL; counters live in a
//! separate map so `incr` is a single locked add, never a read-modify-write
//! visible to callers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;
use parking_lot::Mutex;

use super::{KvStore, StoreError};

const DEFAULT_CAPACITY: u64 = 100_000;

struct PerEntryTtl;

impl Expiry<String, (Vec<u8>, Duration)> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &(Vec<u8>, Duration),
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.1)
    }
}

/// Shared in-memory store. `Clone` is cheap; clones see the same data.
#[derive(Clone)]
pub struct MemoryStore {
    entries: Cache<String, (Vec<u8>, Duration)>,
    counters: Arc<Mutex<HashMap<String, u64>>>,
}

impl MemoryStore {
    /// Creates a store with the default entry capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a store bounded to `capacity` entries (LRU beyond that).
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .expire_after(PerEntryTtl)
                .build(),
            counters: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Returns `true` if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries and counters.
    pub fn clear(&self) {
        self.entries.invalidate_all();
        self.counters.lock().clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.entries.entry_count())
            .field("counters", &self.counters.lock().len())
            .finish()
    }
}

impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).map(|(bytes, _ttl)| bytes))
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), (value, ttl));
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<u64, StoreError> {
        let mut counters = self.counters.lock();
        let slot = counters.entry(key.to_string()).or_insert(0);
        *slot += 1;
        Ok(*slot)
    }

    async fn read_counter(&self, key: &str) -> Result<u64, StoreError> {
        Ok(self.counters.lock().get(key).copied().unwrap_or(0))
    }
}

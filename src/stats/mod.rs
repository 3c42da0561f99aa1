//! Running counters and the stats aggregation over them.
//!
//! Components never touch counter keys directly; they hold an injected
//! [`Counters`] handle backed by the store's atomic `incr`. Increments are
//! deliberately infallible at the call site: a counter that cannot be bumped
//! is logged and dropped, never a request failure.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::{KvStore, StoreError};

/// Named monotonically-increasing counters. Additive mutation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    ResumesProcessed,
    CacheHits,
    CacheMisses,
    CacheOperations,
    ResumesFailed,
}

impl Counter {
    /// All counters, in reporting order.
    pub const ALL: [Counter; 5] = [
        Counter::ResumesProcessed,
        Counter::CacheHits,
        Counter::CacheMisses,
        Counter::CacheOperations,
        Counter::ResumesFailed,
    ];

    /// Stable store key for this counter.
    pub fn key(&self) -> &'static str {
        match self {
            Counter::ResumesProcessed => "stats:resumes_processed",
            Counter::CacheHits => "stats:cache_hits",
            Counter::CacheMisses => "stats:cache_misses",
            Counter::CacheOperations => "stats:cache_operations",
            Counter::ResumesFailed => "stats:resumes_failed",
        }
    }
}

/// Injected counter capability.
#[async_trait]
pub trait Counters: Send + Sync {
    /// Atomically increments `counter`. Store failures are swallowed (logged)
    /// so an unavailable stats backend never fails the request being counted.
    async fn incr(&self, counter: Counter);

    /// Reads the current value of `counter`.
    async fn read(&self, counter: Counter) -> Result<u64, StoreError>;
}

/// [`Counters`] backed by a [`KvStore`]'s atomic increment.
pub struct StoreCounters<S: KvStore> {
    store: S,
}

impl<S: KvStore> StoreCounters<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KvStore> std::fmt::Debug for StoreCounters<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCounters").finish_non_exhaustive()
    }
}

#[async_trait]
impl<S: KvStore> Counters for StoreCounters<S> {
    async fn incr(&self, counter: Counter) {
        if let Err(e) = self.store.incr(counter.key()).await {
            warn!(counter = counter.key(), error = %e, "counter increment dropped");
        }
    }

    async fn read(&self, counter: Counter) -> Result<u64, StoreError> {
        self.store.read_counter(counter.key()).await
    }
}

/// Point-in-time counter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub resumes_processed: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_operations: u64,
    pub resumes_failed: u64,
}

impl StatsSnapshot {
    /// `round(100 × hits / (hits + misses))`, 0 when there has been no
    /// cache activity at all.
    pub fn hit_rate_percent(&self) -> u32 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            return 0;
        }
        ((100.0 * self.cache_hits as f64) / total as f64).round() as u32
    }
}

/// Outcome of a stats query. All-zero counters are a valid [`Available`]
/// state, distinct from the backend being unreadable.
///
/// [`Available`]: StatsReport::Available
#[derive(Debug, Clone, PartialEq)]
pub enum StatsReport {
    Available(StatsSnapshot),
    Unavailable { reason: String },
}

impl StatsReport {
    pub fn is_available(&self) -> bool {
        matches!(self, StatsReport::Available(_))
    }

    pub fn snapshot(&self) -> Option<&StatsSnapshot> {
        match self {
            StatsReport::Available(snapshot) => Some(snapshot),
            StatsReport::Unavailable { .. } => None,
        }
    }
}

/// Read-only aggregation over the shared counters.
pub struct StatsAggregator {
    counters: Arc<dyn Counters>,
}

impl StatsAggregator {
    pub fn new(counters: Arc<dyn Counters>) -> Self {
        Self { counters }
    }

    /// Reads all counters. Any single read failure makes the whole report
    /// [`StatsReport::Unavailable`] rather than a partially-zeroed snapshot.
    pub async fn report(&self) -> StatsReport {
        let mut values = [0u64; Counter::ALL.len()];
        for (slot, counter) in values.iter_mut().zip(Counter::ALL) {
            match self.counters.read(counter).await {
                Ok(v) => *slot = v,
                Err(e) => {
                    warn!(counter = counter.key(), error = %e, "stats read failed");
                    return StatsReport::Unavailable {
                        reason: e.to_string(),
                    };
                }
            }
        }

        StatsReport::Available(StatsSnapshot {
            resumes_processed: values[0],
            cache_hits: values[1],
            cache_misses: values[2],
            cache_operations: values[3],
            resumes_failed: values[4],
        })
    }
}

impl std::fmt::Debug for StatsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsAggregator").finish_non_exhaustive()
    }
}

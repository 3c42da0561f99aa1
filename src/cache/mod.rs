//! Content-addressed result cache.
//!
//! Maps a file [`Fingerprint`] to the parse result computed for it, with TTL
//! and hit/miss accounting. Caching is an optimization, never a correctness
//! dependency: every backend failure degrades to a miss and the caller
//! reprocesses in full.

pub mod types;


pub use types::{CacheEntry, Lookup, PutOutcome};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::fingerprint::Fingerprint;
use crate::payload::ParsedResume;
use crate::stats::{Counter, Counters};
use crate::store::KvStore;

fn result_key(fingerprint: &Fingerprint) -> String {
    format!("resume:result:{}", fingerprint)
}

/// Fingerprint-keyed cache of parse results over a [`KvStore`].
pub struct ResultCache<S: KvStore> {
    store: S,
    counters: Arc<dyn Counters>,
    read_timeout: Duration,
}

impl<S: KvStore> std::fmt::Debug for ResultCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}

impl<S: KvStore> ResultCache<S> {
    pub fn new(store: S, counters: Arc<dyn Counters>, read_timeout: Duration) -> Self {
        Self {
            store,
            counters,
            read_timeout,
        }
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Looks up the parse result for `fingerprint`.
    ///
    /// The read is bounded by `read_timeout`; timeout and backend errors come
    /// back as [`Lookup::Degraded`], counted as misses. Entries past their
    /// `expires_at` are reported as [`Lookup::Miss`].
    #[instrument(skip(self), fields(fingerprint = %fingerprint))]
    pub async fn get(&self, fingerprint: &Fingerprint) -> Lookup {
        let key = result_key(fingerprint);

        let raw = match timeout(self.read_timeout, self.store.get(&key)).await {
            Err(_elapsed) => {
                warn!(waited_ms = self.read_timeout.as_millis() as u64, "cache read timed out");
                self.counters.incr(Counter::CacheMisses).await;
                return Lookup::Degraded {
                    reason: format!("read timed out after {}ms", self.read_timeout.as_millis()),
                };
            }
            Ok(Err(e)) => {
                warn!(error = %e, "cache read failed");
                self.counters.incr(Counter::CacheMisses).await;
                return Lookup::Degraded {
                    reason: e.to_string(),
                };
            }
            Ok(Ok(raw)) => raw,
        };

        let Some(bytes) = raw else {
            debug!("cache miss");
            self.counters.incr(Counter::CacheMisses).await;
            return Lookup::Miss;
        };

        match serde_json::from_slice::<CacheEntry>(&bytes) {
            Ok(entry) if !entry.is_expired(Utc::now()) => {
                debug!("cache hit");
                self.counters.incr(Counter::CacheHits).await;
                Lookup::Hit(entry)
            }
            Ok(_) => {
                // TTL elapsed but the backend had not evicted yet.
                debug!("cache entry expired, treating as miss");
                self.counters.incr(Counter::CacheMisses).await;
                Lookup::Miss
            }
            Err(e) => {
                warn!(error = %e, "corrupt cache entry");
                self.counters.incr(Counter::CacheMisses).await;
                Lookup::Degraded {
                    reason: format!("corrupt entry: {}", e),
                }
            }
        }
    }

    /// Stores `payload` under `fingerprint` with the given TTL.
    ///
    /// Idempotent overwrite; re-caching an already-cached fingerprint is
    /// harmless. Backend failures are soft ([`PutOutcome::Degraded`]).
    #[instrument(skip(self, payload), fields(fingerprint = %fingerprint))]
    pub async fn put(
        &self,
        fingerprint: &Fingerprint,
        payload: ParsedResume,
        ttl: Duration,
    ) -> PutOutcome {
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(chrono::DateTime::<Utc>::MAX_UTC);
        let entry = CacheEntry {
            fingerprint: *fingerprint,
            payload,
            stored_at: now,
            expires_at,
        };

        let bytes = match serde_json::to_vec(&entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "failed to encode cache entry");
                return PutOutcome::Degraded {
                    reason: e.to_string(),
                };
            }
        };

        match timeout(self.read_timeout, self.store.put(&result_key(fingerprint), bytes, ttl)).await
        {
            Ok(Ok(())) => {
                self.counters.incr(Counter::CacheOperations).await;
                PutOutcome::Stored
            }
            Ok(Err(e)) => {
                warn!(error = %e, "cache write failed");
                PutOutcome::Degraded {
                    reason: e.to_string(),
                }
            }
            Err(_elapsed) => {
                warn!("cache write timed out");
                PutOutcome::Degraded {
                    reason: "write timed out".to_string(),
                }
            }
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;
use crate::payload::ParsedResume;

/// A parse result stored under its file fingerprint.
///
/// Owned exclusively by the result cache: created on first successful parse,
/// overwritten only by a fresh parse of the same fingerprint, logically gone
/// once `expires_at` passes (lazy expiry on read, no eviction sweep).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub payload: ParsedResume,
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Returns `true` once the entry's TTL has elapsed at `now`.
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Outcome of a cache read. Every call site handles all three cases; there is
/// no null/except path for an unavailable backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Fresh entry found.
    Hit(CacheEntry),
    /// Nothing (unexpired) stored under the fingerprint.
    Miss,
    /// The backend failed or timed out; caller proceeds as if missed.
    Degraded {
        /// What went wrong, for logging.
        reason: String,
    },
}

impl Lookup {
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }

    #[inline]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Lookup::Degraded { .. })
    }

    /// Consumes the lookup, yielding the entry on a hit.
    pub fn into_entry(self) -> Option<CacheEntry> {
        match self {
            Lookup::Hit(entry) => Some(entry),
            Lookup::Miss | Lookup::Degraded { .. } => None,
        }
    }
}

/// Outcome of a cache write. A degraded write is soft: the computed result is
/// still returned to the caller, it just was not cached.
#[derive(Debug, Clone, PartialEq)]
pub enum PutOutcome {
    Stored,
    Degraded { reason: String },
}

impl PutOutcome {
    #[inline]
    pub fn is_stored(&self) -> bool {
        matches!(self, PutOutcome::Stored)
    }
}

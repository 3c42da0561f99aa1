//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary values (e.g. `Duration`s) from the primary
//! second/byte counts to avoid drift.

use std::time::Duration;

/// TTL for cached parse results (24 h).
pub const RESULT_TTL_SECS: u64 = 86_400;
/// TTL for batch-task records (2 h). Tasks are transient coordination state,
/// not durable results, so they expire much sooner than parse results.
pub const TASK_TTL_SECS: u64 = 7_200;

/// Bounded wait for a single cache read before degrading to a miss.
pub const CACHE_READ_TIMEOUT_MS: u64 = 3_000;
/// Bounded wait for a single gateway (parse / similarity) call.
pub const GATEWAY_TIMEOUT_MS: u64 = 30_000;

/// Upper bound on concurrent cache probes during batch dedup.
pub const DEFAULT_PROBE_CONCURRENCY: usize = 8;

/// Files below this size are rejected before fingerprinting.
pub const MIN_FILE_BYTES: usize = 100;
/// Default upper bound on accepted file size (10 MiB).
pub const DEFAULT_MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Weight of the preferred-skills bonus inside the lexical overlap score.
/// The required-skills fraction carries the rest of the lexical term.
pub const PREFERRED_SKILL_WEIGHT: f32 = 0.2;

/// Default mixing coefficient between semantic and lexical scores.
pub const DEFAULT_SEMANTIC_WEIGHT: f32 = 0.7;
/// Default admission threshold for shortlisting.
pub const DEFAULT_MINIMUM_SCORE: f32 = 0.5;

#[inline]
pub const fn result_ttl() -> Duration {
    Duration::from_secs(RESULT_TTL_SECS)
}

#[inline]
pub const fn task_ttl() -> Duration {
    Duration::from_secs(TASK_TTL_SECS)
}

#[inline]
pub const fn cache_read_timeout() -> Duration {
    Duration::from_millis(CACHE_READ_TIMEOUT_MS)
}

#[inline]
pub const fn gateway_timeout() -> Duration {
    Duration::from_millis(GATEWAY_TIMEOUT_MS)
}

//! Sift library crate (used by service frontends and integration tests).
//!
//! Resume-ingestion pipeline: content-addressed deduplication over a result
//! cache, batch task tracking, and multi-criteria candidate scoring.
//!
//! # Public API Surface
//!
//! ## Ingest & Dedup
//! - [`DedupCoordinator`], [`BatchReport`], [`FileOutcome`] - Batch pipeline
//! - [`ResultCache`], [`Lookup`], [`PutOutcome`] - Fingerprint-keyed cache
//! - [`fingerprint_content`], [`fingerprint_identity`] - Content addressing
//!
//! ## External Seams
//! - [`ParseGateway`], [`SimilarityProvider`] - Service contracts
//! - [`HttpParseGateway`], [`HttpSimilarityProvider`] - HTTP adapters
//! - [`KvStore`], [`MemoryStore`] - Storage seam
//!
//! ## Tasks & Stats
//! - [`TaskTracker`], [`BatchTask`], [`TaskLookup`] - Async batch tracking
//! - [`StatsAggregator`], [`StatsReport`], [`Counters`] - Shared counters
//!
//! ## Scoring
//! - [`ScoringEngine`], [`Criteria`], [`ScoreResult`] - Candidate shortlisting
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod fingerprint;
pub mod gateway;
pub mod ingest;
pub mod payload;
pub mod scoring;
pub mod stats;
pub mod store;
pub mod task;

pub use cache::{CacheEntry, Lookup, PutOutcome, ResultCache};
pub use config::{Config, ConfigError, DEFAULT_GATEWAY_URL, DEFAULT_SIMILARITY_URL};
pub use fingerprint::{Fingerprint, fingerprint_content, fingerprint_identity};
pub use gateway::{
    GatewayError, HttpParseGateway, HttpSimilarityProvider, ParseGateway, ResumeFile,
    SimilarityProvider,
};
#[cfg(any(test, feature = "mock"))]
pub use gateway::{MockParseGateway, MockSimilarityProvider};
pub use ingest::{
    BatchReport, DedupCoordinator, FileOutcome, FileStatus, IngestError, ValidationError, validate,
};
pub use payload::{EducationEntry, ParsedResume, WorkExperienceEntry};
pub use scoring::{
    CandidateRecord, Criteria, PredictedStatus, ScoreBreakdown, ScoreResult, ScoringEngine,
    ScoringError,
};
pub use stats::{Counter, Counters, StatsAggregator, StatsReport, StatsSnapshot, StoreCounters};
#[cfg(any(test, feature = "mock"))]
pub use store::{FailureMode, FlakyStore};
pub use store::{KvStore, MemoryStore, StoreError};
pub use task::{
    BatchTask, FileManifestEntry, ResultSummary, TaskError, TaskLookup, TaskStatus, TaskTracker,
    new_task_id,
};

//! Deduplicating ingest pipeline.
//!
//! Each file is validated, fingerprinted, and probed against the result
//! cache; only the files the cache cannot answer go out to the parse gateway,
//! in a single batch call. A degraded cache widens that batch instead of
//! failing the request.

mod error;
mod types;


pub use error::{IngestError, ValidationError};
pub use types::{BatchReport, FileOutcome, FileStatus};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, instrument};

use crate::cache::{Lookup, ResultCache};
use crate::constants::{self, DEFAULT_MAX_FILE_BYTES, DEFAULT_PROBE_CONCURRENCY, MIN_FILE_BYTES};
use crate::fingerprint::{Fingerprint, fingerprint_content};
use crate::gateway::{ParseGateway, ResumeFile};
use crate::stats::{Counter, Counters};
use crate::store::KvStore;

const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

/// Checks extension, size bounds, and content magic before any parsing cost
/// is paid. Plain-text files have no magic to check.
pub fn validate(file: &ResumeFile, max_bytes: usize) -> Result<(), ValidationError> {
    let extension = file
        .extension()
        .ok_or_else(|| ValidationError::UnsupportedExtension {
            extension: "(none)".to_string(),
        })?;
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::UnsupportedExtension { extension });
    }

    let size_bytes = file.bytes.len();
    if size_bytes < MIN_FILE_BYTES {
        return Err(ValidationError::TooSmall {
            size_bytes,
            min_bytes: MIN_FILE_BYTES,
        });
    }
    if size_bytes > max_bytes {
        return Err(ValidationError::TooLarge {
            size_bytes,
            max_bytes,
        });
    }

    let magic_ok = match extension.as_str() {
        "pdf" => file.bytes.starts_with(b"%PDF-"),
        "docx" => file.bytes.starts_with(b"PK\x03\x04"),
        "doc" => file.bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]),
        _ => true,
    };
    if !magic_ok {
        return Err(ValidationError::MagicMismatch { extension });
    }

    Ok(())
}

/// Dedup front of the pipeline: cache first, gateway for the remainder.
pub struct DedupCoordinator<S: KvStore> {
    cache: ResultCache<S>,
    gateway: Arc<dyn ParseGateway>,
    counters: Arc<dyn Counters>,
    probe_concurrency: usize,
    result_ttl: Duration,
    max_file_bytes: usize,
}

impl<S: KvStore> std::fmt::Debug for DedupCoordinator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupCoordinator")
            .field("probe_concurrency", &self.probe_concurrency)
            .field("result_ttl", &self.result_ttl)
            .field("max_file_bytes", &self.max_file_bytes)
            .finish_non_exhaustive()
    }
}

impl<S: KvStore> DedupCoordinator<S> {
    pub fn new(
        cache: ResultCache<S>,
        gateway: Arc<dyn ParseGateway>,
        counters: Arc<dyn Counters>,
    ) -> Self {
        Self {
            cache,
            gateway,
            counters,
            probe_concurrency: DEFAULT_PROBE_CONCURRENCY,
            result_ttl: constants::result_ttl(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }

    /// Caps how many cache probes run at once during a batch.
    pub fn with_probe_concurrency(mut self, probes: usize) -> Self {
        self.probe_concurrency = probes.max(1);
        self
    }

    pub fn with_result_ttl(mut self, ttl: Duration) -> Self {
        self.result_ttl = ttl;
        self
    }

    pub fn with_max_file_bytes(mut self, max_bytes: usize) -> Self {
        self.max_file_bytes = max_bytes;
        self
    }

    /// Ingests a single file: validation and parse failures are hard errors
    /// here, unlike in [`process_batch`](Self::process_batch) where they are
    /// isolated per file.
    #[instrument(skip(self, file), fields(filename = %file.filename))]
    pub async fn process_one(&self, file: ResumeFile) -> Result<FileOutcome, IngestError> {
        validate(&file, self.max_file_bytes)?;
        let fingerprint = fingerprint_content(&file.bytes);

        if let Lookup::Hit(entry) = self.cache.get(&fingerprint).await {
            // Replays are accounted through cache_hits, not resumes_processed:
            // that counter tracks actual gateway parses only.
            debug!("replaying cached parse result");
            return Ok(FileOutcome {
                filename: file.filename,
                fingerprint: Some(fingerprint),
                from_cache: true,
                status: FileStatus::Parsed {
                    payload: entry.payload,
                },
            });
        }

        let payload = match self.gateway.parse(&file).await {
            Ok(payload) => payload,
            Err(e) => {
                self.counters.incr(Counter::ResumesFailed).await;
                return Err(IngestError::Gateway(e));
            }
        };
        self.cache
            .put(&fingerprint, payload.clone(), self.result_ttl)
            .await;
        self.counters.incr(Counter::ResumesProcessed).await;

        Ok(FileOutcome {
            filename: file.filename,
            fingerprint: Some(fingerprint),
            from_cache: false,
            status: FileStatus::Parsed { payload },
        })
    }

    /// Ingests a batch. Validation rejects up front, cache hits short-circuit,
    /// and whatever remains goes to the gateway in at most one batch call.
    /// Outcomes come back in input order.
    #[instrument(skip_all, fields(files = files.len()))]
    pub async fn process_batch(&self, files: Vec<ResumeFile>) -> BatchReport {
        let total = files.len();
        let mut slots: Vec<Option<FileOutcome>> = (0..total).map(|_| None).collect();
        let mut valid: Vec<(usize, Fingerprint, ResumeFile)> = Vec::with_capacity(total);

        for (idx, file) in files.into_iter().enumerate() {
            match validate(&file, self.max_file_bytes) {
                Ok(()) => {
                    let fingerprint = fingerprint_content(&file.bytes);
                    valid.push((idx, fingerprint, file));
                }
                Err(e) => {
                    debug!(filename = %file.filename, reason = %e, "file rejected");
                    slots[idx] = Some(FileOutcome {
                        filename: file.filename,
                        fingerprint: None,
                        from_cache: false,
                        status: FileStatus::Rejected {
                            reason: e.to_string(),
                        },
                    });
                }
            }
        }

        // Bounded-concurrency cache probes; a slow backend cannot stampede.
        let mut lookups: HashMap<usize, Lookup> = stream::iter(
            valid
                .iter()
                .map(|(idx, fingerprint, _)| async move {
                    (*idx, self.cache.get(fingerprint).await)
                }),
        )
        .buffer_unordered(self.probe_concurrency)
        .collect()
        .await;

        let mut pending: Vec<(usize, Fingerprint)> = Vec::new();
        let mut pending_files: Vec<ResumeFile> = Vec::new();
        for (idx, fingerprint, file) in valid {
            match lookups.remove(&idx) {
                Some(Lookup::Hit(entry)) => {
                    slots[idx] = Some(FileOutcome {
                        filename: file.filename,
                        fingerprint: Some(fingerprint),
                        from_cache: true,
                        status: FileStatus::Parsed {
                            payload: entry.payload,
                        },
                    });
                }
                // Miss and Degraded both fall through to the gateway.
                _ => {
                    pending.push((idx, fingerprint));
                    pending_files.push(file);
                }
            }
        }

        if !pending_files.is_empty() {
            let parses = self.gateway.parse_batch(&pending_files).await;
            for (((idx, fingerprint), file), parse) in
                pending.into_iter().zip(pending_files).zip(parses)
            {
                let status = match parse {
                    Ok(payload) => {
                        self.cache
                            .put(&fingerprint, payload.clone(), self.result_ttl)
                            .await;
                        self.counters.incr(Counter::ResumesProcessed).await;
                        FileStatus::Parsed { payload }
                    }
                    Err(e) => {
                        self.counters.incr(Counter::ResumesFailed).await;
                        FileStatus::Failed {
                            reason: e.to_string(),
                        }
                    }
                };
                slots[idx] = Some(FileOutcome {
                    filename: file.filename,
                    fingerprint: Some(fingerprint),
                    from_cache: false,
                    status,
                });
            }
        }

        let outcomes = slots.into_iter().flatten().collect();
        let report = BatchReport::from_outcomes(outcomes);
        info!(
            total = report.total,
            successful = report.successful,
            duplicates = report.duplicates,
            failed = report.failed,
            rejected = report.rejected,
            "batch ingest complete"
        );
        report
    }
}

use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;
use crate::payload::ParsedResume;

/// Terminal state of one file within a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FileStatus {
    /// Parsed successfully, either fresh or replayed from the cache.
    Parsed { payload: ParsedResume },
    /// Rejected by validation before any parsing was attempted.
    Rejected { reason: String },
    /// The parse itself failed.
    Failed { reason: String },
}

/// Per-file ingest outcome. Batch reports carry these in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub filename: String,
    /// Absent only for files rejected before fingerprinting.
    pub fingerprint: Option<Fingerprint>,
    /// `true` when the payload was replayed from the cache instead of parsed.
    pub from_cache: bool,
    pub status: FileStatus,
}

impl FileOutcome {
    #[inline]
    pub fn is_parsed(&self) -> bool {
        matches!(self.status, FileStatus::Parsed { .. })
    }

    pub fn payload(&self) -> Option<&ParsedResume> {
        match &self.status {
            FileStatus::Parsed { payload } => Some(payload),
            _ => None,
        }
    }
}

/// Aggregate view of one batch run.
///
/// `successful` counts parsed files (cached or fresh), `duplicates` is the
/// cached subset of those, and `rejected` files never reached the parser, so
/// `total = successful + failed + rejected`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub rejected: usize,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub(crate) fn from_outcomes(outcomes: Vec<FileOutcome>) -> Self {
        let mut successful = 0;
        let mut failed = 0;
        let mut duplicates = 0;
        let mut rejected = 0;
        for outcome in &outcomes {
            match &outcome.status {
                FileStatus::Parsed { .. } => {
                    successful += 1;
                    if outcome.from_cache {
                        duplicates += 1;
                    }
                }
                FileStatus::Failed { .. } => failed += 1,
                FileStatus::Rejected { .. } => rejected += 1,
            }
        }
        Self {
            total: outcomes.len(),
            successful,
            failed,
            duplicates,
            rejected,
            outcomes,
        }
    }
}

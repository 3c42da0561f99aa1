use thiserror::Error;

use crate::gateway::GatewayError;

/// Pre-parse validation failures. These reject the file before it costs a
/// fingerprint, a cache probe, or a gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported file extension: {extension}")]
    UnsupportedExtension { extension: String },

    #[error("file too small: {size_bytes} bytes (minimum {min_bytes})")]
    TooSmall { size_bytes: usize, min_bytes: usize },

    #[error("file too large: {size_bytes} bytes (limit {max_bytes})")]
    TooLarge { size_bytes: usize, max_bytes: usize },

    #[error("content does not look like a {extension} file")]
    MagicMismatch { extension: String },
}

/// Failure of a single-file ingest. Batch ingestion never returns this;
/// there, failures are isolated per file in the batch report.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("parse failed: {0}")]
    Gateway(#[from] GatewayError),
}

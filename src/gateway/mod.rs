//! External service contracts.
//!
//! The expensive work lives outside this crate: OCR/LLM extraction behind
//! [`ParseGateway`], and the embedding similarity signal behind
//! [`SimilarityProvider`]. Both are consumed as black boxes; the crate only
//! defines the contracts, thin HTTP adapters, and mocks.

pub mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::GatewayError;
pub use http::{HttpParseGateway, HttpSimilarityProvider};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockParseGateway, MockSimilarityProvider};

use async_trait::async_trait;

use crate::payload::ParsedResume;

/// An uploaded file handed to the pipeline: original name plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Lowercased extension, if the filename has one.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Contract of the external OCR/LLM extraction service.
///
/// Calls may take seconds. No retry loop lives on this side of the seam;
/// retries, if any, are the gateway's own responsibility.
#[async_trait]
pub trait ParseGateway: Send + Sync {
    /// Extracts structured fields from a single file.
    async fn parse(&self, file: &ResumeFile) -> Result<ParsedResume, GatewayError>;

    /// Extracts structured fields for a batch in one call. Results are
    /// positional: `result[i]` belongs to `files[i]`, and one file's failure
    /// never poisons its siblings.
    async fn parse_batch(&self, files: &[ResumeFile]) -> Vec<Result<ParsedResume, GatewayError>>;
}

/// Contract of the external embedding/LLM similarity service.
#[async_trait]
pub trait SimilarityProvider: Send + Sync {
    /// Similarity in `[0, 1]` between a job description and a candidate
    /// profile text.
    async fn similarity(&self, query: &str, profile: &str) -> Result<f32, GatewayError>;
}

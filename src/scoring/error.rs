use thiserror::Error;

/// Errors surfaced by the scoring engine.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Criteria failed range validation before any candidate was touched.
    #[error("invalid criteria: {reason}")]
    InvalidCriteria { reason: String },
}

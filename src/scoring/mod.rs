//! Multi-criteria candidate scoring.
//!
//! Combines a lexical skill-overlap term with a semantic similarity term
//! from an injected [`SimilarityProvider`](crate::gateway::SimilarityProvider),
//! then classifies candidates against a minimum score and an optional
//! shortlist cap. Hard filters (experience, education, location) are
//! advisory: they annotate the result but never zero the score on their own.

mod engine;
mod error;
mod types;

pub use engine::{ScoringEngine, SkillOverlap, combine, lexical_score, skill_overlap};
pub use error::ScoringError;
pub use types::{CandidateRecord, Criteria, PredictedStatus, ScoreBreakdown, ScoreResult};

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MINIMUM_SCORE, DEFAULT_SEMANTIC_WEIGHT};
use crate::payload::{EducationEntry, WorkExperienceEntry};

use super::error::ScoringError;

/// Job requirements for one scoring invocation. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    /// Skills the role requires. Empty means the lexical term is vacuously
    /// satisfied and the score leans entirely on the semantic term.
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub min_experience: Option<u32>,
    #[serde(default)]
    pub max_experience: Option<u32>,
    #[serde(default)]
    pub education_level: Option<String>,
    #[serde(default)]
    pub education_field: Option<String>,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    /// Admission threshold in `[0, 1]`.
    pub minimum_score: f32,
    /// Mixing coefficient between the semantic and lexical terms, in `[0, 1]`.
    pub semantic_weight: f32,
    /// Cap on how many candidates may be shortlisted. `None` means uncapped.
    #[serde(default)]
    pub max_shortlisted: Option<usize>,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            job_title: None,
            job_description: None,
            required_skills: Vec::new(),
            preferred_skills: Vec::new(),
            min_experience: None,
            max_experience: None,
            education_level: None,
            education_field: None,
            preferred_locations: Vec::new(),
            minimum_score: DEFAULT_MINIMUM_SCORE,
            semantic_weight: DEFAULT_SEMANTIC_WEIGHT,
            max_shortlisted: None,
        }
    }
}

impl Criteria {
    /// Checks range invariants.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !(0.0..=1.0).contains(&self.minimum_score) {
            return Err(ScoringError::InvalidCriteria {
                reason: format!("minimum_score {} outside [0, 1]", self.minimum_score),
            });
        }
        if !(0.0..=1.0).contains(&self.semantic_weight) {
            return Err(ScoringError::InvalidCriteria {
                reason: format!("semantic_weight {} outside [0, 1]", self.semantic_weight),
            });
        }
        if let (Some(min), Some(max)) = (self.min_experience, self.max_experience) {
            if min > max {
                return Err(ScoringError::InvalidCriteria {
                    reason: format!("min_experience {} exceeds max_experience {}", min, max),
                });
            }
        }
        Ok(())
    }

    /// Flattens the criteria into a job-description text for the semantic
    /// comparison.
    pub fn job_text(&self) -> String {
        let mut parts = Vec::new();

        if let Some(title) = &self.job_title {
            parts.push(format!("Job Title: {}", title));
        }
        if let Some(description) = &self.job_description {
            parts.push(format!("Job Description: {}", description));
        }
        if !self.required_skills.is_empty() {
            parts.push(format!("Required Skills: {}", self.required_skills.join(", ")));
        }
        if !self.preferred_skills.is_empty() {
            parts.push(format!(
                "Preferred Skills: {}",
                self.preferred_skills.join(", ")
            ));
        }
        if let Some(min) = self.min_experience {
            let mut line = format!("Minimum Experience: {} years", min);
            if let Some(max) = self.max_experience {
                line.push_str(&format!(" to {} years", max));
            }
            parts.push(line);
        }
        if let Some(level) = &self.education_level {
            parts.push(format!("Education Level: {}", level));
        }
        if let Some(field) = &self.education_field {
            parts.push(format!("Education Field: {}", field));
        }
        if !self.preferred_locations.is_empty() {
            parts.push(format!(
                "Preferred Locations: {}",
                self.preferred_locations.join(", ")
            ));
        }

        if parts.is_empty() {
            "General position requirements".to_string()
        } else {
            parts.join("\n")
        }
    }
}

/// Candidate data read from the external persistence store. Consumed
/// read-only; the engine never writes candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub candidate_id: i64,
    pub full_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub years_experience: u32,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperienceEntry>,
}

impl CandidateRecord {
    /// Profile text for the semantic comparison.
    pub fn profile_text(&self) -> String {
        let education: Vec<String> = self
            .education
            .iter()
            .map(|e| format!("{} from {}", e.degree, e.institution))
            .collect();
        let experience: Vec<String> = self
            .work_experience
            .iter()
            .map(|w| format!("{} at {} ({})", w.position, w.company, w.duration))
            .collect();

        format!(
            "Candidate: {}\nYears of Experience: {}\nLocation: {}\nEducation: {}\nSkills: {}\nWork Experience: {}",
            self.full_name,
            self.years_experience,
            self.location,
            education.join("; "),
            self.skills.join(", "),
            experience.join("; "),
        )
    }
}

/// Two-valued classification. Capacity rejections stay `Rejected` here and
/// surface through [`ScoreBreakdown::capacity_rejected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictedStatus {
    Shortlisted,
    Rejected,
}

/// Per-criterion numeric contributions behind a combined score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Fraction of required skills present, in `[0, 1]`.
    pub skill_overlap: f32,
    /// Preferred-skills bonus actually applied.
    pub preferred_bonus: f32,
    /// Combined lexical term (overlap + bonus, clamped).
    pub lexical_score: f32,
    /// Semantic similarity term (0 when degraded).
    pub semantic_score: f32,
    /// `true` when the similarity provider failed and the semantic term
    /// defaulted to 0.
    pub semantic_degraded: bool,
    /// Advisory experience gate: `false` when outside the criteria bounds.
    pub experience_in_range: bool,
    /// Advisory education gate: `false` when constraints were set and unmet.
    pub education_matched: bool,
    /// Location preference, when one was expressed.
    pub location_matched: Option<bool>,
    /// Cleared `minimum_score` but lost the `max_shortlisted` cap.
    pub capacity_rejected: bool,
}

/// One candidate's scoring outcome. Never mutated after return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub candidate_id: i64,
    pub candidate_name: String,
    /// Combined score in `[0, 1]`.
    pub combined_score: f32,
    pub predicted_status: PredictedStatus,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

impl ScoreResult {
    #[inline]
    pub fn is_shortlisted(&self) -> bool {
        self.predicted_status == PredictedStatus::Shortlisted
    }
}

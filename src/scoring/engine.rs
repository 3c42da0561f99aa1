use std::cmp::Ordering;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, instrument, warn};

use crate::constants::PREFERRED_SKILL_WEIGHT;
use crate::gateway::SimilarityProvider;

use super::error::ScoringError;
use super::types::{CandidateRecord, Criteria, PredictedStatus, ScoreBreakdown, ScoreResult};

/// Lexical skill comparison between a criteria list and a candidate's skills.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillOverlap {
    /// Fraction of required skills present. 1.0 when no skills are required.
    pub required_fraction: f32,
    /// Fraction of preferred skills present. 0.0 when none are listed.
    pub preferred_fraction: f32,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Case-insensitive overlap of required and preferred skills against a
/// candidate's skill list. Pure: same inputs, same output.
pub fn skill_overlap(
    required: &[String],
    preferred: &[String],
    candidate_skills: &[String],
) -> SkillOverlap {
    let have: Vec<String> = candidate_skills.iter().map(|s| normalize(s)).collect();
    let has = |skill: &str| have.iter().any(|h| h == &normalize(skill));

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for skill in required {
        if has(skill) {
            matched.push(skill.clone());
        } else {
            missing.push(skill.clone());
        }
    }

    let required_fraction = if required.is_empty() {
        1.0
    } else {
        matched.len() as f32 / required.len() as f32
    };

    let preferred_hits = preferred.iter().filter(|s| has(s)).count();
    let preferred_fraction = if preferred.is_empty() {
        0.0
    } else {
        preferred_hits as f32 / preferred.len() as f32
    };

    SkillOverlap {
        required_fraction,
        preferred_fraction,
        matched,
        missing,
    }
}

/// Lexical term: required-skill overlap plus a weighted preferred-skill
/// bonus, clamped to `[0, 1]`.
pub fn lexical_score(overlap: &SkillOverlap) -> f32 {
    let raw = overlap.required_fraction + PREFERRED_SKILL_WEIGHT * overlap.preferred_fraction;
    raw.clamp(0.0, 1.0)
}

/// Weighted mix of the semantic and lexical terms, clamped to `[0, 1]`.
pub fn combine(semantic_weight: f32, semantic: f32, lexical: f32) -> f32 {
    (semantic_weight * semantic + (1.0 - semantic_weight) * lexical).clamp(0.0, 1.0)
}

/// Scores candidates against criteria and classifies them. Holds only the
/// similarity seam; everything else is pure arithmetic over the inputs.
pub struct ScoringEngine {
    provider: Arc<dyn SimilarityProvider>,
}

impl ScoringEngine {
    pub fn new(provider: Arc<dyn SimilarityProvider>) -> Self {
        Self { provider }
    }

    /// Scores every candidate, sorts by combined score descending (ties by
    /// candidate id ascending), then applies the threshold and shortlist cap.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub async fn score(
        &self,
        criteria: &Criteria,
        candidates: &[CandidateRecord],
    ) -> Result<Vec<ScoreResult>, ScoringError> {
        criteria.validate()?;

        let job_text = criteria.job_text();
        let mut results: Vec<ScoreResult> = join_all(
            candidates
                .iter()
                .map(|candidate| self.score_one(criteria, &job_text, candidate)),
        )
        .await;

        results.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.candidate_id.cmp(&b.candidate_id))
        });

        let mut shortlisted = 0usize;
        for result in &mut results {
            if result.combined_score < criteria.minimum_score {
                continue;
            }
            let within_cap = criteria
                .max_shortlisted
                .map_or(true, |cap| shortlisted < cap);
            if within_cap {
                result.predicted_status = PredictedStatus::Shortlisted;
                shortlisted += 1;
            } else {
                result.breakdown.capacity_rejected = true;
                result
                    .weaknesses
                    .push("cleared the minimum score but the shortlist was full".to_string());
            }
        }

        debug!(
            shortlisted,
            total = results.len(),
            "scoring pass complete"
        );
        Ok(results)
    }

    async fn score_one(
        &self,
        criteria: &Criteria,
        job_text: &str,
        candidate: &CandidateRecord,
    ) -> ScoreResult {
        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();

        let overlap = skill_overlap(
            &criteria.required_skills,
            &criteria.preferred_skills,
            &candidate.skills,
        );
        if !overlap.matched.is_empty() {
            strengths.push(format!("has required skills: {}", overlap.matched.join(", ")));
        }
        if !overlap.missing.is_empty() {
            weaknesses.push(format!(
                "missing required skills: {}",
                overlap.missing.join(", ")
            ));
        }
        if overlap.preferred_fraction > 0.0 {
            strengths.push("matches preferred skills".to_string());
        }

        let experience_in_range = self.check_experience(criteria, candidate, &mut weaknesses);
        let education_matched = check_education(criteria, candidate, &mut weaknesses);
        let location_matched =
            check_location(criteria, candidate, &mut strengths, &mut weaknesses);

        let (semantic, semantic_degraded) = match self
            .provider
            .similarity(job_text, &candidate.profile_text())
            .await
        {
            Ok(score) => (score.clamp(0.0, 1.0), false),
            Err(err) => {
                warn!(
                    candidate_id = candidate.candidate_id,
                    error = %err,
                    "similarity provider failed, scoring on skill overlap only"
                );
                weaknesses
                    .push("semantic similarity unavailable for this evaluation".to_string());
                (0.0, true)
            }
        };

        let lexical = lexical_score(&overlap);
        let combined = combine(criteria.semantic_weight, semantic, lexical);

        ScoreResult {
            candidate_id: candidate.candidate_id,
            candidate_name: candidate.full_name.clone(),
            combined_score: combined,
            predicted_status: PredictedStatus::Rejected,
            strengths,
            weaknesses,
            breakdown: ScoreBreakdown {
                skill_overlap: overlap.required_fraction,
                preferred_bonus: PREFERRED_SKILL_WEIGHT * overlap.preferred_fraction,
                lexical_score: lexical,
                semantic_score: semantic,
                semantic_degraded,
                experience_in_range,
                education_matched,
                location_matched,
                capacity_rejected: false,
            },
        }
    }

    fn check_experience(
        &self,
        criteria: &Criteria,
        candidate: &CandidateRecord,
        weaknesses: &mut Vec<String>,
    ) -> bool {
        let years = candidate.years_experience;
        let mut in_range = true;
        if let Some(min) = criteria.min_experience {
            if years < min {
                weaknesses.push(format!(
                    "{} years of experience, below the requested minimum of {}",
                    years, min
                ));
                in_range = false;
            }
        }
        if let Some(max) = criteria.max_experience {
            if years > max {
                weaknesses.push(format!(
                    "{} years of experience, above the requested maximum of {}",
                    years, max
                ));
                in_range = false;
            }
        }
        in_range
    }
}

fn check_education(
    criteria: &Criteria,
    candidate: &CandidateRecord,
    weaknesses: &mut Vec<String>,
) -> bool {
    let mut matched = true;
    if let Some(level) = &criteria.education_level {
        let want = level.to_lowercase();
        if !candidate
            .education
            .iter()
            .any(|e| e.degree.to_lowercase().contains(&want))
        {
            weaknesses.push(format!("no {} degree on record", level));
            matched = false;
        }
    }
    if let Some(field) = &criteria.education_field {
        let want = field.to_lowercase();
        if !candidate
            .education
            .iter()
            .any(|e| e.degree.to_lowercase().contains(&want))
        {
            weaknesses.push(format!("education is not in {}", field));
            matched = false;
        }
    }
    matched
}

fn check_location(
    criteria: &Criteria,
    candidate: &CandidateRecord,
    strengths: &mut Vec<String>,
    weaknesses: &mut Vec<String>,
) -> Option<bool> {
    if criteria.preferred_locations.is_empty() {
        return None;
    }
    let here = candidate.location.to_lowercase();
    let matched = criteria
        .preferred_locations
        .iter()
        .any(|loc| here.contains(&loc.to_lowercase()));
    if matched {
        strengths.push(format!("located in a preferred area ({})", candidate.location));
    } else {
        weaknesses.push("outside the preferred locations".to_string());
    }
    Some(matched)
}

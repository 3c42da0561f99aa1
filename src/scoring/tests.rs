use std::sync::Arc;

use crate::gateway::MockSimilarityProvider;
use crate::payload::EducationEntry;

use super::*;

fn skills(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn candidate(id: i64, name: &str, candidate_skills: &[&str]) -> CandidateRecord {
    CandidateRecord {
        candidate_id: id,
        full_name: name.to_string(),
        location: String::new(),
        years_experience: 5,
        education: Vec::new(),
        skills: skills(candidate_skills),
        work_experience: Vec::new(),
    }
}

fn engine(provider: MockSimilarityProvider) -> ScoringEngine {
    ScoringEngine::new(Arc::new(provider))
}

#[test]
fn skill_overlap_is_pure_and_case_insensitive() {
    let required = skills(&["Python", "SQL"]);
    let have = skills(&["python", "Rust", "sql "]);

    let first = skill_overlap(&required, &[], &have);
    let second = skill_overlap(&required, &[], &have);
    assert_eq!(first, second);
    assert_eq!(first.required_fraction, 1.0);
    assert_eq!(first.matched, skills(&["Python", "SQL"]));
    assert!(first.missing.is_empty());
}

#[test]
fn empty_required_skills_are_vacuously_satisfied() {
    let overlap = skill_overlap(&[], &[], &skills(&["anything"]));
    assert_eq!(overlap.required_fraction, 1.0);
    assert_eq!(lexical_score(&overlap), 1.0);
}

#[test]
fn lexical_score_is_monotone_in_required_overlap() {
    let mut previous = -1.0;
    for matched in 0..=4u32 {
        let overlap = SkillOverlap {
            required_fraction: matched as f32 / 4.0,
            preferred_fraction: 0.0,
            matched: Vec::new(),
            missing: Vec::new(),
        };
        let score = lexical_score(&overlap);
        assert!(score > previous);
        previous = score;
    }
}

#[test]
fn preferred_skills_add_a_bounded_bonus() {
    let without = SkillOverlap {
        required_fraction: 0.5,
        preferred_fraction: 0.0,
        matched: Vec::new(),
        missing: Vec::new(),
    };
    let with = SkillOverlap {
        preferred_fraction: 1.0,
        ..without.clone()
    };
    assert!(lexical_score(&with) > lexical_score(&without));

    // Full overlap plus full bonus still clamps to 1.
    let saturated = SkillOverlap {
        required_fraction: 1.0,
        preferred_fraction: 1.0,
        matched: Vec::new(),
        missing: Vec::new(),
    };
    assert_eq!(lexical_score(&saturated), 1.0);
}

#[test]
fn combine_clamps_and_mixes() {
    assert_eq!(combine(0.7, 0.9, 1.0), 0.93);
    assert_eq!(combine(0.0, 0.9, 0.4), 0.4);
    assert_eq!(combine(1.0, 0.9, 0.4), 0.9);
    assert_eq!(combine(0.5, 2.0, 2.0), 1.0);
}

#[test]
fn criteria_validation_rejects_bad_ranges() {
    let mut criteria = Criteria {
        minimum_score: 1.5,
        ..Criteria::default()
    };
    assert!(criteria.validate().is_err());

    criteria.minimum_score = 0.5;
    criteria.semantic_weight = -0.1;
    assert!(criteria.validate().is_err());

    criteria.semantic_weight = 0.7;
    criteria.min_experience = Some(10);
    criteria.max_experience = Some(3);
    assert!(criteria.validate().is_err());

    criteria.max_experience = Some(12);
    assert!(criteria.validate().is_ok());
}

#[tokio::test]
async fn capacity_cap_rejects_the_runner_up() {
    let provider = MockSimilarityProvider::new(0.0);
    provider.score_for("Alice", 0.9);
    provider.score_for("Bob", 0.95);
    let engine = engine(provider);

    let criteria = Criteria {
        required_skills: skills(&["python", "sql"]),
        minimum_score: 0.5,
        semantic_weight: 0.7,
        max_shortlisted: Some(1),
        ..Criteria::default()
    };
    let candidates = vec![
        candidate(1, "Alice", &["python", "sql"]),
        candidate(2, "Bob", &["python"]),
    ];

    let results = engine.score(&criteria, &candidates).await.unwrap();
    assert_eq!(results.len(), 2);

    // Alice: 0.7 * 0.9 + 0.3 * 1.0 = 0.93
    assert_eq!(results[0].candidate_name, "Alice");
    assert!((results[0].combined_score - 0.93).abs() < 1e-6);
    assert!(results[0].is_shortlisted());
    assert!(!results[0].breakdown.capacity_rejected);

    // Bob: 0.7 * 0.95 + 0.3 * 0.5 = 0.815 -- above threshold, out of capacity
    assert_eq!(results[1].candidate_name, "Bob");
    assert!((results[1].combined_score - 0.815).abs() < 1e-6);
    assert!(!results[1].is_shortlisted());
    assert!(results[1].breakdown.capacity_rejected);
    assert!(results[1]
        .weaknesses
        .iter()
        .any(|w| w.contains("shortlist was full")));
}

#[tokio::test]
async fn repeated_scoring_is_deterministic() {
    let provider = MockSimilarityProvider::new(0.6);
    provider.score_for("Alice", 0.8);
    let engine = engine(provider);

    let criteria = Criteria {
        required_skills: skills(&["python", "sql"]),
        preferred_skills: skills(&["rust"]),
        ..Criteria::default()
    };
    let candidates = vec![
        candidate(1, "Alice", &["python", "rust"]),
        candidate(2, "Bob", &["sql"]),
    ];

    let first = engine.score(&criteria, &candidates).await.unwrap();
    let second = engine.score(&criteria, &candidates).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn results_sort_by_score_then_candidate_id() {
    let provider = MockSimilarityProvider::new(0.6);
    let engine = engine(provider);

    let criteria = Criteria::default();
    // Identical candidates except for id; scores tie exactly.
    let candidates = vec![
        candidate(7, "Tie", &["rust"]),
        candidate(3, "Tie", &["rust"]),
        candidate(5, "Tie", &["rust"]),
    ];

    let results = engine.score(&criteria, &candidates).await.unwrap();
    let ids: Vec<i64> = results.iter().map(|r| r.candidate_id).collect();
    assert_eq!(ids, vec![3, 5, 7]);
}

#[tokio::test]
async fn below_threshold_is_rejected_without_capacity_flag() {
    let provider = MockSimilarityProvider::new(0.1);
    let engine = engine(provider);

    let criteria = Criteria {
        required_skills: skills(&["haskell"]),
        minimum_score: 0.5,
        ..Criteria::default()
    };
    let results = engine
        .score(&criteria, &[candidate(1, "Carol", &["python"])])
        .await
        .unwrap();

    assert!(!results[0].is_shortlisted());
    assert!(!results[0].breakdown.capacity_rejected);
    assert!(results[0]
        .weaknesses
        .iter()
        .any(|w| w.contains("missing required skills")));
}

#[tokio::test]
async fn similarity_failure_degrades_to_lexical_only() {
    let provider = MockSimilarityProvider::new(0.9);
    provider.fail_for("Dana");
    let engine = engine(provider);

    let criteria = Criteria {
        required_skills: skills(&["python"]),
        minimum_score: 0.2,
        semantic_weight: 0.7,
        ..Criteria::default()
    };
    let results = engine
        .score(&criteria, &[candidate(1, "Dana", &["python"])])
        .await
        .unwrap();

    let result = &results[0];
    assert!(result.breakdown.semantic_degraded);
    assert_eq!(result.breakdown.semantic_score, 0.0);
    // 0.7 * 0.0 + 0.3 * 1.0
    assert!((result.combined_score - 0.3).abs() < 1e-6);
    assert!(result.is_shortlisted());
    assert!(result
        .weaknesses
        .iter()
        .any(|w| w.contains("semantic similarity unavailable")));
}

#[tokio::test]
async fn hard_filters_are_advisory_only() {
    let provider = MockSimilarityProvider::new(0.9);
    let engine = engine(provider);

    let criteria = Criteria {
        min_experience: Some(10),
        education_level: Some("PhD".to_string()),
        preferred_locations: vec!["Berlin".to_string()],
        minimum_score: 0.5,
        ..Criteria::default()
    };
    let mut junior = candidate(1, "Eve", &["python"]);
    junior.years_experience = 2;
    junior.location = "Lisbon".to_string();
    junior.education = vec![EducationEntry {
        degree: "BSc Computer Science".to_string(),
        institution: "Somewhere".to_string(),
        year: None,
    }];

    let results = engine.score(&criteria, &[junior]).await.unwrap();
    let result = &results[0];

    // Still shortlisted: the gates annotate, they do not veto.
    assert!(result.is_shortlisted());
    assert!(!result.breakdown.experience_in_range);
    assert!(!result.breakdown.education_matched);
    assert_eq!(result.breakdown.location_matched, Some(false));
    assert!(result.weaknesses.len() >= 3);
}

#[tokio::test]
async fn location_preference_matches_substring() {
    let provider = MockSimilarityProvider::new(0.9);
    let engine = engine(provider);

    let criteria = Criteria {
        preferred_locations: vec!["berlin".to_string()],
        ..Criteria::default()
    };
    let mut local = candidate(1, "Finn", &[]);
    local.location = "Berlin, Germany".to_string();

    let results = engine.score(&criteria, &[local]).await.unwrap();
    assert_eq!(results[0].breakdown.location_matched, Some(true));
    assert!(results[0]
        .strengths
        .iter()
        .any(|s| s.contains("preferred area")));
}

#[tokio::test]
async fn empty_candidate_list_is_fine() {
    let engine = engine(MockSimilarityProvider::default());
    let results = engine.score(&Criteria::default(), &[]).await.unwrap();
    assert!(results.is_empty());
}

#[test]
fn job_text_reflects_set_fields() {
    let criteria = Criteria {
        job_title: Some("Data Engineer".to_string()),
        required_skills: skills(&["python", "sql"]),
        min_experience: Some(3),
        max_experience: Some(8),
        ..Criteria::default()
    };
    let text = criteria.job_text();
    assert!(text.contains("Job Title: Data Engineer"));
    assert!(text.contains("Required Skills: python, sql"));
    assert!(text.contains("3 years to 8 years"));

    assert_eq!(Criteria::default().job_text(), "General position requirements");
}

//! Structured parse payload.
//!
//! [`ParsedResume`] is the opaque record the parse gateway produces for one
//! file. The cache stores it verbatim; the scoring engine consumes the
//! equivalent fields from the persistence store's `CandidateRecord`.

use serde::{Deserialize, Serialize};

/// One education entry extracted from a resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    /// Four-digit graduation year when one could be extracted.
    #[serde(default)]
    pub year: Option<String>,
}

/// One work-experience entry extracted from a resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkExperienceEntry {
    pub company: String,
    pub position: String,
    pub duration: String,
}

/// Structured fields extracted from a single resume, plus the raw text the
/// extraction ran over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
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
    /// Raw extracted text (pre-structuring), kept for semantic comparison.
    #[serde(default)]
    pub raw_text: String,
}

impl ParsedResume {
    /// Minimal record carrying only a name. Used when structuring is skipped
    /// or fails partway and only the filename is known.
    pub fn named(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
            years_experience: 0,
            education: Vec::new(),
            skills: Vec::new(),
            work_experience: Vec::new(),
            raw_text: String::new(),
        }
    }

    /// Flattens the record into a profile text suitable for semantic
    /// comparison against a job description.
    pub fn profile_text(&self) -> String {
        let education: Vec<String> = self
            .education
            .iter()
            .map(|e| {
                format!(
                    "{} from {}{}",
                    e.degree,
                    e.institution,
                    e.year
                        .as_deref()
                        .map(|y| format!(" ({})", y))
                        .unwrap_or_default()
                )
            })
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParsedResume {
        ParsedResume {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+44 1234".to_string(),
            location: "London".to_string(),
            years_experience: 7,
            education: vec![EducationEntry {
                degree: "BSc Mathematics".to_string(),
                institution: "University of London".to_string(),
                year: Some("1840".to_string()),
            }],
            skills: vec!["python".to_string(), "sql".to_string()],
            work_experience: vec![WorkExperienceEntry {
                company: "Analytical Engines Ltd".to_string(),
                position: "Programmer".to_string(),
                duration: "5 years".to_string(),
            }],
            raw_text: "Ada Lovelace, programmer...".to_string(),
        }
    }

    #[test]
    fn serde_round_trip() {
        let original = sample();
        let json = serde_json::to_string(&original).expect("serialize");
        let back: ParsedResume = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(original, back);
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"full_name":"Grace Hopper"}"#;
        let parsed: ParsedResume = serde_json::from_str(json).expect("deserialize");

        assert_eq!(parsed.full_name, "Grace Hopper");
        assert_eq!(parsed.years_experience, 0);
        assert!(parsed.skills.is_empty());
        assert!(parsed.raw_text.is_empty());
    }

    #[test]
    fn profile_text_mentions_core_fields() {
        let text = sample().profile_text();

        assert!(text.contains("Ada Lovelace"));
        assert!(text.contains("python, sql"));
        assert!(text.contains("BSc Mathematics from University of London (1840)"));
        assert!(text.contains("Programmer at Analytical Engines Ltd"));
    }
}

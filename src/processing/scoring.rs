//! Fit score combination and rule-based insights

use crate::error::{Result, ResumeFitError};
use serde::{Deserialize, Serialize};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Words suggesting the resume describes concrete experience
const EXPERIENCE_INDICATORS: &[&str] = &["years", "experience", "led", "managed", "developed", "created"];

const SOFT_SKILLS: &[&str] = &["leadership", "communication", "teamwork", "problem solving"];

/// Blend between text similarity and skill-match ratio.
///
/// The two weights are each in `[0, 1]` and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitWeights {
    similarity: f64,
    skill: f64,
}

/// Score band used to pick the canned fit message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitBucket {
    Limited,
    Moderate,
    Fair,
    Good,
    Excellent,
}

impl FitWeights {
    /// Skill match dominates. The default.
    pub const SKILL_DOMINANT: FitWeights = FitWeights {
        similarity: 0.3,
        skill: 0.7,
    };

    /// Text similarity dominates. The original weighting, kept for comparison runs.
    pub const SIMILARITY_DOMINANT: FitWeights = FitWeights {
        similarity: 0.6,
        skill: 0.4,
    };

    pub fn new(similarity: f64, skill: f64) -> Result<Self> {
        let in_range = |w: f64| w.is_finite() && (0.0..=1.0).contains(&w);
        if !in_range(similarity) || !in_range(skill) {
            return Err(ResumeFitError::Configuration(format!(
                "Fit weights must be within [0, 1], got similarity={} skill={}",
                similarity, skill
            )));
        }
        if (similarity + skill - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ResumeFitError::Configuration(format!(
                "Fit weights must sum to 1.0, got {}",
                similarity + skill
            )));
        }
        Ok(Self { similarity, skill })
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "skill-dominant" | "skill" => Some(Self::SKILL_DOMINANT),
            "similarity-dominant" | "similarity" | "legacy" => Some(Self::SIMILARITY_DOMINANT),
            _ => None,
        }
    }

    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    pub fn skill(&self) -> f64 {
        self.skill
    }
}

impl Default for FitWeights {
    fn default() -> Self {
        Self::SKILL_DOMINANT
    }
}

/// Unrounded blend of similarity and skill-match ratio.
///
/// With no job skills the skill term is dropped entirely.
pub fn adjusted_score(base_similarity: f64, matched_skills: usize, job_skills: usize, weights: &FitWeights) -> f64 {
    if job_skills > 0 {
        let skill_match_ratio = matched_skills as f64 / job_skills as f64;
        base_similarity * weights.similarity + skill_match_ratio * 100.0 * weights.skill
    } else {
        base_similarity * weights.similarity
    }
}

/// Final fit score, clamped to `[0, 100]` and rounded
pub fn combine(base_similarity: f64, matched_skills: usize, job_skills: usize, weights: &FitWeights) -> u8 {
    let adjusted = adjusted_score(base_similarity, matched_skills, job_skills, weights);
    // NaN only arises from a non-finite similarity; treat it as no signal
    let adjusted = if adjusted.is_nan() { 0.0 } else { adjusted };
    adjusted.clamp(0.0, 100.0).round() as u8
}

impl FitBucket {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => FitBucket::Excellent,
            70..=79 => FitBucket::Good,
            60..=69 => FitBucket::Fair,
            50..=59 => FitBucket::Moderate,
            _ => FitBucket::Limited,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FitBucket::Excellent => "Excellent match! Your resume aligns very well with the job requirements.",
            FitBucket::Good => "Good match with room for improvement. Consider highlighting relevant experience more prominently.",
            FitBucket::Fair => "Fair match. Several requirements are covered, but key skills are missing or under-represented.",
            FitBucket::Moderate => "Moderate match. Focus on developing the missing skills and better showcasing relevant experience.",
            FitBucket::Limited => "Limited match. Consider gaining experience in the key areas mentioned in the job description.",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FitBucket::Excellent => "EXCELLENT",
            FitBucket::Good => "GOOD",
            FitBucket::Fair => "FAIR",
            FitBucket::Moderate => "MODERATE",
            FitBucket::Limited => "LIMITED",
        }
    }
}

/// Deterministic observations that complement the fit message
pub fn rule_based_observations(
    matched_skills: &[String],
    missing_skills: &[String],
    job_text: &str,
    resume_text: &str,
) -> Vec<String> {
    let mut observations = Vec::new();
    let resume_lower = resume_text.to_lowercase();

    if !matched_skills.is_empty() {
        observations.push(format!("Strong alignment in {} skills.", first_three(matched_skills)));
    }

    if !missing_skills.is_empty() {
        observations.push(format!(
            "Consider developing skills in {} to improve your match.",
            first_three(missing_skills)
        ));
    }

    if !EXPERIENCE_INDICATORS.iter().any(|k| resume_lower.contains(k)) {
        observations.push(
            "Consider adding more specific examples of your accomplishments and years of experience.".to_string(),
        );
    }

    let has_soft_skills = SOFT_SKILLS.iter().any(|s| resume_lower.contains(s));
    if job_text.to_lowercase().contains("leadership") && !has_soft_skills {
        observations.push(
            "The role requires leadership skills - consider highlighting your leadership experience.".to_string(),
        );
    }

    observations
}

fn first_three(skills: &[String]) -> String {
    skills.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_weights_validation() {
        assert!(FitWeights::new(0.3, 0.7).is_ok());
        assert!(FitWeights::new(0.5, 0.7).is_err());
        assert!(FitWeights::new(-0.2, 1.2).is_err());
        assert!(FitWeights::new(f64::NAN, 1.0).is_err());
        assert_eq!(FitWeights::default(), FitWeights::SKILL_DOMINANT);
    }

    #[test]
    fn test_presets() {
        assert_eq!(FitWeights::preset("Skill-Dominant"), Some(FitWeights::SKILL_DOMINANT));
        assert_eq!(FitWeights::preset("legacy"), Some(FitWeights::SIMILARITY_DOMINANT));
        assert_eq!(FitWeights::preset("equal"), None);
    }

    #[test]
    fn test_score_calculation() {
        let weights = FitWeights::SKILL_DOMINANT;
        // 50 * 0.3 + 50 * 0.7
        assert_eq!(combine(50.0, 1, 2, &weights), 50);
        assert_eq!(combine(100.0, 3, 3, &weights), 100);
        assert_eq!(combine(0.0, 0, 4, &weights), 0);

        let legacy = FitWeights::SIMILARITY_DOMINANT;
        // 80 * 0.6 + 25 * 0.4 = 58
        assert_eq!(combine(80.0, 1, 4, &legacy), 58);
    }

    #[test]
    fn test_no_job_skills_uses_similarity_only() {
        let weights = FitWeights::SKILL_DOMINANT;
        assert_eq!(adjusted_score(62.5, 0, 0, &weights), 62.5 * 0.3);
        assert_eq!(combine(62.5, 0, 0, &weights), 19);
    }

    #[test]
    fn test_score_is_clamped() {
        let weights = FitWeights::SKILL_DOMINANT;
        assert_eq!(combine(100.000_000_1, 5, 5, &weights), 100);
        assert_eq!(combine(-10.0, 0, 0, &weights), 0);
        assert_eq!(combine(f64::NAN, 0, 0, &weights), 0);
        assert_eq!(combine(f64::INFINITY, 1, 1, &weights), 100);
    }

    #[test]
    fn test_score_bounds_over_grid() {
        for weights in [FitWeights::SKILL_DOMINANT, FitWeights::SIMILARITY_DOMINANT] {
            for similarity in [0.0, 12.5, 49.9, 100.0, 100.000_001] {
                for (matched, total) in [(0, 0), (0, 3), (2, 3), (3, 3)] {
                    let score = combine(similarity, matched, total, &weights);
                    assert!(score <= 100);
                }
            }
        }
    }

    #[test]
    fn test_fit_buckets() {
        assert_eq!(FitBucket::from_score(0), FitBucket::Limited);
        assert_eq!(FitBucket::from_score(49), FitBucket::Limited);
        assert_eq!(FitBucket::from_score(50), FitBucket::Moderate);
        assert_eq!(FitBucket::from_score(59), FitBucket::Moderate);
        assert_eq!(FitBucket::from_score(60), FitBucket::Fair);
        assert_eq!(FitBucket::from_score(70), FitBucket::Good);
        assert_eq!(FitBucket::from_score(79), FitBucket::Good);
        assert_eq!(FitBucket::from_score(80), FitBucket::Excellent);
        assert_eq!(FitBucket::from_score(100), FitBucket::Excellent);
        assert!(!FitBucket::Limited.message().is_empty());
    }

    #[test]
    fn test_rule_based_observations() {
        let observations = rule_based_observations(
            &strings(&["React", "TypeScript", "Docker", "AWS"]),
            &strings(&["Kubernetes"]),
            "Looking for leadership in a platform team",
            "React and TypeScript developer",
        );

        assert_eq!(observations[0], "Strong alignment in React, TypeScript, Docker skills.");
        assert_eq!(observations[1], "Consider developing skills in Kubernetes to improve your match.");
        assert!(observations.iter().any(|o| o.contains("years of experience")));
        assert!(observations.iter().any(|o| o.contains("leadership")));
    }

    #[test]
    fn test_observations_quiet_for_strong_resume() {
        let observations = rule_based_observations(
            &[],
            &[],
            "Leadership role",
            "Managed a team of 5 with strong leadership over 6 years",
        );
        assert!(observations.is_empty());
    }
}

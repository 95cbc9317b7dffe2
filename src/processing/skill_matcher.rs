//! Skill vocabulary matching
//!
//! A vocabulary term is present when its lower-cased form occurs anywhere in
//! the lower-cased text. Matching is substring based, so a short term can fire
//! inside an unrelated word ("AI" inside "maintain"). Synonyms are not merged.

use crate::error::{Result, ResumeFitError};
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};

/// Canonical skill names, in reporting order
pub const SKILL_VOCABULARY: &[&str] = &[
    // Languages and web
    "JavaScript", "TypeScript", "React", "Vue", "Angular", "Node.js", "Python", "Java", "C++", "C#",
    "HTML", "CSS",
    // Data stores
    "SQL", "PostgreSQL", "MySQL", "MongoDB", "Redis",
    // Infrastructure
    "Docker", "Kubernetes", "AWS", "Azure", "GCP", "Git", "Linux",
    // Process
    "Agile", "Scrum", "DevOps", "CI/CD", "REST", "GraphQL",
    // Data and AI
    "Machine Learning", "AI", "Data Science", "Analytics",
    // Professional
    "Project Management", "Leadership", "Communication", "Problem Solving", "Teamwork",
    "Strategic Planning", "Marketing", "Sales", "Customer Service",
    // Design
    "Design", "UX", "UI", "Figma", "Photoshop", "Illustrator",
];

/// Skill matcher over a fixed vocabulary
pub struct SkillMatcher {
    vocabulary: Vec<String>,
    matcher: AhoCorasick,
}

/// Canonical skill names found in one text, in vocabulary order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet {
    skills: Vec<String>,
}

/// Job and resume skill sets with the derived matched and missing sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillComparison {
    pub job: SkillSet,
    pub resume: SkillSet,
    pub matched: SkillSet,
    pub missing: SkillSet,
}

impl SkillMatcher {
    /// Create a matcher over the built-in vocabulary
    pub fn new() -> Result<Self> {
        Self::with_vocabulary(SKILL_VOCABULARY.iter().map(|s| s.to_string()).collect())
    }

    /// Create a matcher over a custom vocabulary.
    ///
    /// Empty terms are dropped and case-insensitive duplicates keep their first spelling.
    pub fn with_vocabulary(terms: Vec<String>) -> Result<Self> {
        let mut vocabulary: Vec<String> = Vec::with_capacity(terms.len());
        for term in terms {
            let term = term.trim().to_string();
            if term.is_empty() {
                continue;
            }
            let lowered = term.to_lowercase();
            if vocabulary.iter().any(|existing| existing.to_lowercase() == lowered) {
                continue;
            }
            vocabulary.push(term);
        }

        let patterns: Vec<String> = vocabulary.iter().map(|s| s.to_lowercase()).collect();
        // Standard semantics so overlapping iteration reports every term present
        let matcher = AhoCorasick::builder()
            .match_kind(aho_corasick::MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| ResumeFitError::Configuration(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self { vocabulary, matcher })
    }

    /// Every vocabulary term contained in the text
    pub fn extract(&self, text: &str) -> SkillSet {
        let lowered = text.to_lowercase();
        let mut found = vec![false; self.vocabulary.len()];

        for mat in self.matcher.find_overlapping_iter(&lowered) {
            found[mat.pattern().as_usize()] = true;
        }

        let skills = self
            .vocabulary
            .iter()
            .zip(found)
            .filter_map(|(skill, present)| present.then(|| skill.clone()))
            .collect();

        SkillSet { skills }
    }

    /// Extract both texts and derive matched (resume ∩ job) and missing (job − resume)
    pub fn compare(&self, job_text: &str, resume_text: &str) -> SkillComparison {
        SkillComparison::new(self.extract(job_text), self.extract(resume_text))
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn skill_count(&self) -> usize {
        self.vocabulary.len()
    }
}

impl SkillSet {
    pub fn contains(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    /// Skills of `self` also in `other`, keeping `self`'s order
    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        SkillSet {
            skills: self.skills.iter().filter(|s| other.contains(s)).cloned().collect(),
        }
    }

    /// Skills of `self` not in `other`, keeping `self`'s order
    pub fn difference(&self, other: &SkillSet) -> SkillSet {
        SkillSet {
            skills: self.skills.iter().filter(|s| !other.contains(s)).cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.skills.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.skills
    }

    pub fn into_vec(self) -> Vec<String> {
        self.skills
    }
}

impl SkillComparison {
    pub fn new(job: SkillSet, resume: SkillSet) -> Self {
        let matched = resume.intersection(&job);
        let missing = job.difference(&resume);
        Self {
            job,
            resume,
            matched,
            missing,
        }
    }
}

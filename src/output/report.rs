//! Report model built from an analysis result

use crate::processing::analyzer::{AnalysisResult, EnrichmentStatus};
use crate::processing::scoring::FitWeights;
use crate::processing::text_processor::KeywordScore;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a formatter needs to render one analysis
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub summary: FitSummary,

    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Provider ranking of the missing skills, when available
    pub ranked_missing_skills: Vec<String>,
    pub highlight_areas: Vec<String>,
    pub project_suggestions: Vec<String>,

    /// Provider or fallback paragraph first, then rule-based observations
    pub general_insights: Vec<String>,

    pub top_keywords: Vec<KeywordScore>,
    pub keywords: Vec<String>,
    pub job_links: Vec<String>,
    pub enrichment: EnrichmentStatus,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct FitSummary {
    pub fit_score: u8,
    pub verdict: String,
    pub fit_message: String,
    pub base_similarity: f64,
    pub skill_match: SkillMatchSummary,
    pub component_weights: ComponentWeights,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SkillMatchSummary {
    pub matched: usize,
    pub required: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ComponentWeights {
    pub similarity_weight: f64,
    pub skill_weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub resume_file: String,
    /// Job description file, or `inline` for text given on the command line
    pub job_source: String,
    pub processing_time_ms: u64,
}

impl From<FitWeights> for ComponentWeights {
    fn from(weights: FitWeights) -> Self {
        Self {
            similarity_weight: weights.similarity(),
            skill_weight: weights.skill(),
        }
    }
}

impl SkillMatchSummary {
    /// Share of job skills present in the resume, as a percentage
    pub fn percentage(&self) -> f64 {
        if self.required == 0 {
            0.0
        } else {
            self.matched as f64 / self.required as f64 * 100.0
        }
    }
}

impl ReportMetadata {
    pub fn new(resume_file: impl Into<String>, job_source: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file: resume_file.into(),
            job_source: job_source.into(),
            processing_time_ms,
        }
    }
}

impl FitReport {
    pub fn from_analysis(result: &AnalysisResult, weights: FitWeights, metadata: ReportMetadata) -> Self {
        let summary = FitSummary {
            fit_score: result.fit_score,
            verdict: result.fit_bucket.label().to_string(),
            fit_message: result.fit_message.clone(),
            base_similarity: result.base_similarity,
            skill_match: SkillMatchSummary {
                matched: result.matched_skills.len(),
                required: result.job_skills.len(),
            },
            component_weights: weights.into(),
        };

        let mut general_insights = Vec::with_capacity(result.observations.len() + 1);
        if !result.general_insight.is_empty() {
            general_insights.push(result.general_insight.clone());
        }
        general_insights.extend(result.observations.iter().cloned());

        Self {
            summary,
            matched_skills: result.matched_skills.clone(),
            missing_skills: result.missing_skills.clone(),
            ranked_missing_skills: result.ranked_missing_skills.clone(),
            highlight_areas: result.highlight_areas.clone(),
            project_suggestions: result.project_suggestions.clone(),
            general_insights,
            top_keywords: result.top_keywords.clone(),
            keywords: result.keywords.clone(),
            job_links: result.job_links.clone(),
            enrichment: result.enrichment.clone(),
            metadata,
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.enrichment == EnrichmentStatus::Applied
    }
}

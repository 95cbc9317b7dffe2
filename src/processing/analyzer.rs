//! Analysis engine: similarity, skill matching, scoring and optional enrichment

use crate::config::Config;
use crate::error::Result;
use crate::input::extract_pdf_text;
use crate::insights::http::HttpInsightProvider;
use crate::insights::job_links::SearchLinkFinder;
use crate::insights::retry::RetryPolicy;
use crate::insights::{InsightBundle, InsightProvider, InsightRequest, JobLinkFinder, ProviderError};
use crate::processing::scoring::{self, FitBucket, FitWeights};
use crate::processing::skill_matcher::{SkillComparison, SkillMatcher};
use crate::processing::text_processor::{KeywordScore, TextProcessor};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Shared keywords kept in the result
const TOP_KEYWORD_LIMIT: usize = 8;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    ExtractText,
    ComputeBaseSimilarity,
    ExtractSkills,
    CombineScore,
    RequestEnrichment,
    AssembleResult,
}

impl AnalysisStage {
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisStage::ExtractText => "extract_text",
            AnalysisStage::ComputeBaseSimilarity => "compute_base_similarity",
            AnalysisStage::ExtractSkills => "extract_skills",
            AnalysisStage::CombineScore => "combine_score",
            AnalysisStage::RequestEnrichment => "request_enrichment",
            AnalysisStage::AssembleResult => "assemble_result",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalysisStage::ExtractText => "Extracting text from resume...",
            AnalysisStage::ComputeBaseSimilarity => "Calculating text similarity...",
            AnalysisStage::ExtractSkills => "Extracting skills...",
            AnalysisStage::CombineScore => "Calculating fit score...",
            AnalysisStage::RequestEnrichment => "Requesting additional insights...",
            AnalysisStage::AssembleResult => "Preparing results...",
        }
    }
}

/// Told about each stage just before it runs
pub trait ProgressObserver: Send + Sync {
    fn on_stage(&self, stage: AnalysisStage);
}

impl<F> ProgressObserver for F
where
    F: Fn(AnalysisStage) + Send + Sync,
{
    fn on_stage(&self, stage: AnalysisStage) {
        self(stage)
    }
}

/// Observer that ignores every stage
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_stage(&self, _stage: AnalysisStage) {}
}

/// Outcome of the optional enrichment step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnrichmentStatus {
    NotConfigured,
    Applied,
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Final fit score, 0 to 100
    pub fit_score: u8,
    /// Cosine similarity of the two texts as a percentage
    pub base_similarity: f64,
    pub fit_bucket: FitBucket,
    /// Canned message for the score bucket
    pub fit_message: String,

    pub job_skills: Vec<String>,
    pub resume_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub top_keywords: Vec<KeywordScore>,
    pub observations: Vec<String>,

    /// Provider paragraph, or the fit message when there is none
    pub general_insight: String,
    pub ranked_missing_skills: Vec<String>,
    pub highlight_areas: Vec<String>,
    pub project_suggestions: Vec<String>,
    pub keywords: Vec<String>,
    pub job_links: Vec<String>,
    pub enrichment: EnrichmentStatus,
}

/// Deterministic part of an analysis
struct Evaluation {
    base_similarity: f64,
    skills: SkillComparison,
    fit_score: u8,
    bucket: FitBucket,
}

/// Coordinates the scoring pipeline and the optional insight collaborators.
///
/// Holds no per-analysis state, so one engine can serve concurrent analyses.
pub struct AnalysisEngine {
    text_processor: TextProcessor,
    skill_matcher: SkillMatcher,
    weights: FitWeights,
    insight_provider: Option<Arc<dyn InsightProvider>>,
    job_link_finder: Option<Arc<dyn JobLinkFinder>>,
    retry_policy: RetryPolicy,
    provider_timeout: Duration,
}

impl AnalysisEngine {
    /// Engine with no collaborators
    pub fn new(weights: FitWeights) -> Result<Self> {
        Ok(Self {
            text_processor: TextProcessor::new(),
            skill_matcher: SkillMatcher::new()?,
            weights,
            insight_provider: None,
            job_link_finder: None,
            retry_policy: RetryPolicy::default(),
            provider_timeout: Duration::from_secs(30),
        })
    }

    /// Engine wired from configuration. An endpoint enables the HTTP provider;
    /// job links are only looked up when a provider can supply keywords.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut engine = Self::new(config.scoring.weights()?)?
            .with_retry_policy(config.insights.retry.policy())
            .with_provider_timeout(config.insights.timeout());

        if let Some(endpoint) = &config.insights.endpoint {
            let provider =
                HttpInsightProvider::new(endpoint, config.insights.api_key.clone(), config.insights.timeout())?;
            log::info!("Insight provider configured at {}", provider.endpoint());
            engine = engine.with_insight_provider(Arc::new(provider));

            if config.job_links.enabled {
                let finder = SearchLinkFinder::from_config(&config.job_links)?;
                engine = engine.with_job_link_finder(Arc::new(finder));
            }
        }

        Ok(engine)
    }

    pub fn with_insight_provider(mut self, provider: Arc<dyn InsightProvider>) -> Self {
        self.insight_provider = Some(provider);
        self
    }

    pub fn with_job_link_finder(mut self, finder: Arc<dyn JobLinkFinder>) -> Self {
        self.job_link_finder = Some(finder);
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Upper bound on one collaborator call, retries included
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_weights(mut self, weights: FitWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Drop any configured collaborators
    pub fn without_insights(mut self) -> Self {
        self.insight_provider = None;
        self.job_link_finder = None;
        self
    }

    pub fn weights(&self) -> FitWeights {
        self.weights
    }

    pub fn has_insight_provider(&self) -> bool {
        self.insight_provider.is_some()
    }

    pub fn skill_matcher(&self) -> &SkillMatcher {
        &self.skill_matcher
    }

    /// Analyze a PDF resume against a job description.
    ///
    /// Extraction failure is the only error; everything after it degrades instead.
    pub async fn analyze_document(
        &self,
        job_text: &str,
        document: &[u8],
        observer: &dyn ProgressObserver,
    ) -> Result<AnalysisResult> {
        observer.on_stage(AnalysisStage::ExtractText);
        let resume_text = extract_pdf_text(document)?;
        log::debug!("Extracted {} characters from resume document", resume_text.len());

        Ok(self.analyze_text(job_text, &resume_text, observer).await)
    }

    /// Analyze resume text that is already extracted
    pub async fn analyze_text(
        &self,
        job_text: &str,
        resume_text: &str,
        observer: &dyn ProgressObserver,
    ) -> AnalysisResult {
        let evaluation = self.evaluate(job_text, resume_text, observer);

        let (bundle, enrichment, job_links) = match &self.insight_provider {
            Some(provider) => {
                observer.on_stage(AnalysisStage::RequestEnrichment);
                self.enrich(provider.as_ref(), job_text, resume_text, &evaluation).await
            }
            None => (InsightBundle::default(), EnrichmentStatus::NotConfigured, Vec::new()),
        };

        observer.on_stage(AnalysisStage::AssembleResult);
        self.assemble(job_text, resume_text, evaluation, bundle, enrichment, job_links)
    }

    fn evaluate(&self, job_text: &str, resume_text: &str, observer: &dyn ProgressObserver) -> Evaluation {
        observer.on_stage(AnalysisStage::ComputeBaseSimilarity);
        let base_similarity = self.text_processor.similarity(job_text, resume_text);
        log::debug!("Base similarity: {:.2}%", base_similarity);

        observer.on_stage(AnalysisStage::ExtractSkills);
        let skills = self.skill_matcher.compare(job_text, resume_text);
        log::debug!(
            "Skills: {} in job, {} in resume, {} matched",
            skills.job.len(),
            skills.resume.len(),
            skills.matched.len()
        );

        observer.on_stage(AnalysisStage::CombineScore);
        let fit_score = scoring::combine(base_similarity, skills.matched.len(), skills.job.len(), &self.weights);
        let bucket = FitBucket::from_score(fit_score);
        log::debug!("Fit score: {} ({})", fit_score, bucket.label());

        Evaluation {
            base_similarity,
            skills,
            fit_score,
            bucket,
        }
    }

    async fn enrich(
        &self,
        provider: &dyn InsightProvider,
        job_text: &str,
        resume_text: &str,
        evaluation: &Evaluation,
    ) -> (InsightBundle, EnrichmentStatus, Vec<String>) {
        let request = InsightRequest {
            job_text,
            resume_text,
            missing_skills: evaluation.skills.missing.as_slice(),
            fit_score: evaluation.fit_score,
        };

        let bundle = match self
            .time_boxed("insight provider", || provider.enrich(&request))
            .await
        {
            Ok(bundle) => bundle,
            Err(e) => {
                log::warn!("Insight provider failed, using rule-based insights: {}", e);
                let status = EnrichmentStatus::Unavailable { reason: e.to_string() };
                return (InsightBundle::default(), status, Vec::new());
            }
        };

        if let Some(provider_matched) = &bundle.matched_skills {
            if provider_matched.as_slice() != evaluation.skills.matched.as_slice() {
                log::debug!(
                    "Provider matched skills {:?} differ from computed {:?}; keeping computed",
                    provider_matched,
                    evaluation.skills.matched.as_slice()
                );
            }
        }

        let job_links = match (&self.job_link_finder, bundle.keywords.as_deref()) {
            (Some(finder), Some(keywords)) if !keywords.is_empty() => {
                match self.time_boxed("job link lookup", || finder.find_listings(keywords)).await {
                    Ok(links) => links,
                    Err(e) => {
                        log::warn!("Job link lookup failed: {}", e);
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        };

        (bundle, EnrichmentStatus::Applied, job_links)
    }

    /// Retry transient failures, bounded by the provider timeout overall
    async fn time_boxed<T, F, Fut>(
        &self,
        service: &'static str,
        call: F,
    ) -> std::result::Result<T, ProviderError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<T, ProviderError>>,
    {
        let retried = self.retry_policy.run(|_| call(), ProviderError::is_transient);
        match tokio::time::timeout(self.provider_timeout, retried).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::TimedOut {
                service,
                after: self.provider_timeout,
            }),
        }
    }

    fn assemble(
        &self,
        job_text: &str,
        resume_text: &str,
        evaluation: Evaluation,
        bundle: InsightBundle,
        enrichment: EnrichmentStatus,
        job_links: Vec<String>,
    ) -> AnalysisResult {
        let Evaluation {
            base_similarity,
            skills,
            fit_score,
            bucket,
        } = evaluation;

        let fit_message = bucket.message().to_string();
        let observations = scoring::rule_based_observations(
            skills.matched.as_slice(),
            skills.missing.as_slice(),
            job_text,
            resume_text,
        );
        let top_keywords = self
            .text_processor
            .top_shared_keywords(job_text, resume_text, TOP_KEYWORD_LIMIT);

        AnalysisResult {
            fit_score,
            base_similarity,
            fit_bucket: bucket,
            general_insight: bundle.general_insight.unwrap_or_else(|| fit_message.clone()),
            fit_message,
            job_skills: skills.job.into_vec(),
            resume_skills: skills.resume.into_vec(),
            matched_skills: skills.matched.into_vec(),
            missing_skills: skills.missing.into_vec(),
            top_keywords,
            observations,
            ranked_missing_skills: bundle.ranked_missing_skills.unwrap_or_default(),
            highlight_areas: bundle.highlight_areas.unwrap_or_default(),
            project_suggestions: bundle.project_suggestions.unwrap_or_default(),
            keywords: bundle.keywords.unwrap_or_default(),
            job_links,
            enrichment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    const JOB: &str = "React TypeScript AWS 5 years experience";
    const RESUME: &str = "5 years React and TypeScript experience";

    enum Behavior {
        Succeed(InsightBundle),
        Fail(ProviderError),
        TransientThenSucceed(u32, InsightBundle),
        Hang,
    }

    struct StubProvider {
        behavior: Behavior,
        calls: AtomicU32,
        last_request: Mutex<Option<(Vec<String>, u8)>>,
    }

    impl StubProvider {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicU32::new(0),
                last_request: Mutex::new(None),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InsightProvider for StubProvider {
        async fn enrich(&self, request: &InsightRequest<'_>) -> std::result::Result<InsightBundle, ProviderError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some((request.missing_skills.to_vec(), request.fit_score));

            match &self.behavior {
                Behavior::Succeed(bundle) => Ok(bundle.clone()),
                Behavior::Fail(error) => Err(error.clone()),
                Behavior::TransientThenSucceed(failures, bundle) => {
                    if call < *failures {
                        Err(ProviderError::Transient("503".to_string()))
                    } else {
                        Ok(bundle.clone())
                    }
                }
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3_600)).await;
                    Ok(InsightBundle::default())
                }
            }
        }
    }

    struct StubLinks;

    #[async_trait]
    impl JobLinkFinder for StubLinks {
        async fn find_listings(&self, keywords: &[String]) -> std::result::Result<Vec<String>, ProviderError> {
            Ok(keywords.iter().map(|k| format!("https://jobs.example.com/?q={}", k)).collect())
        }
    }

    fn engine() -> AnalysisEngine {
        AnalysisEngine::new(FitWeights::default()).unwrap().with_retry_policy(RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(10),
            multiplier: 2.0,
            max_delay: Duration::from_millis(100),
            jitter: 0.0,
        })
    }

    fn full_bundle() -> InsightBundle {
        InsightBundle {
            general_insight: Some("Strong frontend candidate.".to_string()),
            ranked_missing_skills: Some(vec!["AWS".to_string()]),
            highlight_areas: Some(vec!["TypeScript migration".to_string()]),
            project_suggestions: Some(vec!["Deploy a React app on AWS".to_string()]),
            matched_skills: Some(vec!["React".to_string()]),
            keywords: Some(vec!["frontend".to_string()]),
        }
    }

    #[tokio::test]
    async fn test_reference_scenario() {
        let result = engine().analyze_text(JOB, RESUME, &NoProgress).await;

        assert!(result.matched_skills.contains(&"React".to_string()));
        assert!(result.matched_skills.contains(&"TypeScript".to_string()));
        assert_eq!(result.missing_skills, vec!["AWS".to_string()]);
        assert!(result.fit_score > 60, "score was {}", result.fit_score);
        assert_eq!(result.enrichment, EnrichmentStatus::NotConfigured);
        assert_eq!(result.general_insight, result.fit_message);
    }

    #[tokio::test]
    async fn test_no_job_skills_uses_similarity_term_only() {
        let job = "Friendly barista wanted for weekend shifts";
        let resume = "Weekend barista with friendly service record";
        let result = engine().analyze_text(job, resume, &NoProgress).await;

        assert!(result.job_skills.is_empty());
        let expected = scoring::adjusted_score(result.base_similarity, 0, 0, &FitWeights::default());
        assert_eq!(expected, result.base_similarity * 0.3);
        assert_eq!(result.fit_score, expected.clamp(0.0, 100.0).round() as u8);
    }

    #[tokio::test]
    async fn test_repeated_analysis_is_identical() {
        let engine = engine();
        let first = engine.analyze_text(JOB, RESUME, &NoProgress).await;
        let second = engine.analyze_text(JOB, RESUME, &NoProgress).await;

        assert_eq!(first, second);
        assert_eq!(first.base_similarity.to_bits(), second.base_similarity.to_bits());
    }

    #[tokio::test]
    async fn test_empty_inputs_still_produce_result() {
        let result = engine().analyze_text("", "", &NoProgress).await;

        assert_eq!(result.fit_score, 0);
        assert_eq!(result.fit_bucket, FitBucket::Limited);
        assert!(!result.fit_message.is_empty());
        assert!(result.matched_skills.is_empty());
    }

    #[tokio::test]
    async fn test_stages_reported_in_order() {
        let seen = Mutex::new(Vec::new());
        let observer = |stage: AnalysisStage| seen.lock().unwrap().push(stage);

        engine().analyze_text(JOB, RESUME, &observer).await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                AnalysisStage::ComputeBaseSimilarity,
                AnalysisStage::ExtractSkills,
                AnalysisStage::CombineScore,
                AnalysisStage::AssembleResult,
            ]
        );
    }

    #[tokio::test]
    async fn test_enrichment_stage_only_with_provider() {
        let seen = Mutex::new(Vec::new());
        let observer = |stage: AnalysisStage| seen.lock().unwrap().push(stage);
        let engine = engine().with_insight_provider(StubProvider::new(Behavior::Succeed(full_bundle())));

        engine.analyze_text(JOB, RESUME, &observer).await;

        let stages = seen.lock().unwrap();
        assert_eq!(stages[3], AnalysisStage::RequestEnrichment);
        assert_eq!(stages.last(), Some(&AnalysisStage::AssembleResult));
    }

    #[tokio::test]
    async fn test_provider_bundle_is_merged() {
        let provider = StubProvider::new(Behavior::Succeed(full_bundle()));
        let engine = engine()
            .with_insight_provider(provider.clone())
            .with_job_link_finder(Arc::new(StubLinks));

        let result = engine.analyze_text(JOB, RESUME, &NoProgress).await;

        assert_eq!(result.enrichment, EnrichmentStatus::Applied);
        assert_eq!(result.general_insight, "Strong frontend candidate.");
        assert_eq!(result.highlight_areas, vec!["TypeScript migration".to_string()]);
        assert_eq!(result.job_links, vec!["https://jobs.example.com/?q=frontend".to_string()]);
        // computed matches stay authoritative
        assert_eq!(result.matched_skills, vec!["TypeScript".to_string(), "React".to_string()]);

        let (missing, score) = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(missing, vec!["AWS".to_string()]);
        assert_eq!(score, result.fit_score);
    }

    #[tokio::test]
    async fn test_partial_bundle_falls_back_to_fit_message() {
        let bundle = InsightBundle {
            project_suggestions: Some(vec!["Ship something".to_string()]),
            ..InsightBundle::default()
        };
        let engine = engine().with_insight_provider(StubProvider::new(Behavior::Succeed(bundle)));

        let result = engine.analyze_text(JOB, RESUME, &NoProgress).await;

        assert_eq!(result.general_insight, result.fit_message);
        assert_eq!(result.project_suggestions.len(), 1);
        assert!(result.job_links.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_degrades() {
        let provider = StubProvider::new(Behavior::Fail(ProviderError::Unavailable("401".to_string())));
        let engine = engine().with_insight_provider(provider.clone());

        let baseline = AnalysisEngine::new(FitWeights::default())
            .unwrap()
            .analyze_text(JOB, RESUME, &NoProgress)
            .await;
        let result = engine.analyze_text(JOB, RESUME, &NoProgress).await;

        assert_eq!(provider.calls(), 1);
        assert!(matches!(result.enrichment, EnrichmentStatus::Unavailable { .. }));
        assert_eq!(result.fit_score, baseline.fit_score);
        assert_eq!(result.matched_skills, baseline.matched_skills);
        assert_eq!(result.general_insight, result.fit_message);
        assert!(result.ranked_missing_skills.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried() {
        let provider = StubProvider::new(Behavior::TransientThenSucceed(2, full_bundle()));
        let engine = engine().with_insight_provider(provider.clone());

        let result = engine.analyze_text(JOB, RESUME, &NoProgress).await;

        assert_eq!(provider.calls(), 3);
        assert_eq!(result.enrichment, EnrichmentStatus::Applied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhausted_degrades() {
        let provider = StubProvider::new(Behavior::TransientThenSucceed(10, full_bundle()));
        let engine = engine().with_insight_provider(provider.clone());

        let result = engine.analyze_text(JOB, RESUME, &NoProgress).await;

        assert_eq!(provider.calls(), 3);
        assert!(matches!(result.enrichment, EnrichmentStatus::Unavailable { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out() {
        let engine = engine()
            .with_insight_provider(StubProvider::new(Behavior::Hang))
            .with_provider_timeout(Duration::from_secs(5));

        let result = engine.analyze_text(JOB, RESUME, &NoProgress).await;

        match result.enrichment {
            EnrichmentStatus::Unavailable { reason } => {
                assert_eq!(reason, "insight provider timed out after 5s")
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(!result.general_insight.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_names_the_slow_service() {
        let engine = engine().with_provider_timeout(Duration::from_secs(5));

        let result: std::result::Result<Vec<String>, ProviderError> = engine
            .time_boxed("job link lookup", || async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Vec::new())
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, ProviderError::TimedOut { service: "job link lookup", .. }));
        assert_eq!(err.to_string(), "job link lookup timed out after 5s");
    }

    #[tokio::test]
    async fn test_invalid_document_is_extraction_error() {
        let result = engine()
            .analyze_document(JOB, b"definitely not a pdf", &NoProgress)
            .await;

        assert!(matches!(result, Err(crate::error::ResumeFitError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_concurrent_analyses_share_engine() {
        let engine = Arc::new(engine());
        let (a, b) = tokio::join!(
            engine.analyze_text(JOB, RESUME, &NoProgress),
            engine.analyze_text("Python Docker", "Python developer", &NoProgress)
        );

        assert_eq!(a.missing_skills, vec!["AWS".to_string()]);
        assert_eq!(b.missing_skills, vec!["Docker".to_string()]);
    }

    #[test]
    fn test_from_config_without_endpoint() {
        let engine = AnalysisEngine::from_config(&Config::default()).unwrap();
        assert!(!engine.has_insight_provider());
        assert_eq!(engine.weights(), FitWeights::SKILL_DOMINANT);
    }

    #[test]
    fn test_from_config_with_endpoint() {
        let mut config = Config::default();
        config.insights.endpoint = Some("http://localhost:9/enrich".to_string());

        let engine = AnalysisEngine::from_config(&config).unwrap();
        assert!(engine.has_insight_provider());
        assert!(!engine.without_insights().has_insight_provider());
    }
}

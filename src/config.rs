//! Configuration management for the resume fit analyzer

use crate::error::{Result, ResumeFitError};
use crate::insights::retry::RetryPolicy;
use crate::processing::scoring::FitWeights;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub insights: InsightsConfig,
    pub job_links: JobLinksConfig,
    pub output: OutputConfig,
}

/// Blend weights for the fit score. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub similarity_weight: f64,
    pub skill_weight: f64,
}

/// External insight provider settings. No endpoint means no provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub multiplier: f64,
    pub max_delay_ms: u64,
    pub jitter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobLinksConfig {
    pub enabled: bool,
    pub search_urls: Vec<String>,
    pub max_links: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Text,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let weights = FitWeights::SKILL_DOMINANT;
        Self {
            similarity_weight: weights.similarity(),
            skill_weight: weights.skill(),
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            multiplier: 2.0,
            max_delay_ms: 8_000,
            jitter: 0.25,
        }
    }
}

impl Default for JobLinksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            search_urls: vec![
                "https://www.linkedin.com/jobs/search/".to_string(),
                "https://www.indeed.com/jobs".to_string(),
            ],
            max_links: 5,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl ScoringConfig {
    /// Validated weights for the combiner
    pub fn weights(&self) -> Result<FitWeights> {
        FitWeights::new(self.similarity_weight, self.skill_weight)
    }
}

impl InsightsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
            multiplier: self.multiplier,
            max_delay: Duration::from_millis(self.max_delay_ms),
            jitter: self.jitter,
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default location when none is given.
    /// A missing file is created with defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Read the file without validating it so `config set` can repair a bad value.
    /// An unreadable or unparsable file yields the defaults.
    pub fn load_for_repair(path: &Path) -> Self {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str::<Config>(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring unreadable config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ResumeFitError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeFitError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-fit")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.weights()?;

        let retry = &self.insights.retry;
        if !(0.0..=1.0).contains(&retry.jitter) {
            return Err(ResumeFitError::Configuration(format!(
                "insights.retry.jitter must be within [0, 1], got {}",
                retry.jitter
            )));
        }
        if retry.multiplier < 1.0 {
            return Err(ResumeFitError::Configuration(format!(
                "insights.retry.multiplier must be at least 1.0, got {}",
                retry.multiplier
            )));
        }
        if self.insights.timeout_secs == 0 {
            return Err(ResumeFitError::Configuration(
                "insights.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Set a single value by dotted key, e.g. `scoring.skill_weight`.
    ///
    /// Setting one weight moves the other so the pair still sums to 1.0.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "scoring.similarity_weight" => {
                let weight = parse_value::<f64>(key, value)?;
                self.scoring.similarity_weight = weight;
                self.scoring.skill_weight = 1.0 - weight;
            }
            "scoring.skill_weight" => {
                let weight = parse_value::<f64>(key, value)?;
                self.scoring.skill_weight = weight;
                self.scoring.similarity_weight = 1.0 - weight;
            }
            "insights.endpoint" => {
                self.insights.endpoint = non_empty(value);
            }
            "insights.api_key" => {
                self.insights.api_key = non_empty(value);
            }
            "insights.timeout_secs" => {
                self.insights.timeout_secs = parse_value(key, value)?;
            }
            "insights.retry.max_retries" => {
                self.insights.retry.max_retries = parse_value(key, value)?;
            }
            "job_links.enabled" => {
                self.job_links.enabled = parse_value(key, value)?;
            }
            "job_links.max_links" => {
                self.job_links.max_links = parse_value(key, value)?;
            }
            "output.format" => {
                self.output.format = crate::cli::parse_output_format(value)
                    .map_err(ResumeFitError::Configuration)?;
            }
            "output.detailed" => {
                self.output.detailed = parse_value(key, value)?;
            }
            "output.color_output" => {
                self.output.color_output = parse_value(key, value)?;
            }
            _ => {
                return Err(ResumeFitError::Configuration(format!("Unknown configuration key: {}", key)));
            }
        }

        self.validate()
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ResumeFitError::Configuration(format!("Invalid value for {}: {}", key, value)))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

//! External insight collaborators
//!
//! The analyzer only talks to these through the [`InsightProvider`] and
//! [`JobLinkFinder`] traits. Every failure here is recoverable: the analyzer
//! falls back to rule-based output.

pub mod http;
pub mod job_links;
pub mod retry;

use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("insight provider unavailable: {0}")]
    Unavailable(String),

    #[error("transient provider failure: {0}")]
    Transient(String),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("{service} timed out after {after:?}")]
    TimedOut { service: &'static str, after: Duration },
}

impl ProviderError {
    /// Rate limits and temporary outages are worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Transient(_))
    }
}

/// What the provider is asked about
#[derive(Debug, Clone, Serialize)]
pub struct InsightRequest<'a> {
    pub job_text: &'a str,
    pub resume_text: &'a str,
    pub missing_skills: &'a [String],
    pub fit_score: u8,
}

/// Free-text enrichment. Every field is optional; absent fields fall back to
/// rule-based output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightBundle {
    pub general_insight: Option<String>,
    pub ranked_missing_skills: Option<Vec<String>>,
    pub highlight_areas: Option<Vec<String>>,
    pub project_suggestions: Option<Vec<String>>,
    pub matched_skills: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
}

#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn enrich(&self, request: &InsightRequest<'_>) -> Result<InsightBundle, ProviderError>;
}

#[async_trait]
pub trait JobLinkFinder: Send + Sync {
    async fn find_listings(&self, keywords: &[String]) -> Result<Vec<String>, ProviderError>;
}

impl InsightBundle {
    /// Read a bundle out of a JSON object, field by field.
    ///
    /// Keys may be snake_case or camelCase. A field with the wrong shape is
    /// dropped on its own; only a non-object payload fails as a whole.
    pub fn from_json_value(value: &Value) -> Result<Self, ProviderError> {
        let object = value.as_object().ok_or_else(|| {
            ProviderError::MalformedResponse(format!("expected a JSON object, got {}", json_kind(value)))
        })?;

        Ok(Self {
            general_insight: text_field(object, "general_insight", "generalInsight"),
            ranked_missing_skills: list_field(object, "ranked_missing_skills", "rankedMissingSkills"),
            highlight_areas: list_field(object, "highlight_areas", "highlightAreas"),
            project_suggestions: list_field(object, "project_suggestions", "projectSuggestions"),
            matched_skills: list_field(object, "matched_skills", "matchedSkills"),
            keywords: list_field(object, "keywords", "keywords"),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.general_insight.is_none()
            && self.ranked_missing_skills.is_none()
            && self.highlight_areas.is_none()
            && self.project_suggestions.is_none()
            && self.matched_skills.is_none()
            && self.keywords.is_none()
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, snake: &str, camel: &str) -> Option<&'a Value> {
    object
        .get(snake)
        .or_else(|| object.get(camel))
        .filter(|v| !v.is_null())
}

fn text_field(object: &Map<String, Value>, snake: &str, camel: &str) -> Option<String> {
    match lookup(object, snake, camel)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::String(_) => None,
        other => {
            warn!("Ignoring provider field '{}': expected string, got {}", snake, json_kind(other));
            None
        }
    }
}

fn list_field(object: &Map<String, Value>, snake: &str, camel: &str) -> Option<Vec<String>> {
    match lookup(object, snake, camel)? {
        Value::Array(items) => {
            let values: Vec<String> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if values.len() < items.len() {
                warn!("Dropped {} non-text entries from provider field '{}'", items.len() - values.len(), snake);
            }
            Some(values)
        }
        other => {
            warn!("Ignoring provider field '{}': expected list, got {}", snake, json_kind(other));
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

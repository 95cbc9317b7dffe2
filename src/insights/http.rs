//! Insight provider backed by a JSON-over-HTTP endpoint

use crate::error::{Result, ResumeFitError};
use crate::insights::{InsightBundle, InsightProvider, InsightRequest, ProviderError};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

/// Longest slice of an error body carried into a log line
const MAX_ERROR_BODY_CHARS: usize = 200;

/// POSTs the [`InsightRequest`] as JSON and reads an [`InsightBundle`] back.
///
/// Retries are left to the caller; this adapter only classifies failures.
#[derive(Clone)]
pub struct HttpInsightProvider {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpInsightProvider {
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResumeFitError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Self::with_client(client, endpoint, api_key)
    }

    pub fn with_client(client: Client, endpoint: &str, api_key: Option<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ResumeFitError::Configuration(format!("Invalid insights endpoint '{}': {}", endpoint, e)))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl InsightProvider for HttpInsightProvider {
    async fn enrich(&self, request: &InsightRequest<'_>) -> std::result::Result<InsightBundle, ProviderError> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            let error = classify_status(status, &body);
            warn!("Insight endpoint returned {}", status);
            return Err(error);
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(format!("response is not JSON: {}", e)))?;
        let bundle = InsightBundle::from_json_value(&value)?;

        debug!("Insight endpoint returned {} bytes", body.len());
        Ok(bundle)
    }
}

/// 429 and 5xx are worth retrying; any other failure status is final
pub fn classify_status(status: StatusCode, body: &str) -> ProviderError {
    let snippet: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    let message = if snippet.trim().is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), snippet.trim())
    };

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        ProviderError::Transient(message)
    } else {
        ProviderError::Unavailable(message)
    }
}

fn classify_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() || error.is_connect() {
        ProviderError::Transient(error.to_string())
    } else if error.is_decode() || error.is_body() {
        ProviderError::MalformedResponse(error.to_string())
    } else {
        ProviderError::Unavailable(error.to_string())
    }
}

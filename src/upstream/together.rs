//! Together AI client over its OpenAI-compatible HTTP API

use async_trait::async_trait;
use std::time::Duration;

use super::{Completion, CompletionBackend, UpstreamError};
use crate::api::{ChatCompletionRequest, ChatCompletionResponse};
use crate::config::{BackendConfig, ConfigError};

/// reqwest-backed completion client
pub struct TogetherClient {
    http: reqwest::Client,
    base_url: String,
    completions_url: String,
    api_key: String,
}

/// Build an HTTP client; certificates are always verified
fn build_http_client(config: &BackendConfig) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| ConfigError::Validation(format!("HTTP client: {}", e)))
}

impl TogetherClient {
    /// Create a client from backend settings. Requires an API key.
    pub fn from_config(config: &BackendConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?
            .to_string();

        Ok(Self {
            http: build_http_client(config)?,
            base_url: config.base_url().to_string(),
            completions_url: config.completions_url(),
            api_key,
        })
    }

    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }

    /// List model ids served by the endpoint (`GET /v1/models`).
    ///
    /// Accepts both a bare array and the `{"data": [...]}` envelope.
    pub async fn list_models(&self) -> Result<Vec<String>, UpstreamError> {
        let url = format!("{}/v1/models", self.base_url);
        let resp = self.http.get(&url).bearer_auth(&self.api_key).send().await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let json: serde_json::Value = serde_json::from_slice(&body).map_err(UpstreamError::Decode)?;
        let entries = json
            .as_array()
            .or_else(|| json.get("data").and_then(|d| d.as_array()))
            .cloned()
            .unwrap_or_default();

        Ok(entries
            .iter()
            .filter_map(|m| m.get("id").and_then(|i| i.as_str()))
            .map(str::to_string)
            .collect())
    }
}

#[async_trait]
impl CompletionBackend for TogetherClient {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<Completion, UpstreamError> {
        tracing::debug!(
            url = %self.completions_url,
            model = %request.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        let resp = self
            .http
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let error_body = String::from_utf8_lossy(&body).into_owned();
            tracing::error!(
                status = %status,
                error_body = %error_body,
                "Backend returned error response"
            );
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(
                body_size = body.len(),
                body_preview = %String::from_utf8_lossy(&body[..body.len().min(200)]),
                "Completion response is not valid JSON"
            );
            UpstreamError::Decode(e)
        })?;

        Completion::try_from(parsed)
    }

    fn name(&self) -> &str {
        "together"
    }
}

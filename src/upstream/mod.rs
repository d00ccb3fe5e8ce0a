//! Calls to the external completion endpoint

mod together;

use async_trait::async_trait;

use crate::api::{ChatCompletionRequest, ChatCompletionResponse, Usage};

pub use together::TogetherClient;

/// A completion endpoint able to answer a chat completion request
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one request; a single attempt with no retries.
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<Completion, UpstreamError>;

    /// Name of the backend, for logs
    fn name(&self) -> &str;
}

/// First completion returned by the endpoint, trimmed
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub model: Option<String>,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

impl TryFrom<ChatCompletionResponse> for Completion {
    type Error = UpstreamError;

    fn try_from(response: ChatCompletionResponse) -> Result<Self, Self::Error> {
        let text = response
            .first_text()
            .ok_or(UpstreamError::EmptyCompletion)?
            .trim()
            .to_string();
        Ok(Self {
            text,
            finish_reason: response.first_finish_reason().map(str::to_string),
            model: response.model,
            usage: response.usage,
        })
    }
}

/// Why an upstream call produced no completion.
///
/// The `Display` text is what clients see; response bodies and transport
/// details stay in the logs.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("could not reach completion endpoint")]
    Transport(#[source] reqwest::Error),

    #[error("completion endpoint timed out")]
    Timeout,

    #[error("upstream returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("malformed completion response")]
    Decode(#[source] serde_json::Error),

    #[error("completion response contained no text")]
    EmptyCompletion,
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(err)
        }
    }
}

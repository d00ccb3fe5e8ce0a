//! Metrics collection from completion calls

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::ChatCompletionRequest;
use crate::prompt::ToolKind;
use crate::upstream::Completion;

/// Collected metrics from a request/response cycle
#[derive(Debug, Clone, Serialize)]
pub struct RequestMetrics {
    /// Unique request ID
    pub request_id: String,
    /// Timestamp of the request
    pub timestamp: DateTime<Utc>,
    /// Tool type that served the request
    pub tool: ToolKind,
    /// Model name (as reported upstream, else as requested)
    pub model: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    /// Completion tokens per second of wall time
    pub tokens_per_second: f64,
    /// Input message count
    pub input_messages: usize,
    /// Input length (characters)
    pub input_len: usize,
    /// Output length (characters)
    pub output_len: usize,
    pub finish_reason: String,
    /// Request duration in ms
    pub duration_ms: f64,
}

impl RequestMetrics {
    pub fn new(request_id: Uuid, tool: ToolKind) -> Self {
        Self {
            request_id: request_id.to_string(),
            timestamp: Utc::now(),
            tool,
            model: "unknown".to_string(),
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            tokens_per_second: 0.0,
            input_messages: 0,
            input_len: 0,
            output_len: 0,
            finish_reason: "unknown".to_string(),
            duration_ms: 0.0,
        }
    }

    /// Extract metrics from a finished completion and the request that produced it
    pub fn from_completion(
        request_id: Uuid,
        tool: ToolKind,
        request: &ChatCompletionRequest,
        completion: &Completion,
        duration_ms: f64,
    ) -> Self {
        let mut metrics = Self::new(request_id, tool);
        metrics.duration_ms = duration_ms;

        metrics.model = completion
            .model
            .clone()
            .unwrap_or_else(|| request.model.clone());

        if let Some(ref usage) = completion.usage {
            metrics.prompt_tokens = usage.prompt_tokens;
            metrics.completion_tokens = usage.completion_tokens;
            metrics.total_tokens = if usage.total_tokens > 0 {
                usage.total_tokens
            } else {
                usage.prompt_tokens + usage.completion_tokens
            };
        }

        if duration_ms > 0.0 {
            metrics.tokens_per_second = metrics.completion_tokens as f64 / (duration_ms / 1000.0);
        }

        if let Some(ref reason) = completion.finish_reason {
            metrics.finish_reason = reason.clone();
        }

        metrics.input_messages = request.messages.len();
        metrics.input_len = request.messages.iter().map(|m| m.content.chars().count()).sum();
        metrics.output_len = completion.text.chars().count();

        metrics
    }
}

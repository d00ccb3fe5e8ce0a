//! Endpoint handlers sharing one completion pipeline

use axum::{extract::State, Json};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use super::error::ApiError;
use super::server::ProxyState;
use crate::api::{
    ChatCompletionRequest, ChatRequest, ChatResponse, GenerateCodeRequest, GenerateCodeResponse,
    GenerateTextRequest, GenerateTextResponse, HealthResponse, SummarizeRequest,
    SummarizeResponse, TranslateRequest, TranslateResponse,
};
use crate::config::StatsFormat;
use crate::prompt::{
    chat_transcript, code_transcript, summarize_transcript, text_transcript,
    translate_transcript, TextCategory, ToolKind, Transcript,
};
use crate::stats::{format_metrics, format_request_log, RequestMetrics};

/// Runs one tool request: parse, call upstream once, log
pub struct ToolHandler {
    state: ProxyState,
    kind: ToolKind,
}

impl ToolHandler {
    pub fn new(state: ProxyState, kind: ToolKind) -> Self {
        Self { state, kind }
    }

    /// Parse a request body. An empty body is the same as `{}`.
    pub fn parse<T: DeserializeOwned + Default>(&self, body: &[u8]) -> Result<T, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        serde_json::from_slice(body).map_err(|e| ApiError::new(self.kind, e))
    }

    /// Send the transcript with this tool's profile and return the completion text
    pub async fn complete(&self, transcript: Transcript) -> Result<String, ApiError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("tool", tool = %self.kind, request_id = %request_id);

        async move {
            let start = Instant::now();
            let profile = self.state.config.tool_profile(self.kind);

            tracing::info!("{}", format_request_log(self.kind, &profile.model, &transcript));
            tracing::debug!(prompt = %transcript.render(), "Built transcript");

            let request = ChatCompletionRequest::new(&profile, transcript.into_messages());
            let completion = self
                .state
                .backend
                .complete(&request)
                .await
                .map_err(|e| ApiError::new(self.kind, e))?;

            let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

            if self.state.config.stats.enabled {
                let metrics = RequestMetrics::from_completion(
                    request_id,
                    self.kind,
                    &request,
                    &completion,
                    duration_ms,
                );
                let formatted = format_metrics(&metrics, self.state.config.stats.format);
                if self.state.config.stats.format == StatsFormat::Pretty {
                    tracing::info!("\n{}", formatted);
                } else {
                    tracing::info!("{}", formatted);
                }
            } else {
                tracing::debug!(
                    duration_ms,
                    output_len = completion.text.len(),
                    backend = self.state.backend.name(),
                    "Completion received"
                );
            }

            Ok::<_, ApiError>(completion.text)
        }
        .instrument(span)
        .await
    }
}

/// `POST /api/generate-text`
pub async fn generate_text(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Json<GenerateTextResponse>, ApiError> {
    let handler = ToolHandler::new(state, ToolKind::Text);
    let request: GenerateTextRequest = handler.parse(&body)?;

    let category = TextCategory::from_tag(request.category());
    let content = handler
        .complete(text_transcript(category, request.prompt()))
        .await?;

    Ok(Json(GenerateTextResponse {
        success: true,
        content,
        category: request.category().to_string(),
    }))
}

/// `POST /api/chat`
pub async fn chat(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    let handler = ToolHandler::new(state, ToolKind::Chat);
    let request: ChatRequest = handler.parse(&body)?;

    let response = handler
        .complete(chat_transcript(request.history(), request.message()))
        .await?;

    Ok(Json(ChatResponse {
        success: true,
        response,
    }))
}

/// `POST /api/generate-code`
pub async fn generate_code(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Json<GenerateCodeResponse>, ApiError> {
    let handler = ToolHandler::new(state, ToolKind::Code);
    let request: GenerateCodeRequest = handler.parse(&body)?;

    let content = handler
        .complete(code_transcript(
            request.language(),
            request.history(),
            request.prompt(),
        ))
        .await?;

    Ok(Json(GenerateCodeResponse {
        success: true,
        content,
        language: request.language().to_string(),
    }))
}

/// `POST /api/summarize`
pub async fn summarize(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let handler = ToolHandler::new(state, ToolKind::Summarize);
    let request: SummarizeRequest = handler.parse(&body)?;

    let summary = handler.complete(summarize_transcript(request.text())).await?;

    Ok(Json(SummarizeResponse {
        success: true,
        summary,
    }))
}

/// `POST /api/translate`
pub async fn translate(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Json<TranslateResponse>, ApiError> {
    let handler = ToolHandler::new(state, ToolKind::Translate);
    let request: TranslateRequest = handler.parse(&body)?;

    let translation = handler
        .complete(translate_transcript(
            request.source_language(),
            request.target_language(),
            request.text(),
        ))
        .await?;

    Ok(Json(TranslateResponse {
        success: true,
        translation,
        source_language: request.source_language().to_string(),
        target_language: request.target_language().to_string(),
    }))
}

/// `GET /api/health`; never touches the upstream
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

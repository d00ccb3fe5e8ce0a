//! Uniform error envelope for the `/api/*` endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::ErrorResponse;
use crate::prompt::ToolKind;
use crate::upstream::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// A failed tool call, rendered as `{success: false, error}`
#[derive(Debug)]
pub struct ApiError {
    kind: ToolKind,
    error: ProxyError,
}

impl ApiError {
    pub fn new(kind: ToolKind, error: impl Into<ProxyError>) -> Self {
        Self {
            kind,
            error: error.into(),
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn error(&self) -> &ProxyError {
        &self.error
    }

    pub fn status_code(&self) -> StatusCode {
        match self.error {
            ProxyError::InvalidBody(_) | ProxyError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message, e.g. "Chat failed: upstream returned HTTP 502"
    pub fn message(&self) -> String {
        format!("{} failed: {}", self.kind.label(), self.error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let source = std::error::Error::source(&self.error).map(|s| s.to_string());
        tracing::error!(
            tool = %self.kind,
            error = %self.error,
            source = ?source,
            "{} error",
            self.kind.label()
        );

        (self.status_code(), Json(ErrorResponse::new(self.message()))).into_response()
    }
}

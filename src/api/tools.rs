//! Request and response bodies of the public `/api/*` endpoints
//!
//! Every request field is optional: a missing or `null` field falls back to
//! its default instead of rejecting the request. Fields of the wrong JSON type
//! are coerced (scalars to their text) or dropped, never rejected.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_TEXT_TYPE: &str = "general";
pub const DEFAULT_CODE_LANGUAGE: &str = "python";
pub const DEFAULT_SOURCE_LANGUAGE: &str = "English";
pub const DEFAULT_TARGET_LANGUAGE: &str = "Hindi";

/// Read any JSON value as optional text: `null` is absent, strings pass
/// through, other values use their JSON rendering (`5`, `true`, `[1,2]`).
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Read a conversation history. Anything but an array is absent, and
/// entries that are not objects are skipped.
fn lenient_history<'de, D>(deserializer: D) -> Result<Option<Vec<Turn>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    Ok(Some(
        entries
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
    ))
}

/// One prior exchange of a conversation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Turn {
    #[serde(default, deserialize_with = "lenient_string")]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub assistant: Option<String>,
}

impl Turn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            assistant: Some(assistant.into()),
        }
    }

    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or_default()
    }

    pub fn assistant(&self) -> &str {
        self.assistant.as_deref().unwrap_or_default()
    }
}

/// `POST /api/generate-text`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerateTextRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub prompt: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
}

impl GenerateTextRequest {
    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or_default()
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_TEXT_TYPE)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateTextResponse {
    pub success: bool,
    pub content: String,
    #[serde(rename = "type")]
    pub category: String,
}

/// `POST /api/chat`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_history")]
    pub history: Option<Vec<Turn>>,
}

impl ChatRequest {
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    pub fn history(&self) -> &[Turn] {
        self.history.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
}

/// `POST /api/generate-code`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerateCodeRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient_history")]
    pub history: Option<Vec<Turn>>,
}

impl GenerateCodeRequest {
    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or_default()
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_CODE_LANGUAGE)
    }

    pub fn history(&self) -> &[Turn] {
        self.history.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateCodeResponse {
    pub success: bool,
    pub content: String,
    pub language: String,
}

/// `POST /api/summarize`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SummarizeRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
}

impl SummarizeRequest {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummarizeResponse {
    pub success: bool,
    pub summary: String,
}

/// `POST /api/translate`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TranslateRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source_language: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub target_language: Option<String>,
}

impl TranslateRequest {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn source_language(&self) -> &str {
        self.source_language.as_deref().unwrap_or(DEFAULT_SOURCE_LANGUAGE)
    }

    pub fn target_language(&self) -> &str {
        self.target_language.as_deref().unwrap_or(DEFAULT_TARGET_LANGUAGE)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslateResponse {
    pub success: bool,
    pub translation: String,
    pub source_language: String,
    pub target_language: String,
}

/// Body of every failed `/api/*` call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// `GET /api/health`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "QwikGen API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

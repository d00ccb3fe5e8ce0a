//! Prompt construction for each tool type
//!
//! A request is turned into a [`Transcript`]: an optional system
//! instruction, a bounded window of prior turns, and the new user input.

mod templates;
mod transcript;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use templates::*;
pub use transcript::{recent_turns, Transcript, HISTORY_WINDOW};

/// Which endpoint pipeline (and decoding profile) a request goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Text,
    Chat,
    Code,
    Summarize,
    Translate,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Text,
        ToolKind::Chat,
        ToolKind::Code,
        ToolKind::Summarize,
        ToolKind::Translate,
    ];

    /// Config key of this tool
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Text => "text",
            ToolKind::Chat => "chat",
            ToolKind::Code => "code",
            ToolKind::Summarize => "summarize",
            ToolKind::Translate => "translate",
        }
    }

    /// Human label used as the prefix of error messages
    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Text => "Text generation",
            ToolKind::Chat => "Chat",
            ToolKind::Code => "Code generation",
            ToolKind::Summarize => "Summarization",
            ToolKind::Translate => "Translation",
        }
    }

    /// Route serving this tool
    pub fn route(&self) -> &'static str {
        match self {
            ToolKind::Text => "/api/generate-text",
            ToolKind::Chat => "/api/chat",
            ToolKind::Code => "/api/generate-code",
            ToolKind::Summarize => "/api/summarize",
            ToolKind::Translate => "/api/translate",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

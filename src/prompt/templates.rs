//! Fixed instructions and per-tool transcript builders

use super::Transcript;
use crate::api::Turn;

pub const BLOG_INSTRUCTION: &str =
    "You are a professional blog writer. Write clear, engaging blogs.";
pub const EMAIL_INSTRUCTION: &str = "You are an expert at writing professional emails.";
pub const STARTUP_INSTRUCTION: &str = "You are a startup advisor. Give practical startup ideas.";
pub const GENERAL_INSTRUCTION: &str =
    "You are a helpful AI assistant. Give accurate, concise responses.";

pub const CHAT_INSTRUCTION: &str = "You are ChatGPT, a helpful, friendly, and conversational AI assistant. \
Answer in clear, natural language. \
Explain step by step when useful, and keep responses easy to read.";

/// Category of a text generation request (the `type` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCategory {
    Blog,
    Email,
    Startup,
    General,
}

impl TextCategory {
    /// Map a client tag to a category. Unrecognized tags are `General`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "blog" => TextCategory::Blog,
            "email" => TextCategory::Email,
            "startup" => TextCategory::Startup,
            _ => TextCategory::General,
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            TextCategory::Blog => BLOG_INSTRUCTION,
            TextCategory::Email => EMAIL_INSTRUCTION,
            TextCategory::Startup => STARTUP_INSTRUCTION,
            TextCategory::General => GENERAL_INSTRUCTION,
        }
    }
}

pub fn code_instruction(language: &str) -> String {
    format!(
        "You are Ghostwriter, an expert {} developer and web designer. \
         Only return clean, production-ready code with best practices.",
        language
    )
}

pub fn text_transcript(category: TextCategory, prompt: &str) -> Transcript {
    Transcript::with_system(category.instruction()).user(prompt)
}

pub fn chat_transcript(history: &[Turn], message: &str) -> Transcript {
    Transcript::with_system(CHAT_INSTRUCTION)
        .history(history)
        .user(message)
}

pub fn code_transcript(language: &str, history: &[Turn], prompt: &str) -> Transcript {
    Transcript::with_system(code_instruction(language))
        .history(history)
        .user(prompt)
}

pub fn summarize_transcript(text: &str) -> Transcript {
    Transcript::new().user(format!(
        "Please summarize the following text:\n\n{}\n\nSummary:",
        text
    ))
}

pub fn translate_transcript(source_language: &str, target_language: &str, text: &str) -> Transcript {
    Transcript::new().user(format!(
        "Translate from {} to {}:\n\n{}\n\nTranslation:",
        source_language, target_language, text
    ))
}

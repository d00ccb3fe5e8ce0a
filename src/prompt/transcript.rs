use crate::api::{ChatMessage, Role, Turn};

/// Maximum number of prior turns forwarded upstream
pub const HISTORY_WINDOW: usize = 10;

/// The most recent `HISTORY_WINDOW` turns, in their original order
pub fn recent_turns(history: &[Turn]) -> &[Turn] {
    &history[history.len().saturating_sub(HISTORY_WINDOW)..]
}

/// Ordered role-tagged messages sent to the completion endpoint.
/// Built fresh for every request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transcript with a system instruction
    pub fn with_system(instruction: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(instruction)],
        }
    }

    /// Append the last `HISTORY_WINDOW` turns as user/assistant pairs
    pub fn history(mut self, history: &[Turn]) -> Self {
        for turn in recent_turns(history) {
            self.messages.push(ChatMessage::user(turn.user()));
            self.messages.push(ChatMessage::assistant(turn.assistant()));
        }
        self
    }

    /// Append the new user input
    pub fn user(mut self, text: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::user(text));
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn system_instruction(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }

    /// The newest user message (the request's own input)
    pub fn latest_user(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }

    /// Number of prior turns included
    pub fn turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .count()
    }

    /// Render as the flat `System:/User:/Assistant:` prompt format
    pub fn render(&self) -> String {
        let mut out = String::new();
        for m in &self.messages {
            match m.role {
                Role::System => {
                    out.push_str("System: ");
                    out.push_str(&m.content);
                    out.push_str("\n\n");
                }
                Role::User => {
                    out.push_str("User: ");
                    out.push_str(&m.content);
                    out.push('\n');
                }
                Role::Assistant => {
                    out.push_str("Assistant: ");
                    out.push_str(&m.content);
                    out.push('\n');
                }
            }
        }
        out.push_str("Assistant:");
        out
    }
}

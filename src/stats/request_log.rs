//! Request logging formatter

use crate::prompt::{ToolKind, Transcript};

/// Format a request log message in compact format
pub fn format_request_log(kind: ToolKind, model: &str, transcript: &Transcript) -> String {
    let mut parts = vec![
        format!("tool={}", kind),
        format!("model={}", model),
        format!("msgs={}", transcript.len()),
    ];

    let turns = transcript.turns();
    if turns > 0 {
        parts.push(format!("turns={}", turns));
    }

    if let Some(msg) = transcript.latest_user() {
        let normalized = normalize_whitespace(msg);
        if !normalized.is_empty() {
            parts.push(format!("\"{}\"", truncate_message(&normalized)));
        }
    }

    format!("→ {}", parts.join(" "))
}

/// Convert newlines and tabs to single spaces, collapse multiple spaces
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate message according to rules:
/// - If <= 100 chars: show all
/// - If > 100 chars: first 25 + " ... " + last 75
fn truncate_message(s: &str) -> String {
    const MAX_TOTAL: usize = 100;
    const PREFIX_LEN: usize = 25;
    const SUFFIX_LEN: usize = 75;
    const ELLIPSIS: &str = " ... ";

    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= MAX_TOTAL {
        return s.to_string();
    }

    let prefix: String = chars[..PREFIX_LEN].iter().collect();
    let suffix: String = chars[chars.len() - SUFFIX_LEN..].iter().collect();

    format!("{}{}{}", prefix, ELLIPSIS, suffix)
}

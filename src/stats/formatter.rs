//! Stats formatting for different output formats

use super::RequestMetrics;
use crate::config::StatsFormat;

/// Format metrics according to the configured format
pub fn format_metrics(metrics: &RequestMetrics, format: StatsFormat) -> String {
    match format {
        StatsFormat::Pretty => format_pretty(metrics),
        StatsFormat::Json => format_json(metrics),
        StatsFormat::Compact => format_compact(metrics),
    }
}

/// Inner width of the pretty box, between the vertical borders
const BOX_WIDTH: usize = 66;

/// Pretty box format for terminal output
fn format_pretty(m: &RequestMetrics) -> String {
    let mut out = String::new();
    box_rule(&mut out, '┌', '┐');
    box_row(&mut out, "Completion Metrics");
    box_rule(&mut out, '├', '┤');
    box_row(&mut out, &format!("Tool:  {}", m.tool.label()));
    box_row(&mut out, &format!("Model: {}", m.model));
    box_row(
        &mut out,
        &format!("Time:  {}", m.timestamp.format("%Y-%m-%d %H:%M:%S UTC")),
    );
    box_rule(&mut out, '├', '┤');
    box_row(&mut out, "Tokens");
    box_row(
        &mut out,
        &format!(
            "  Input: {:6} │ Output: {:6} │ Total: {:6}",
            m.prompt_tokens, m.completion_tokens, m.total_tokens
        ),
    );
    box_row(
        &mut out,
        &format!("  Generation: {:8.2} tokens/sec", m.tokens_per_second),
    );
    box_rule(&mut out, '├', '┤');
    box_row(&mut out, &format!("Messages: {}", m.input_messages));
    box_row(&mut out, &format!("Finish: {}", m.finish_reason));
    box_row(&mut out, &format!("Duration: {:.1}ms", m.duration_ms));
    box_rule(&mut out, '└', '┘');
    out
}

fn box_rule(out: &mut String, left: char, right: char) {
    out.push(left);
    out.push_str(&"─".repeat(BOX_WIDTH));
    out.push(right);
    out.push('\n');
}

/// One content row, truncated and padded to the box width
fn box_row(out: &mut String, content: &str) {
    let width = BOX_WIDTH - 1;
    out.push_str(&format!("│ {:<width$}│\n", truncate(content, width), width = width));
}

/// JSON format for structured logging
fn format_json(m: &RequestMetrics) -> String {
    serde_json::to_string(m).unwrap_or_else(|_| "{}".to_string())
}

/// Compact single-line format
fn format_compact(m: &RequestMetrics) -> String {
    format!(
        "[{}] tool={} model={} tokens={}/{} tps={:.1} msgs={} finish={} dur={:.1}ms",
        m.timestamp.format("%H:%M:%S"),
        m.tool,
        m.model,
        m.prompt_tokens,
        m.completion_tokens,
        m.tokens_per_second,
        m.input_messages,
        m.finish_reason,
        m.duration_ms
    )
}

/// Truncate a string to max length with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

//! String utilities for the domain layer.

/// Reduce a description to a single summary line of at most `max_chars`
/// characters, appending an ellipsis when content was cut.
///
/// Only the first line is kept; truncation is character-based so multibyte
/// content never splits mid-glyph.
pub fn summary_line(s: &str, max_chars: usize) -> String {
    let first = s.lines().next().unwrap_or("");
    let truncated_by_lines = first.len() < s.trim_end().len();

    if !truncated_by_lines && first.chars().count() <= max_chars {
        return first.to_string();
    }

    let kept: String = first.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Maximum number of characters in a snippet before truncation.
pub const DEFAULT_SNIPPET_MAX_CHARS: usize = 160;

/// Find the first line of `text` containing `query`, ignoring case.
///
/// Returns `(line_number, snippet)` with a 1-indexed line number and the
/// trimmed line, truncated to [`DEFAULT_SNIPPET_MAX_CHARS`] characters.
/// Returns `None` for an empty query or when no single line matches (a
/// query may still match across a line break).
pub fn matching_line(text: &str, query: &str) -> Option<(usize, String)> {
    if query.is_empty() {
        return None;
    }
    let query_lower = query.to_lowercase();

    text.lines()
        .enumerate()
        .find(|(_, line)| line.to_lowercase().contains(&query_lower))
        .map(|(idx, line)| {
            (idx + 1, truncate_chars(line.trim(), DEFAULT_SNIPPET_MAX_CHARS))
        })
}

/// Truncate to at most `max` characters, appending `...` when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

//! PGN movetext sanitizer: lightweight regex-based cleaner.
//!
//! Each rule is an independent textual pass, so malformed input (unbalanced
//! braces, missing headers) just falls through the passes unchanged.

use std::sync::LazyLock;

use regex::Regex;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)^\[.*?\]$").unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").unwrap());
static MOVE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.+\s*").unwrap());
static RESULT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"1-0|0-1|1/2-1/2").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Convert a PGN string into a plain space-separated move list.
///
/// Removes, in order: header lines, `{...}` comments (which may span lines),
/// move numbers such as `1.` or `12...`, and the result tokens `1-0`, `0-1`
/// and `1/2-1/2`. Whitespace runs are then collapsed and the ends trimmed.
pub fn sanitize_moves(pgn: &str) -> String {
    let text = HEADER_RE.replace_all(pgn, "");
    let text = COMMENT_RE.replace_all(&text, "");
    let text = MOVE_NUMBER_RE.replace_all(&text, "");
    let text = RESULT_RE.replace_all(&text, "");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Sanitize `pgn` and split it into individual move tokens.
pub fn move_tokens(pgn: &str) -> Vec<String> {
    sanitize_moves(pgn)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

//! Cleanup of raw model output into a commit message.
//!
//! Reasoning models emit `<think>...</think>` spans before their answer. Those
//! must never reach a commit message, so stripping is deliberately aggressive:
//! an orphaned `</think>` discards everything before it, even if some of that
//! text was legitimate. That false positive is accepted.

use std::sync::LazyLock;

use regex_lite::Regex;

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

/// A complete think span, matched non-greedily across lines.
static THINK_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("Invalid regex"));

/// Clean a raw completion.
///
/// Returns `None` when nothing is left, which callers must treat as an empty
/// generation rather than a provider error.
pub fn sanitize_response(raw: &str) -> Option<String> {
    let mut current = clean_once(raw);

    // Removing one marker can expose another, so run to a fixed point.
    loop {
        let next = clean_once(&current);
        if next == current {
            break;
        }
        current = next;
    }

    if current.is_empty() {
        None
    } else {
        Some(current)
    }
}

fn clean_once(text: &str) -> String {
    // 1. Complete spans, content included
    let without_spans = THINK_SPAN.replace_all(text, "");
    let without_spans: &str = &without_spans;

    // 2. Orphaned closing marker: the opening one was cut off upstream
    let answer = match without_spans.rfind(THINK_CLOSE) {
        Some(idx) => &without_spans[idx + THINK_CLOSE.len()..],
        None => without_spans,
    };
    let answer = answer.replace(THINK_OPEN, "");

    // 3. Surrounding backticks and whitespace
    answer
        .trim_matches(|c: char| c == '`' || c.is_whitespace())
        .to_string()
}

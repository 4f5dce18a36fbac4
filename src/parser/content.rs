use std::sync::LazyLock;

use regex::Regex;

use super::sections::{self, extract_section};

static AFTER_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^COUNT:.*\n((?s).*)").unwrap());

/// Narrative following the `COUNT:` line, trimmed. `None` when there is no
/// marker or nothing after it.
pub fn extract_after_count(text: &str) -> Option<String> {
    let caps = AFTER_COUNT_RE.captures(text)?;
    let body = caps.get(1)?.as_str().trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Whitespace-separated words in the narrative, or in the whole text when
/// there is no narrative after `COUNT:`.
pub fn word_count(text: &str) -> usize {
    match extract_after_count(text) {
        Some(body) => body.split_whitespace().count(),
        None => text.split_whitespace().count(),
    }
}

/// A section counts as present only when its body has some text.
pub fn has_body(section: Option<&str>) -> bool {
    section.is_some_and(|body| !body.trim().is_empty())
}

pub fn has_announcements(text: &str) -> bool {
    has_body(extract_section(text, sections::ANNOUNCEMENTS).as_deref())
}

pub fn has_cot(text: &str) -> bool {
    has_body(extract_section(text, sections::COT).as_deref())
}

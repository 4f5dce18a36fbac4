use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// A line that opens the next block: `THANG:`, `MARY:`, `NAKED MOLERAT:` ...
static NEXT_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z ]+:").unwrap());

/// Named free-text blocks a backblast may carry.
pub const WARMUP: &str = "WARMUP";
pub const THANG: &str = "THANG";
pub const THE_THANG: &str = "THE THANG";
pub const MARY: &str = "MARY";
pub const ANNOUNCEMENTS: &str = "ANNOUNCEMENTS";
pub const COT: &str = "COT";

/// Keywords whose patterns are compiled once up front.
const KNOWN_SECTIONS: &[&str] = &[WARMUP, THANG, THE_THANG, MARY, ANNOUNCEMENTS, COT];

static SECTION_PATTERNS: LazyLock<HashMap<&'static str, SectionPatterns>> = LazyLock::new(|| {
    KNOWN_SECTIONS
        .iter()
        .filter_map(|kw| SectionPatterns::new(kw).map(|p| (*kw, p)))
        .collect()
});

struct SectionPatterns {
    /// `KEYWORD: body` on one line.
    inline: Regex,
    /// `KEYWORD:` alone on its line.
    header: Regex,
}

impl SectionPatterns {
    fn new(keyword: &str) -> Option<Self> {
        let kw = regex::escape(keyword);
        Some(SectionPatterns {
            inline: Regex::new(&format!(r"(?im)^{kw}:[ \t]*(.+)$")).ok()?,
            header: Regex::new(&format!(r"(?im)^{kw}:[ \t]*\n")).ok()?,
        })
    }

    fn extract(&self, text: &str) -> Option<String> {
        if let Some(caps) = self.inline.captures(text) {
            return Some(caps[1].trim().to_string());
        }

        let start = self.header.find(text)?.end();
        let rest = &text[start..];

        let mut end = rest.len();
        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if NEXT_HEADER_RE.is_match(line) {
                end = offset;
                break;
            }
            offset += line.len();
        }

        Some(rest[..end].trim().to_string())
    }
}

/// Body of the `keyword:` section, trimmed.
///
/// Two passes, keyword matched case-insensitively at line start:
/// 1. inline, `COT: Prayers for healing` on one line;
/// 2. multi-line, `COT:` alone followed by lines up to the next all-caps
///    `WORD:` header or the end of text.
///
/// A header followed only by spaces still counts as inline, so its body is
/// empty and the lines below it are not read.
pub fn extract_section(text: &str, keyword: &str) -> Option<String> {
    match SECTION_PATTERNS.get(keyword) {
        Some(patterns) => patterns.extract(text),
        None => SectionPatterns::new(keyword)?.extract(text),
    }
}

//! Single-line header fields (`Q:`, `PAX:`, `COUNT:` ...) looked up by anchored
//! regexes. The first matching line wins.

use std::sync::LazyLock;

use regex::Regex;

static Q_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^Q:\s*(.*)$").unwrap());
static COQ_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^COQ:\s*(.*)$").unwrap());
static PAX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^PAX:\s*(.*)$").unwrap());
static FNG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mi)^FNGS?:\s*(.*)$").unwrap());
static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^COUNT:").unwrap());
static AO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?i:ao|where):[ \t]*<#([A-Z0-9]+)(?:\|[^>]*)?>").unwrap()
});

fn capture_line<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

pub fn q_line(text: &str) -> Option<&str> {
    capture_line(&Q_RE, text)
}

pub fn coq_line(text: &str) -> Option<&str> {
    capture_line(&COQ_RE, text)
}

pub fn pax_line(text: &str) -> Option<&str> {
    capture_line(&PAX_RE, text)
}

/// `FNG:` / `FNGs:` in any case.
pub fn fng_line(text: &str) -> Option<&str> {
    capture_line(&FNG_RE, text)
}

/// Byte offset where the `COUNT:` marker line starts.
pub fn count_marker(text: &str) -> Option<usize> {
    COUNT_RE.find(text).map(|m| m.start())
}

/// Channel id from an `AO: <#C…>` or `Where: <#C…|name>` line.
pub fn ao_channel(text: &str) -> Option<&str> {
    AO_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lines_are_anchored() {
        let text = "Backblast! Q: not me\nQ: <@U1>\nPAX: <@U2>, Rocky\nCOQ: <@U3>";
        assert_eq!(q_line(text), Some("<@U1>"));
        assert_eq!(pax_line(text), Some("<@U2>, Rocky"));
        assert_eq!(coq_line(text), Some("<@U3>"));
    }

    #[test]
    fn q_and_pax_are_case_sensitive() {
        assert_eq!(q_line("q: <@U1>"), None);
        assert_eq!(pax_line("Pax: <@U1>"), None);
    }

    #[test]
    fn fng_any_case_and_plural() {
        assert_eq!(fng_line("FNG: Rocky"), Some("Rocky"));
        assert_eq!(fng_line("FNGs: 1 Radio"), Some("1 Radio"));
        assert_eq!(fng_line("fngs: 1 radio"), Some("1 radio"));
        assert_eq!(fng_line("PAX: <@U1>"), None);
    }

    #[test]
    fn count_marker_offset() {
        let text = "Title\nCOUNT: 4\nbody";
        assert_eq!(count_marker(text), Some(6));
        assert_eq!(count_marker("Count: 4"), None);
        assert_eq!(count_marker("PAX COUNT: 4"), None);
    }

    #[test]
    fn ao_from_ao_or_where() {
        assert_eq!(ao_channel("AO: <#C04PD48V9KR>"), Some("C04PD48V9KR"));
        assert_eq!(ao_channel("Where: <#C08Q6RT19AQ>"), Some("C08Q6RT19AQ"));
        assert_eq!(ao_channel("where: <#C08Q6RT19AQ|the-depot>"), Some("C08Q6RT19AQ"));
        assert_eq!(ao_channel("AO: The Depot"), None);
        assert_eq!(ao_channel("Title\nno location"), None);
    }
}

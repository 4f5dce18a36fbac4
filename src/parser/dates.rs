use std::sync::LazyLock;

use chrono::NaiveDate;
use tracing::trace;

pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// One way authors write the event date, and how to read it.
struct DateRule {
    name: &'static str,
    pattern: regex::Regex,
    format: &'static str,
}

impl DateRule {
    fn new(name: &'static str, pattern: &str, format: &'static str) -> Self {
        DateRule {
            name,
            pattern: regex::Regex::new(pattern).unwrap(),
            format,
        }
    }

    /// Parse the first structural match. `None` when the rule does not match
    /// or the match is not a real calendar date.
    fn apply(&self, text: &str) -> Option<NaiveDate> {
        let raw = self.pattern.captures(text)?.get(1)?.as_str();
        match NaiveDate::parse_from_str(raw, self.format) {
            Ok(date) => Some(date),
            Err(err) => {
                trace!(rule = self.name, raw, %err, "date rule matched but did not parse");
                None
            }
        }
    }
}

/// Tried in order; the first rule that yields a valid date wins.
static DATE_RULES: LazyLock<Vec<DateRule>> = LazyLock::new(|| {
    vec![
        DateRule::new("iso", r"DATE:\s*([0-9]{4}-[0-9]{2}-[0-9]{2})", "%Y-%m-%d"),
        DateRule::new("slash_year_first", r"DATE:\s*([0-9]{4}/[0-9]{2}/[0-9]{2})", "%Y/%m/%d"),
        DateRule::new("slash_month_first", r"DATE:\s*([0-9]{2}/[0-9]{2}/[0-9]{4})", "%m/%d/%Y"),
        DateRule::new("bare_iso", r"([0-9]{4}-[0-9]{2}-[0-9]{2})", "%Y-%m-%d"),
    ]
});

/// Event date normalized to `YYYY-MM-DD`, or `None` if no rule produces a
/// real calendar date.
pub fn extract_bd_date(text: &str) -> Option<String> {
    DATE_RULES
        .iter()
        .find_map(|rule| rule.apply(text))
        .map(|date| date.format(ISO_FORMAT).to_string())
}

/// Parse an already-normalized `YYYY-MM-DD` string.
pub fn parse_iso(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, ISO_FORMAT).ok()
}

/// English weekday name (`"Saturday"`) for an ISO date.
pub fn day_of_week(bd_date: &str) -> Option<String> {
    parse_iso(bd_date).map(|d| d.format("%A").to_string())
}

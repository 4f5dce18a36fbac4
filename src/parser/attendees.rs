use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SLACK_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<@([A-Z0-9]+)>$").unwrap());

/// Values authors type into an attendee field to mean "nobody".
const EMPTY_SENTINELS: &[&str] = &["None", "N/A"];

/// Attendees named on one line, split into Slack-registered ids and free-text
/// names. Both lists are de-duplicated and keep first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub registered: Vec<String>,
    pub unregistered: Vec<String>,
    seen_ids: HashSet<String>,
    seen_names: HashSet<String>,
}

impl Roster {
    pub fn add_registered(&mut self, id: &str) {
        if self.seen_ids.insert(id.to_string()) {
            self.registered.push(id.to_string());
        }
    }

    pub fn add_unregistered(&mut self, name: &str) {
        if self.seen_names.insert(name.to_string()) {
            self.unregistered.push(name.to_string());
        }
    }

    /// Set union with another roster, per kind.
    pub fn merge(&mut self, other: &Roster) {
        for id in &other.registered {
            self.add_registered(id);
        }
        for name in &other.unregistered {
            self.add_unregistered(name);
        }
    }

    pub fn headcount(&self) -> usize {
        self.registered.len() + self.unregistered.len()
    }
}

/// Split a comma (or space) separated attendee line such as
/// `<@U04SUMEGFRV> <@U05H7BV7X8A> , Lil-Bit` into a [`Roster`].
///
/// Tokens that look like a mention but are not exactly `<@[A-Z0-9]+>` are kept
/// verbatim as unregistered names.
pub fn parse_attendee_line(line: &str) -> Roster {
    let mut roster = Roster::default();
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return roster;
    }

    let normalized = WS_RE.replace_all(trimmed, " ").replace(" <@", ",<@");

    for token in normalized.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(caps) = SLACK_ID_RE.captures(token) {
            roster.add_registered(&caps[1]);
        } else if !EMPTY_SENTINELS.contains(&token) {
            roster.add_unregistered(token);
        }
    }

    roster
}

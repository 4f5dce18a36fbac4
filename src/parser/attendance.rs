use super::attendees::{parse_attendee_line, Roster};
use super::fields;

/// Everyone named on the `Q:` and `PAX:` lines, de-duplicated across both.
pub fn combined_roster(text: &str) -> Roster {
    let mut roster = fields::pax_line(text)
        .map(parse_attendee_line)
        .unwrap_or_default();
    if let Some(q) = fields::q_line(text) {
        roster.merge(&parse_attendee_line(q));
    }
    roster
}

/// Headcount derived from the Q and PAX lines.
///
/// The `COUNT:` field is never read: authors count an `FNGs: None` entry as a
/// person, so the stated number runs high.
pub fn extract_pax_count(text: &str) -> usize {
    combined_roster(text).headcount()
}

/// Unregistered PAX whose name appears (case-insensitively) in the `FNG:` line.
///
/// Only the PAX line is considered; a Q is never a first-timer. Matching is by
/// substring, so `Bo` is found inside `1 Bobcat`.
pub fn extract_fng_names(text: &str) -> Vec<String> {
    let Some(fng_blob) = fields::fng_line(text) else {
        return Vec::new();
    };
    let fng_blob = fng_blob.to_lowercase();

    let candidates = fields::pax_line(text)
        .map(parse_attendee_line)
        .unwrap_or_default();

    candidates
        .unregistered
        .into_iter()
        .filter(|name| fng_blob.contains(&name.to_lowercase()))
        .collect()
}

pub fn extract_fng_count(text: &str) -> usize {
    extract_fng_names(text).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap()
    }

    #[test]
    fn ids_only() {
        assert_eq!(extract_pax_count(&fixture("anniversary")), 7);
        assert_eq!(extract_pax_count(&fixture("sunday_funday")), 5);
    }

    #[test]
    fn with_unregistered_fng() {
        let text = fixture("one_percent_better");
        assert_eq!(extract_pax_count(&text), 6);
        assert_eq!(extract_fng_names(&text), vec!["Radio"]);
    }

    #[test]
    fn q_listed_in_pax_counted_once() {
        // Q U05FLSDT8M6 is also on the PAX line, and the "None" entry is dropped
        let text = fixture("humanity_ruck");
        assert_eq!(extract_pax_count(&text), 3);
        assert!(extract_fng_names(&text).is_empty());
    }

    #[test]
    fn explicit_count_ignored() {
        let text = "Title\nQ: <@U04SUMEGFRV>\nPAX: <@U04TCJ2GMF0> <@U063DJFFMB8> <@U06GQ7U4UHY>\nCOUNT: 999";
        assert_eq!(extract_pax_count(text), 4);
    }

    #[test]
    fn unregistered_q_counted() {
        assert_eq!(extract_pax_count("Q: Sasquatch\nPAX: <@U1>, Sasquatch"), 2);
    }

    #[test]
    fn no_lines_no_count() {
        assert_eq!(extract_pax_count(""), 0);
        assert_eq!(extract_pax_count("Just a title"), 0);
    }

    #[test]
    fn no_fng_field_means_no_fngs() {
        let text = "Q: <@U04SUMEGFRV>\nPAX: <@U04TCJ2GMF0>, Radio\nCOUNT: 2";
        assert!(extract_fng_names(text).is_empty());
        assert_eq!(extract_fng_count(text), 0);
    }

    #[test]
    fn fng_match_ignores_case() {
        let text = "Q: <@U04SUMEGFRV>\nPAX: <@U04TCJ2GMF0>, Radio\nfngs: 1 radio\nCOUNT: 2";
        assert_eq!(extract_fng_names(text), vec!["Radio"]);
    }

    #[test]
    fn q_is_never_an_fng() {
        let text = "Q: Newbie\nPAX: <@U1>\nFNG: Newbie";
        assert!(extract_fng_names(text).is_empty());
    }

    #[test]
    fn substring_match_can_over_include() {
        let text = "PAX: Bo, Bobcat\nFNG: Bobcat";
        assert_eq!(extract_fng_names(text), vec!["Bo", "Bobcat"]);
    }
}

use std::sync::LazyLock;

use regex::Regex;

use super::fields;
use crate::model::WorkoutType;

static WARMUP_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^(warmup|warm\s*up|warm-up):").unwrap());
static THANG_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^(thang|the\s*thang):").unwrap());
static RUCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(ruck|rucking|ruck\s*march)\b").unwrap());

/// Classify the beatdown.
///
/// A WARMUP + THANG structure is always a bootcamp. Otherwise only the header
/// block before `COUNT:` is searched for ruck keywords; the narrative after it
/// mentions rucking too casually to trust.
pub fn extract_workout_type(text: &str) -> WorkoutType {
    if WARMUP_HEADER_RE.is_match(text) && THANG_HEADER_RE.is_match(text) {
        return WorkoutType::Bootcamp;
    }

    let metadata = match fields::count_marker(text) {
        Some(idx) => &text[..idx],
        None => text,
    };

    if RUCK_RE.is_match(metadata) {
        WorkoutType::Ruck
    } else {
        WorkoutType::Bootcamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootcamp_structure() {
        let text = "Backblast! Standard Bootcamp\nQ: <@U123>\nPAX: <@U456>\nCOUNT: 2\n\nWARMUP: SSH\nTHANG: Dora 1-2-1\nMARY: Crunches";
        assert_eq!(extract_workout_type(text), WorkoutType::Bootcamp);
    }

    #[test]
    fn structure_beats_ruck_keyword() {
        let text = "Backblast! Ruck-ish Bootcamp\nBrought a ruck today\nCOUNT: 3\nWarm-up: SSH\nThe Thang: coupons";
        assert_eq!(extract_workout_type(text), WorkoutType::Bootcamp);
    }

    #[test]
    fn ruck_keywords_before_count() {
        let ruck = "Backblast! Friday Morning\nQ: <@U123>\nThis was a great ruck march through downtown.\nCOUNT: 5\n\nWe covered 3 miles.";
        assert_eq!(extract_workout_type(ruck), WorkoutType::Ruck);

        let rucking = "Backblast! Early Morning\nRucking is the best way to start the day.\nCOUNT: 3";
        assert_eq!(extract_workout_type(rucking), WorkoutType::Ruck);

        let title = "Backblast! Friday Morning Ruck\nQ: <@U1>\nCOUNT: 9";
        assert_eq!(extract_workout_type(title), WorkoutType::Ruck);
    }

    #[test]
    fn ruck_after_count_ignored() {
        let text = "Backblast! After Count Discussion\nQ: <@U123>\nCOUNT: 4\n\nToday we talked about future ruck preparation.";
        assert_eq!(extract_workout_type(text), WorkoutType::Bootcamp);
    }

    #[test]
    fn no_count_searches_everything() {
        assert_eq!(extract_workout_type("Title\nlong ruck today"), WorkoutType::Ruck);
    }

    #[test]
    fn ruck_inside_other_words_is_not_a_match() {
        let text = "Backblast! Trucking along\nCOUNT: 4";
        assert_eq!(extract_workout_type(text), WorkoutType::Bootcamp);
    }

    #[test]
    fn one_header_alone_is_not_structure() {
        assert_eq!(
            extract_workout_type("Ruck day\nCOUNT: 4\nTHANG: Main workout"),
            WorkoutType::Ruck
        );
        assert_eq!(extract_workout_type("Title\nCOUNT: 4\nWARMUP: SSH"), WorkoutType::Bootcamp);
    }

    #[test]
    fn empty_text_defaults_to_bootcamp() {
        assert_eq!(extract_workout_type(""), WorkoutType::Bootcamp);
    }
}

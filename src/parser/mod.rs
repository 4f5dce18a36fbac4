pub mod attendance;
pub mod attendees;
pub mod content;
pub mod dates;
pub mod fields;
pub mod files;
pub mod sections;
pub mod workout;

use tracing::debug;

use crate::model::ParsedBeatdown;
use attendees::parse_attendee_line;
use sections::extract_section;

pub use files::extract_files_from_json;

/// Build the full record for one backblast.
///
/// Never fails: every field that cannot be read comes back absent, empty or
/// defaulted. `ao_id` is only set when the text carries an `AO:`/`Where:`
/// channel; callers backfill it with [`ParsedBeatdown::backfill_ao_id`].
pub fn parse_backblast(text: &str) -> ParsedBeatdown {
    let title = if text.is_empty() {
        None
    } else {
        text.lines().next().map(|l| l.trim().to_string())
    };

    let q_user_id = fields::q_line(text)
        .map(parse_attendee_line)
        .and_then(|r| r.registered.into_iter().next());
    let coq_user_id = fields::coq_line(text)
        .map(parse_attendee_line)
        .map(|r| r.registered)
        .filter(|ids| !ids.is_empty());
    let (pax, non_registered_pax) = match fields::pax_line(text).map(parse_attendee_line) {
        Some(roster) => (Some(roster.registered), Some(roster.unregistered)),
        None => (None, None),
    };

    let fngs = attendance::extract_fng_names(text);
    let pax_count = attendance::extract_pax_count(text);

    let thang = extract_section(text, sections::THANG)
        .filter(|body| !body.is_empty())
        .or_else(|| extract_section(text, sections::THE_THANG));

    let announcements = extract_section(text, sections::ANNOUNCEMENTS);
    let cot = extract_section(text, sections::COT);

    let bd_date = dates::extract_bd_date(text);
    let day_of_week = bd_date.as_deref().and_then(dates::day_of_week);

    let parsed = ParsedBeatdown {
        raw_backblast: text.to_string(),
        title,
        q_user_id,
        coq_user_id,
        pax,
        non_registered_pax,
        fng_count: fngs.len(),
        fngs,
        warmup: extract_section(text, sections::WARMUP),
        thang,
        mary: extract_section(text, sections::MARY),
        has_announcements: content::has_body(announcements.as_deref()),
        has_cot: content::has_body(cot.as_deref()),
        announcements,
        cot,
        bd_date,
        day_of_week,
        workout_type: workout::extract_workout_type(text),
        word_count: Some(content::word_count(text)),
        pax_count,
        ao_id: fields::ao_channel(text).map(str::to_string),
    };

    debug!(
        title = parsed.title.as_deref().unwrap_or(""),
        bd_date = parsed.bd_date.as_deref().unwrap_or(""),
        pax_count = parsed.pax_count,
        fng_count = parsed.fng_count,
        workout_type = %parsed.workout_type,
        "parsed backblast"
    );

    parsed
}

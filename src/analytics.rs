//! Reductions over many parsed beatdowns: who posted, who led, which AO drew
//! the biggest crowd. Id -> display-name maps come from the caller; unmapped
//! ids are shown as-is.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveTime, Utc};
use itertools::Itertools;
use serde::Serialize;

use crate::model::{ParsedBeatdown, WorkoutType};
use crate::parser::dates::parse_iso;

/// Shown in place of a missing or unparsable `bd_date`.
pub const UNKNOWN_DATE: &str = "Unknown Date";
/// Bucket for beatdowns with no AO from either the text or the source row.
pub const UNKNOWN_AO: &str = "Unknown AO";

const TOP_N: usize = 5;

pub type NameMap = HashMap<String, String>;

fn display_name(mapping: &NameMap, id: &str) -> String {
    mapping.get(id).cloned().unwrap_or_else(|| id.to_string())
}

fn ao_name(mapping: &NameMap, bd: &ParsedBeatdown) -> String {
    match bd.ao_id.as_deref() {
        Some(id) => display_name(mapping, id),
        None => UNKNOWN_AO.to_string(),
    }
}

/// `bd_date` when it is a real calendar date, else [`UNKNOWN_DATE`].
fn display_date(bd: &ParsedBeatdown) -> String {
    bd.bd_date
        .as_deref()
        .filter(|d| parse_iso(d).is_some())
        .unwrap_or(UNKNOWN_DATE)
        .to_string()
}

/// Registered ids present at a beatdown: PAX plus Q and Co-Qs, once each.
fn attendee_ids(bd: &ParsedBeatdown) -> HashSet<&str> {
    bd.pax
        .iter()
        .flatten()
        .map(String::as_str)
        .chain(bd.leader_ids())
        .collect()
}

/// Beatdowns attended per registered id.
pub fn pax_attendance(beatdowns: &[ParsedBeatdown]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for bd in beatdowns {
        for id in attendee_ids(bd) {
            *counts.entry(id.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Beatdowns led (as Q or Co-Q) per leader display name.
pub fn q_counts(beatdowns: &[ParsedBeatdown], user_mapping: &NameMap) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for bd in beatdowns {
        for id in bd.leader_ids() {
            *counts.entry(display_name(user_mapping, id)).or_insert(0) += 1;
        }
    }
    counts
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AoStats {
    /// Sum of derived headcounts.
    pub total_posts: usize,
    pub total_beatdowns: usize,
    pub unique_pax: HashSet<String>,
}

impl AoStats {
    pub fn unique_pax_count(&self) -> usize {
        self.unique_pax.len()
    }
}

pub fn ao_attendance(beatdowns: &[ParsedBeatdown], ao_mapping: &NameMap) -> HashMap<String, AoStats> {
    let mut stats: HashMap<String, AoStats> = HashMap::new();
    for bd in beatdowns {
        let entry = stats.entry(ao_name(ao_mapping, bd)).or_default();
        entry.total_posts += bd.pax_count;
        entry.total_beatdowns += 1;
        entry
            .unique_pax
            .extend(attendee_ids(bd).into_iter().map(str::to_string));
    }
    stats
}

/// First-timers per AO, in the order they were first seen.
pub fn fngs_by_ao(beatdowns: &[ParsedBeatdown], ao_mapping: &NameMap) -> HashMap<String, Vec<String>> {
    let mut out: HashMap<String, Vec<String>> = HashMap::new();
    for bd in beatdowns.iter().filter(|bd| !bd.fngs.is_empty()) {
        let names = out.entry(ao_name(ao_mapping, bd)).or_default();
        for fng in &bd.fngs {
            if !names.contains(fng) {
                names.push(fng.clone());
            }
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighestAttendance {
    pub attendance_count: usize,
    pub q_names: Vec<String>,
    pub date: String,
    pub title: Option<String>,
}

/// The best-attended beatdown at each AO. Ties keep the earlier record.
pub fn highest_attendance_per_ao(
    beatdowns: &[ParsedBeatdown],
    ao_mapping: &NameMap,
    user_mapping: &NameMap,
) -> HashMap<String, HighestAttendance> {
    let mut best: HashMap<String, HighestAttendance> = HashMap::new();
    for bd in beatdowns {
        let ao = ao_name(ao_mapping, bd);
        if best
            .get(&ao)
            .is_some_and(|current| current.attendance_count >= bd.pax_count)
        {
            continue;
        }
        let date = display_date(bd);
        best.insert(
            ao,
            HighestAttendance {
                attendance_count: bd.pax_count,
                q_names: bd
                    .leader_ids()
                    .into_iter()
                    .map(|id| display_name(user_mapping, id))
                    .collect(),
                date,
                title: bd.title.clone(),
            },
        );
    }
    best
}

/// One beatdown with ids swapped for display names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeatdownDetails {
    pub date: String,
    pub ao_name: String,
    pub q_name: Option<String>,
    pub title: Option<String>,
    pub pax_count: usize,
    /// Registered PAX by name, then the free-text names from the PAX line.
    pub pax_names: Vec<String>,
    pub fng_names: Vec<String>,
    pub workout_type: WorkoutType,
    pub word_count: usize,
}

pub fn beatdown_details(
    bd: &ParsedBeatdown,
    user_mapping: &NameMap,
    ao_mapping: &NameMap,
) -> BeatdownDetails {
    let pax_names = bd
        .pax
        .iter()
        .flatten()
        .map(|id| display_name(user_mapping, id))
        .chain(bd.non_registered_pax.iter().flatten().cloned())
        .collect();

    BeatdownDetails {
        date: display_date(bd),
        ao_name: ao_name(ao_mapping, bd),
        q_name: bd.q_user_id.as_deref().map(|id| display_name(user_mapping, id)),
        title: bd.title.clone(),
        pax_count: bd.pax_count,
        pax_names,
        fng_names: bd.fngs.clone(),
        workout_type: bd.workout_type,
        word_count: bd.word_count.unwrap_or_default(),
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Monday 00:00 through Sunday 23:59:59.999999 (UTC) of the week holding `at`.
pub fn week_range(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let back = u64::from(at.weekday().num_days_from_monday());
    let start = start_of_day(at.date_naive() - Days::new(back));
    (start, start + Duration::days(7) - Duration::microseconds(1))
}

/// First through last instant (UTC) of the month holding `at`.
pub fn month_range(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = at.date_naive() - Days::new(u64::from(at.day0()));
    let next = first
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    (start_of_day(first), start_of_day(next) - Duration::microseconds(1))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub total_beatdowns: usize,
    pub total_attendance: usize,
    pub unique_pax: usize,
    /// Beatdowns attended, by PAX display name.
    pub pax_counts: BTreeMap<String, usize>,
    /// Derived headcount summed per AO.
    pub ao_counts: BTreeMap<String, usize>,
    /// Beatdowns led, by Q display name.
    pub q_counts: BTreeMap<String, usize>,
    pub ao_fngs: BTreeMap<String, Vec<String>>,
    pub ao_max_attendance: BTreeMap<String, HighestAttendance>,
    pub top_pax: Vec<(String, usize)>,
    pub top_aos: Vec<(String, usize)>,
    pub top_qs: Vec<(String, usize)>,
}

/// Highest counts first, then by name.
fn top(counts: &BTreeMap<String, usize>) -> Vec<(String, usize)> {
    counts
        .iter()
        .map(|(name, n)| (name.clone(), *n))
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(TOP_N)
        .collect()
}

pub fn weekly_summary(
    beatdowns: &[ParsedBeatdown],
    user_mapping: &NameMap,
    ao_mapping: &NameMap,
) -> WeeklySummary {
    let attendance = pax_attendance(beatdowns);
    let unique_pax = attendance.len();

    // two ids can share a display name
    let mut pax_counts = BTreeMap::new();
    for (id, n) in attendance {
        *pax_counts.entry(display_name(user_mapping, &id)).or_insert(0) += n;
    }
    let ao_counts: BTreeMap<String, usize> = ao_attendance(beatdowns, ao_mapping)
        .into_iter()
        .map(|(ao, stats)| (ao, stats.total_posts))
        .collect();
    let q_counts: BTreeMap<String, usize> = q_counts(beatdowns, user_mapping).into_iter().collect();

    WeeklySummary {
        total_beatdowns: beatdowns.len(),
        total_attendance: beatdowns.iter().map(|bd| bd.pax_count).sum(),
        unique_pax,
        top_pax: top(&pax_counts),
        top_aos: top(&ao_counts),
        top_qs: top(&q_counts),
        pax_counts,
        ao_counts,
        q_counts,
        ao_fngs: fngs_by_ao(beatdowns, ao_mapping).into_iter().collect(),
        ao_max_attendance: highest_attendance_per_ao(beatdowns, ao_mapping, user_mapping)
            .into_iter()
            .collect(),
    }
}

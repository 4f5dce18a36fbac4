use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::parse_backblast;
use crate::timestamps::from_unix_timestamp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Bootcamp,
    Ruck,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Bootcamp => "bootcamp",
            WorkoutType::Ruck => "ruck",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything extracted from one backblast.
///
/// Id lists are de-duplicated and keep the order in which they first appear in
/// the text. `pax_count` and `fng_count` are always derived from the Q/PAX/FNG
/// lines, never copied from the author's `COUNT:`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedBeatdown {
    pub raw_backblast: String,
    pub title: Option<String>,
    pub q_user_id: Option<String>,
    pub coq_user_id: Option<Vec<String>>,
    pub pax: Option<Vec<String>>,
    pub non_registered_pax: Option<Vec<String>>,
    pub fngs: Vec<String>,
    pub warmup: Option<String>,
    pub thang: Option<String>,
    pub mary: Option<String>,
    pub announcements: Option<String>,
    pub cot: Option<String>,
    /// `YYYY-MM-DD`.
    pub bd_date: Option<String>,
    pub day_of_week: Option<String>,
    pub workout_type: WorkoutType,
    pub has_announcements: bool,
    pub has_cot: bool,
    pub word_count: Option<usize>,
    pub pax_count: usize,
    pub fng_count: usize,
    pub ao_id: Option<String>,
}

impl ParsedBeatdown {
    /// Fill `ao_id` from an outside source when the text named no AO.
    /// An AO already read from the text is kept.
    pub fn backfill_ao_id(&mut self, fallback: Option<&str>) {
        if self.ao_id.is_none() {
            self.ao_id = fallback.map(str::to_string);
        }
    }

    /// Registered ids of everyone who led: Q first, then Co-Qs.
    pub fn leader_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.q_user_id.iter().map(String::as_str).collect();
        for id in self.coq_user_id.iter().flatten() {
            if !ids.contains(&id.as_str()) {
                ids.push(id);
            }
        }
        ids
    }
}

/// A beatdown row as handed over by the fetch layer. Timestamps are unix epoch
/// seconds written as decimal strings (`"1710009600.123456"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceBeatdown {
    #[serde(default)]
    pub backblast: Option<String>,
    #[serde(default)]
    pub ao_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub ts_edited: Option<String>,
}

impl SourceBeatdown {
    /// Decode one JSON-lines row.
    pub fn from_json(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Parsed backblast paired with its post/edit times, ready for external sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatdownRecord {
    pub backblast: ParsedBeatdown,
    pub timestamp: DateTime<Utc>,
    pub last_edited: Option<DateTime<Utc>>,
}

impl BeatdownRecord {
    pub fn from_source(source: &SourceBeatdown) -> Result<Self> {
        let raw_ts = source.timestamp.as_deref().unwrap_or_default();
        let timestamp = from_unix_timestamp(raw_ts)
            .ok_or_else(|| Error::InvalidTimestamp(raw_ts.to_string()))?;
        let last_edited = source.ts_edited.as_deref().and_then(from_unix_timestamp);

        let mut backblast = parse_backblast(source.backblast.as_deref().unwrap_or_default());
        backblast.backfill_ao_id(source.ao_id.as_deref());

        Ok(BeatdownRecord {
            backblast,
            timestamp,
            last_edited,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(backblast: &str) -> SourceBeatdown {
        SourceBeatdown {
            backblast: Some(backblast.to_string()),
            ao_id: Some("C04TYQEEGHM".into()),
            timestamp: Some("1710009600.0".into()),
            ts_edited: Some("1710013200.0".into()),
        }
    }

    #[test]
    fn workout_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&WorkoutType::Ruck).unwrap(), "\"ruck\"");
        assert_eq!(WorkoutType::default().to_string(), "bootcamp");
    }

    #[test]
    fn record_keeps_timestamps() {
        let rec = BeatdownRecord::from_source(&source("Title\nQ: <@U1>")).unwrap();
        assert_eq!(rec.timestamp.timestamp(), 1710009600);
        assert_eq!(rec.last_edited.map(|t| t.timestamp()), Some(1710013200));
    }

    #[test]
    fn ao_backfilled_only_when_missing() {
        let rec = BeatdownRecord::from_source(&source("Title\nQ: <@U1>")).unwrap();
        assert_eq!(rec.backblast.ao_id.as_deref(), Some("C04TYQEEGHM"));

        let rec = BeatdownRecord::from_source(&source("Title\nAO: <#C04PD48V9KR>")).unwrap();
        assert_eq!(rec.backblast.ao_id.as_deref(), Some("C04PD48V9KR"));
    }

    #[test]
    fn missing_backblast_is_empty_text() {
        let mut src = source("");
        src.backblast = None;
        let rec = BeatdownRecord::from_source(&src).unwrap();
        assert_eq!(rec.backblast.raw_backblast, "");
        assert_eq!(rec.backblast.title, None);
    }

    #[test]
    fn bad_post_timestamp_is_an_error() {
        let mut src = source("Title");
        src.timestamp = Some("yesterday".into());
        assert!(matches!(
            BeatdownRecord::from_source(&src),
            Err(Error::InvalidTimestamp(ts)) if ts == "yesterday"
        ));

        src.timestamp = None;
        assert!(BeatdownRecord::from_source(&src).is_err());
    }

    #[test]
    fn bad_edit_timestamp_degrades() {
        let mut src = source("Title");
        src.ts_edited = Some("".into());
        let rec = BeatdownRecord::from_source(&src).unwrap();
        assert_eq!(rec.last_edited, None);
    }

    #[test]
    fn source_rows_from_json() {
        let row = SourceBeatdown::from_json(
            r#"{"backblast": "Title\nQ: <@U1>", "timestamp": "1710009600.0"}"#,
        )
        .unwrap();
        assert_eq!(row.ao_id, None);
        assert_eq!(row.ts_edited, None);
        assert_eq!(row.backblast.as_deref(), Some("Title\nQ: <@U1>"));

        assert!(matches!(SourceBeatdown::from_json("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn leaders_deduplicated() {
        let bd = ParsedBeatdown {
            q_user_id: Some("U1".into()),
            coq_user_id: Some(vec!["U2".into(), "U1".into()]),
            ..Default::default()
        };
        assert_eq!(bd.leader_ids(), vec!["U1", "U2"]);
    }
}

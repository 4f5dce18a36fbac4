use chrono::{DateTime, Utc};

/// `"1710009600.123456"` -> UTC datetime, microsecond precision.
pub fn from_unix_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let secs: f64 = raw.trim().parse().ok()?;
    let micros = (secs * 1_000_000.0).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_micros(micros as i64)
}

pub fn to_unix_timestamp(dt: DateTime<Utc>) -> f64 {
    dt.timestamp_micros() as f64 / 1_000_000.0
}

use chrono::{DateTime, Duration, NaiveDate, NaiveTime};

use crate::error::{GnError, GnResult};

pub fn date_from_str(s: &str) -> GnResult<NaiveDate> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y%m%d",
        "%Y%m%dT%H%M%S",        // ISO 8601 Basic
        "%Y-%m-%dT%H:%M:%S%.f", // ISO 8601 Extended
    ];

    let s = s.trim();

    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        // RFC 3339
        return Ok(datetime.date_naive());
    }

    Err(GnError::Invalid {
        code: "INVALID_DATE",
        message: format!("Unable to parse date '{s}'"),
    })
}

pub fn date_to_str(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Calendar-day window `[date - days, date]`
pub fn window_start(date: &NaiveDate, days: u32) -> NaiveDate {
    *date - Duration::days(days as i64)
}

/// Unix seconds at the start of the given day (UTC)
pub fn date_to_timestamp(date: &NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Trading day of a bar stamped at `timestamp`, shifted by the exchange offset
pub fn date_from_timestamp(timestamp: i64, gmt_offset_secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmt_offset_secs, 0).map(|dt| dt.date_naive())
}

pub fn secs_to_human_str(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;

    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}

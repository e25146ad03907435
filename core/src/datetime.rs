//! Instant handling for event dates.
//!
//! The API transmits instants in the JavaScript `toISOString` shape
//! (`2024-12-01T18:00:00.000Z`). Any RFC 3339 instant is accepted when
//! decoding and normalized to UTC. A date-time without an offset
//! (`2024-12-01T18:00:00`) is read as UTC.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use thiserror::Error;

/// A wall-clock time that does not exist in the target time zone.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{date} {time} does not exist in the target time zone")]
pub struct InvalidLocalTime {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Format an instant the way the API expects it.
pub fn to_iso_string(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 instant. Offset-less input is taken as UTC.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(e) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| e),
    }
}

/// Combine a calendar date and a wall-clock time read in `tz` into a UTC
/// instant. An ambiguous time (DST fold) resolves to the earlier instant.
pub fn combine_in<Tz: TimeZone>(
    date: NaiveDate,
    time: NaiveTime,
    tz: &Tz,
) -> Result<DateTime<Utc>, InvalidLocalTime> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(InvalidLocalTime { date, time })
}

/// Combine a date and time entered in the host's local time zone.
pub fn combine_local(date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, InvalidLocalTime> {
    combine_in(date, time, &Local)
}

/// Combine a date and time that are already UTC wall-clock values.
pub fn combine_utc(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time))
}

/// Serde adapter for `DateTime<Utc>` fields using `to_iso_string`.
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_iso_string(instant))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_instant(&raw).map_err(|e| de::Error::custom(format!("invalid ISO-8601 instant {raw:?}: {e}")))
    }
}

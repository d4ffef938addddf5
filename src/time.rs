//! Conversions between the storage zone (UTC) and display zones.
//!
//! Records keep every timestamp in UTC. Two distinct operations exist:
//!
//! - [`normalize`] relabels wall-clock fields as UTC without moving them.
//!   Record constructors apply it to every timestamp they receive.
//! - [`convert`] / [`to_local`] perform a true offset-aware conversion and
//!   are what the display accessors use.

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// Table cell format, e.g. `Mar 10, 2024 2:30 AM`.
pub const DISPLAY_FORMAT: &str = "%b %-d, %Y %-I:%M %p";

/// Time-of-day format, e.g. `2:30 AM`.
pub const TIME_FORMAT: &str = "%-I:%M %p";

/// Storage text format. Lexically sortable.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted user input format (local wall clock).
pub const INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Error)]
pub enum TimeError {
    #[error("invalid date/time '{input}': {source}")]
    InvalidFormat {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("{0} does not exist in the local time zone")]
    NonexistentLocalTime(NaiveDateTime),
}

/// Relabel the wall-clock fields of `ts` as UTC. No arithmetic shift.
pub fn normalize<Tz: TimeZone>(ts: &DateTime<Tz>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&ts.naive_local())
}

/// Convert a stored UTC instant into `zone`.
pub fn convert<Tz: TimeZone>(ts: &DateTime<Utc>, zone: &Tz) -> DateTime<Tz> {
    ts.with_timezone(zone)
}

/// Convert a stored UTC instant into the runtime's local zone.
pub fn to_local(ts: &DateTime<Utc>) -> DateTime<Local> {
    convert(ts, &Local)
}

/// Format for the start/end table columns.
pub fn to_display_string<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.format(DISPLAY_FORMAT).to_string()
}

/// Format the time of day only.
pub fn to_time_string<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.format(TIME_FORMAT).to_string()
}

/// Interpret `naive` as a wall-clock reading in `zone` and convert it to UTC.
///
/// Ambiguous readings (the repeated hour when clocks fall back) resolve to
/// the earliest instant.
pub fn zone_to_reference<Tz: TimeZone>(
    naive: &NaiveDateTime,
    zone: &Tz,
) -> Result<DateTime<Utc>, TimeError> {
    match zone.from_local_datetime(naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(TimeError::NonexistentLocalTime(*naive)),
    }
}

/// [`zone_to_reference`] for the runtime's local zone.
pub fn local_to_reference(naive: &NaiveDateTime) -> Result<DateTime<Utc>, TimeError> {
    zone_to_reference(naive, &Local)
}

/// Parse `YYYY-MM-DD HH:MM` as typed by a user.
pub fn parse_input(input: &str) -> Result<NaiveDateTime, TimeError> {
    NaiveDateTime::parse_from_str(input.trim(), INPUT_FORMAT).map_err(|source| {
        TimeError::InvalidFormat {
            input: input.to_string(),
            source,
        }
    })
}

pub fn to_storage_string(ts: &DateTime<Utc>) -> String {
    ts.format(STORAGE_FORMAT).to_string()
}

pub fn from_storage_str(s: &str) -> Result<DateTime<Utc>, TimeError> {
    NaiveDateTime::parse_from_str(s, STORAGE_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|source| TimeError::InvalidFormat {
            input: s.to_string(),
            source,
        })
}

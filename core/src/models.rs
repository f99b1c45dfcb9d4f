mod note;

pub use note::{NewNote, Note, NoteId};

use chrono::{DateTime, SecondsFormat, Utc};

/// Format an instant the way it is stored: ISO-8601, UTC, millisecond precision
pub fn datetime_to_iso(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored ISO-8601 instant, falling back to the epoch for garbage
pub fn iso_to_datetime(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

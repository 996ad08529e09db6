use chrono::{prelude::*, SecondsFormat};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Serializes a last-sent marker so that it round-trips through [`parse_marker`].
pub fn format_marker(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses a persisted last-sent marker and normalizes it to UTC.
///
/// Accepts RFC 3339 with any offset, RFC 2822, and naive date times or dates,
/// which are taken to be UTC. Returns `None` for anything else.
pub fn parse_marker(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::default())))
}

/// A cadence is due when it has never been sent or was last sent before the
/// current schedule point.
pub fn is_due(last_sent: Option<DateTime<Utc>>, schedule_point: DateTime<Utc>) -> bool {
    match last_sent {
        None => true,
        Some(last_sent) => last_sent < schedule_point,
    }
}

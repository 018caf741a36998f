//! Timestamp parsing for the instants the API emits.
//!
//! The service writes `horario_registro` with Python's `isoformat()`, which
//! may or may not carry an offset. Offset-less values are wall-clock times and
//! are read as local time, a bare date is midnight UTC, and epoch milliseconds
//! are accepted as well.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub fn parse_instant(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Local));
    }

    let wall_clock = NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
    });

    // A bare date is midnight UTC, as browsers read it
    wall_clock.or_else(|| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
    })
}

/// Instant carried by a JSON value: a date-time string or epoch milliseconds.
pub fn instant_from_value(value: &Value) -> Option<DateTime<Local>> {
    match value {
        Value::String(raw) => parse_instant(raw),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Local.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

/// Local `HH:MM` for an instant.
pub fn clock_label(instant: &DateTime<Local>) -> String {
    instant.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn rfc3339_is_converted_to_local_time() {
        let parsed = parse_instant("2024-01-01T10:15:00Z").unwrap();
        let expected = Utc
            .with_ymd_and_hms(2024, 1, 1, 10, 15, 0)
            .unwrap()
            .with_timezone(&Local);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn offsetless_values_are_wall_clock() {
        let parsed = parse_instant("2024-03-05T17:45:12.123456").unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (17, 45));
        assert_eq!(clock_label(&parsed), "17:45");
    }

    #[test]
    fn minute_precision_with_a_space_separator() {
        let parsed = parse_instant("2024-03-05 08:05").unwrap();
        assert_eq!(clock_label(&parsed), "08:05");
    }

    #[test]
    fn bare_dates_are_utc_midnight() {
        let parsed = parse_instant("2024-03-05").unwrap();
        let expected = Utc
            .with_ymd_and_hms(2024, 3, 5, 0, 0, 0)
            .unwrap()
            .with_timezone(&Local);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_instant("").is_none());
        assert!(parse_instant("ontem à tarde").is_none());
        assert!(parse_instant("2024-13-45T99:00:00").is_none());
        assert!(instant_from_value(&Value::Bool(true)).is_none());
    }

    #[test]
    fn epoch_millis_are_accepted() {
        let parsed = instant_from_value(&serde_json::json!(1_704_104_100_000_i64)).unwrap();
        assert_eq!(parsed.with_timezone(&Utc).minute(), 15);
    }
}

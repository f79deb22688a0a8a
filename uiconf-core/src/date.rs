// uiconf-core/src/date.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Parse the date formats accepted by date options
///
/// RFC 3339 (`2021-03-04T10:00:00Z`), a naive date-time
/// (`2021-03-04T10:00:00`, read as UTC) or a plain date (`2021-03-04`).
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Read a date option value (string or epoch milliseconds)
pub fn date_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

pub fn date_to_value(date: DateTime<Utc>) -> Value {
    Value::String(date.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_accepted_formats() {
        let d = parse_date("2021-03-04").unwrap();
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (2021, 3, 4, 0));
        let d = parse_date("2021-03-04T10:30:00").unwrap();
        assert_eq!((d.hour(), d.minute()), (10, 30));
        let d = parse_date("2021-03-04T10:30:00+02:00").unwrap();
        assert_eq!(d.hour(), 8);
        assert!(parse_date("March 4th").is_none());
    }

    #[test]
    fn test_epoch_millis() {
        let d = date_from_value(&json!(0)).unwrap();
        assert_eq!(d.year(), 1970);
        assert!(date_from_value(&json!(true)).is_none());
    }
}

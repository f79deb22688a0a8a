// uiconf-widgets/src/scheduler/appointment.rs
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use serde_json::{Map, Value};
use uiconf_core::{date_from_value, date_to_value};

use super::options::SchedulerOptions;
use super::view::add_minutes;

/// Appointments are plain data records; the `*Expr` options name their fields
pub type Appointment = Value;

/// Field names of the appointment data, taken from the `*Expr` options
///
/// Expressions may be dotted (`period.start`) to reach nested fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExpressions {
    pub text: String,
    pub start_date: String,
    pub end_date: String,
    pub all_day: String,
    pub description: String,
    pub recurrence_rule: String,
    pub recurrence_exception: String,
    pub start_date_time_zone: String,
    pub end_date_time_zone: String,
}

impl Default for FieldExpressions {
    fn default() -> Self {
        Self {
            text: "text".to_string(),
            start_date: "startDate".to_string(),
            end_date: "endDate".to_string(),
            all_day: "allDay".to_string(),
            description: "description".to_string(),
            recurrence_rule: "recurrenceRule".to_string(),
            recurrence_exception: "recurrenceException".to_string(),
            start_date_time_zone: "startDateTimeZone".to_string(),
            end_date_time_zone: "endDateTimeZone".to_string(),
        }
    }
}

impl FieldExpressions {
    pub fn from_options(options: &SchedulerOptions) -> Self {
        Self {
            text: options.text_expr.clone(),
            start_date: options.start_date_expr.clone(),
            end_date: options.end_date_expr.clone(),
            all_day: options.all_day_expr.clone(),
            description: options.description_expr.clone(),
            recurrence_rule: options.recurrence_rule_expr.clone(),
            recurrence_exception: options.recurrence_exception_expr.clone(),
            start_date_time_zone: options.start_date_time_zone_expr.clone(),
            end_date_time_zone: options.end_date_time_zone_expr.clone(),
        }
    }

    pub fn get<'a>(&self, data: &'a Appointment, expr: &str) -> Option<&'a Value> {
        if expr.is_empty() {
            return None;
        }
        let mut current = data;
        for segment in expr.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current).filter(|v| !v.is_null())
    }

    /// Write a field, creating intermediate objects for dotted expressions
    pub fn set(&self, data: &mut Appointment, expr: &str, value: Value) {
        if expr.is_empty() {
            return;
        }
        let mut current = data;
        let mut segments = expr.split('.').peekable();
        while let Some(segment) = segments.next() {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            let Value::Object(map) = current else {
                return;
            };
            if segments.peek().is_none() {
                map.insert(segment.to_string(), value);
                return;
            }
            current = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
    }

    pub fn text<'a>(&self, data: &'a Appointment) -> Option<&'a str> {
        self.get(data, &self.text).and_then(Value::as_str)
    }

    pub fn description<'a>(&self, data: &'a Appointment) -> Option<&'a str> {
        self.get(data, &self.description).and_then(Value::as_str)
    }

    pub fn start_date(&self, data: &Appointment) -> Option<DateTime<Utc>> {
        self.get(data, &self.start_date).and_then(date_from_value)
    }

    pub fn end_date(&self, data: &Appointment) -> Option<DateTime<Utc>> {
        self.get(data, &self.end_date).and_then(date_from_value)
    }

    pub fn all_day(&self, data: &Appointment) -> bool {
        self.get(data, &self.all_day)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn recurrence_rule<'a>(&self, data: &'a Appointment) -> Option<&'a str> {
        self.get(data, &self.recurrence_rule)
            .and_then(Value::as_str)
            .filter(|rule| !rule.is_empty())
    }

    pub fn recurrence_exception<'a>(&self, data: &'a Appointment) -> Option<&'a str> {
        self.get(data, &self.recurrence_exception).and_then(Value::as_str)
    }

    pub fn set_dates(&self, data: &mut Appointment, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.set(data, &self.start_date, date_to_value(start));
        self.set(data, &self.end_date, date_to_value(end));
    }

    /// Time the appointment occupies; a missing end lasts one cell
    pub fn span(
        &self,
        data: &Appointment,
        cell_duration: f64,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.start_date(data)?;
        if self.all_day(data) {
            let day = Utc.from_utc_datetime(&start.date_naive().and_time(NaiveTime::default()));
            let next_day = add_minutes(day, 24 * 60);
            let end = self
                .end_date(data)
                .filter(|end| *end > next_day)
                .unwrap_or(next_day);
            return Some((day, end));
        }
        let end = self
            .end_date(data)
            .filter(|end| *end >= start)
            .unwrap_or_else(|| add_minutes(start, cell_duration as i64));
        Some((start, end))
    }
}

/// `visible: false` hides an appointment from every view
pub fn is_visible(data: &Appointment) -> bool {
    data.get("visible").and_then(Value::as_bool).unwrap_or(true)
}

pub fn is_disabled(data: &Appointment) -> bool {
    data.get("disabled").and_then(Value::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_default_expressions() {
        let fields = FieldExpressions::default();
        let data = json!({
            "text": "Standup",
            "startDate": "2021-04-28T09:00:00Z",
            "endDate": "2021-04-28T09:15:00Z",
            "recurrenceRule": "FREQ=DAILY"
        });
        assert_eq!(fields.text(&data), Some("Standup"));
        assert_eq!(
            fields.start_date(&data),
            Some(Utc.with_ymd_and_hms(2021, 4, 28, 9, 0, 0).unwrap())
        );
        assert_eq!(fields.recurrence_rule(&data), Some("FREQ=DAILY"));
        assert!(!fields.all_day(&data));
    }

    #[test]
    fn test_dotted_expressions_read_and_write() {
        let fields = FieldExpressions {
            start_date: "period.from".to_string(),
            end_date: "period.to".to_string(),
            ..FieldExpressions::default()
        };
        let mut data = json!({ "subject": "Review" });
        let start = Utc.with_ymd_and_hms(2021, 4, 28, 13, 0, 0).unwrap();
        fields.set_dates(&mut data, start, start + Duration::hours(1));

        assert_eq!(fields.start_date(&data), Some(start));
        assert!(data["period"]["to"].is_string());
        assert_eq!(data["subject"], "Review");
    }

    #[test]
    fn test_span_defaults() {
        let fields = FieldExpressions::default();
        let open_ended = json!({ "startDate": "2021-04-28T10:00:00Z" });
        let (start, end) = fields.span(&open_ended, 30.0).unwrap();
        assert_eq!(end - start, Duration::minutes(30));
        let (_, end) = fields.span(&open_ended, f64::MAX).unwrap();
        assert_eq!(end, DateTime::<Utc>::MAX_UTC);

        let all_day = json!({ "startDate": "2021-04-28T10:00:00Z", "allDay": true });
        let (start, end) = fields.span(&all_day, 30.0).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2021, 4, 28, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2021, 4, 29, 0, 0, 0).unwrap());

        assert!(fields.span(&json!({ "text": "no dates" }), 30.0).is_none());
    }

    #[test]
    fn test_visibility_flags() {
        assert!(is_visible(&json!({})));
        assert!(!is_visible(&json!({ "visible": false })));
        assert!(is_disabled(&json!({ "disabled": true })));
    }
}

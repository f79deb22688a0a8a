// uiconf-widgets/src/scheduler/view.rs
//! Date range covered by a scheduler view
//!
//! Dates are handled in UTC. Timed views start at `startDayHour` of their
//! first day and end one minute before `endDayHour` of their last day; month
//! views always cover whole days. Ranges reaching past the supported
//! calendar are clamped to its bounds.

use chrono::{
    DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc, Weekday,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewType {
    Agenda,
    Day,
    Month,
    TimelineDay,
    TimelineMonth,
    TimelineWeek,
    TimelineWorkWeek,
    Week,
    WorkWeek,
}

impl ViewType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Agenda => "agenda",
            Self::Day => "day",
            Self::Month => "month",
            Self::TimelineDay => "timelineDay",
            Self::TimelineMonth => "timelineMonth",
            Self::TimelineWeek => "timelineWeek",
            Self::TimelineWorkWeek => "timelineWorkWeek",
            Self::Week => "week",
            Self::WorkWeek => "workWeek",
        }
    }

    pub fn is_timeline(self) -> bool {
        matches!(
            self,
            Self::TimelineDay | Self::TimelineMonth | Self::TimelineWeek | Self::TimelineWorkWeek
        )
    }

    /// Month views lay out whole days and ignore the day hours
    pub fn covers_whole_days(self) -> bool {
        matches!(self, Self::Month | Self::TimelineMonth)
    }
}

/// Everything the range of a view depends on
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub view_type: ViewType,
    pub current_date: DateTime<Utc>,
    /// 0 = Sunday
    pub first_day_of_week: u32,
    pub interval_count: u32,
    pub agenda_duration: u32,
    pub start_day_hour: f64,
    pub end_day_hour: f64,
    /// Anchor that multi-interval views are aligned to
    pub start_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ViewRange {
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether `[start, end)` shares any time with the range
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start <= self.end && (end > self.start || (end == start && start >= self.start))
    }
}

/// `instant` moved by `minutes`, saturating at the calendar bounds
pub(crate) fn add_minutes(instant: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    let shifted = Duration::try_minutes(minutes).and_then(|d| instant.checked_add_signed(d));
    match shifted {
        Some(instant) => instant,
        None if minutes < 0 => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    }
}

fn at_hour(date: NaiveDate, hours: f64) -> DateTime<Utc> {
    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::default()));
    add_minutes(midnight, (hours * 60.0).round() as i64)
}

/// `date` moved by `n` days, saturating at the calendar bounds
fn shift(date: NaiveDate, n: i64) -> NaiveDate {
    let shifted = if n >= 0 {
        date.checked_add_days(Days::new(n as u64))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    };
    match shifted {
        Some(date) => date,
        None if n < 0 => NaiveDate::MIN,
        None => NaiveDate::MAX,
    }
}

fn week_start(date: NaiveDate, first_day_of_week: u32) -> NaiveDate {
    let offset = (date.weekday().num_days_from_sunday() + 7 - first_day_of_week % 7) % 7;
    shift(date, -(offset as i64))
}

fn month_start(date: NaiveDate) -> NaiveDate {
    shift(date, -(date.day0() as i64))
}

fn add_months(date: NaiveDate, months: i64) -> NaiveDate {
    let count = Months::new(u32::try_from(months.unsigned_abs()).unwrap_or(u32::MAX));
    let shifted = if months >= 0 {
        date.checked_add_months(count)
    } else {
        date.checked_sub_months(count)
    };
    match shifted {
        Some(date) => date,
        None if months < 0 => NaiveDate::MIN,
        None => NaiveDate::MAX,
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Snap `start` back to the interval that contains it, counting from `anchor`
fn align_days(start: NaiveDate, anchor: Option<NaiveDate>, period: i64) -> NaiveDate {
    match anchor {
        Some(anchor) if period > 1 => {
            let diff = start.signed_duration_since(anchor).num_days();
            shift(anchor, diff.div_euclid(period) * period)
        }
        _ => start,
    }
}

fn align_months(start: NaiveDate, anchor: Option<NaiveDate>, period: i64) -> NaiveDate {
    match anchor {
        Some(anchor) if period > 1 => {
            let anchor = month_start(anchor);
            let index = |d: NaiveDate| d.year() as i64 * 12 + d.month0() as i64;
            let diff = index(start) - index(anchor);
            add_months(anchor, diff.div_euclid(period) * period)
        }
        _ => start,
    }
}

fn nth_working_day(from: NaiveDate, n: u32) -> NaiveDate {
    let mut day = from;
    let mut counted = 0;
    loop {
        if !is_weekend(day) {
            counted += 1;
            if counted >= n {
                return day;
            }
        }
        let next = shift(day, 1);
        if next == day {
            return day;
        }
        day = next;
    }
}

/// First and last calendar day shown by the view
fn day_span(settings: &ViewSettings) -> (NaiveDate, NaiveDate) {
    let today = settings.current_date.date_naive();
    let anchor = settings.start_date.map(|d| d.date_naive());
    let count = settings.interval_count.max(1) as i64;
    let first_day = settings.first_day_of_week;

    match settings.view_type {
        ViewType::Day | ViewType::TimelineDay => {
            let start = align_days(today, anchor, count);
            (start, shift(start, count - 1))
        }
        ViewType::Week | ViewType::TimelineWeek => {
            let start = align_days(
                week_start(today, first_day),
                anchor.map(|a| week_start(a, first_day)),
                7 * count,
            );
            (start, shift(start, 7 * count - 1))
        }
        ViewType::WorkWeek | ViewType::TimelineWorkWeek => {
            let mut start = align_days(
                week_start(today, first_day),
                anchor.map(|a| week_start(a, first_day)),
                7 * count,
            );
            while is_weekend(start) && start < NaiveDate::MAX {
                start = shift(start, 1);
            }
            (start, nth_working_day(start, 5 * count as u32))
        }
        ViewType::Month | ViewType::TimelineMonth => {
            let first = align_months(month_start(today), anchor, count);
            let last = shift(add_months(first, count), -1);
            if settings.view_type == ViewType::Month {
                (week_start(first, first_day), shift(week_start(last, first_day), 6))
            } else {
                (first, last)
            }
        }
        ViewType::Agenda => {
            let length = settings.agenda_duration.max(1) as i64;
            (today, shift(today, length - 1))
        }
    }
}

/// Compute the first and last instant the view displays
pub fn view_range(settings: &ViewSettings) -> ViewRange {
    let (first, last) = day_span(settings);
    let (start_hour, end_hour) = if settings.view_type.covers_whole_days() {
        (0.0, 24.0)
    } else {
        (settings.start_day_hour, settings.end_day_hour)
    };
    ViewRange {
        start: at_hour(first, start_hour),
        end: add_minutes(at_hour(last, end_hour), -1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    // 2021-04-28 is a Wednesday
    fn settings(view_type: ViewType) -> ViewSettings {
        ViewSettings {
            view_type,
            current_date: date(2021, 4, 28, 15, 30),
            first_day_of_week: 0,
            interval_count: 1,
            agenda_duration: 7,
            start_day_hour: 0.0,
            end_day_hour: 24.0,
            start_date: None,
        }
    }

    fn range(settings: &ViewSettings) -> (DateTime<Utc>, DateTime<Utc>) {
        let range = view_range(settings);
        (range.start, range.end)
    }

    #[test]
    fn test_day_view() {
        assert_eq!(
            range(&settings(ViewType::Day)),
            (date(2021, 4, 28, 0, 0), date(2021, 4, 28, 23, 59))
        );
    }

    #[test]
    fn test_day_hours_bound_timed_views() {
        let mut s = settings(ViewType::Day);
        s.start_day_hour = 9.0;
        s.end_day_hour = 18.0;
        assert_eq!(range(&s), (date(2021, 4, 28, 9, 0), date(2021, 4, 28, 17, 59)));

        s.start_day_hour = 8.5;
        assert_eq!(view_range(&s).start, date(2021, 4, 28, 8, 30));
    }

    #[test]
    fn test_week_view_follows_first_day_of_week() {
        let mut s = settings(ViewType::Week);
        assert_eq!(range(&s), (date(2021, 4, 25, 0, 0), date(2021, 5, 1, 23, 59)));

        s.first_day_of_week = 1;
        assert_eq!(range(&s), (date(2021, 4, 26, 0, 0), date(2021, 5, 2, 23, 59)));
    }

    #[test]
    fn test_work_week_skips_weekend() {
        let s = settings(ViewType::WorkWeek);
        assert_eq!(range(&s), (date(2021, 4, 26, 0, 0), date(2021, 4, 30, 23, 59)));

        let mut two = settings(ViewType::TimelineWorkWeek);
        two.interval_count = 2;
        assert_eq!(view_range(&two).end, date(2021, 5, 7, 23, 59));
    }

    #[test]
    fn test_month_view_spans_whole_weeks() {
        let mut s = settings(ViewType::Month);
        s.start_day_hour = 9.0;
        assert_eq!(range(&s), (date(2021, 3, 28, 0, 0), date(2021, 5, 1, 23, 59)));
    }

    #[test]
    fn test_timeline_month_spans_calendar_month() {
        let s = settings(ViewType::TimelineMonth);
        assert_eq!(range(&s), (date(2021, 4, 1, 0, 0), date(2021, 4, 30, 23, 59)));
    }

    #[test]
    fn test_agenda_uses_duration() {
        let mut s = settings(ViewType::Agenda);
        assert_eq!(range(&s), (date(2021, 4, 28, 0, 0), date(2021, 5, 4, 23, 59)));

        s.agenda_duration = 1;
        assert_eq!(view_range(&s).end, date(2021, 4, 28, 23, 59));
    }

    #[test]
    fn test_range_past_calendar_end_is_clamped() {
        let mut s = settings(ViewType::Agenda);
        s.agenda_duration = u32::MAX;
        let r = view_range(&s);
        assert_eq!(r.start, date(2021, 4, 28, 0, 0));
        assert_eq!(r.end.date_naive(), NaiveDate::MAX);

        let mut late = settings(ViewType::TimelineWorkWeek);
        late.current_date = Utc.from_utc_datetime(&NaiveDate::MAX.and_time(NaiveTime::default()));
        late.interval_count = 1000;
        assert_eq!(view_range(&late).end.date_naive(), NaiveDate::MAX);

        let mut month = settings(ViewType::Month);
        month.current_date = late.current_date;
        assert!(view_range(&month).start <= view_range(&month).end);
    }

    #[test]
    fn test_interval_count_aligned_to_start_date() {
        let mut s = settings(ViewType::Day);
        s.interval_count = 3;
        s.start_date = Some(date(2021, 4, 20, 0, 0));
        assert_eq!(range(&s), (date(2021, 4, 26, 0, 0), date(2021, 4, 28, 23, 59)));

        let mut weeks = settings(ViewType::Week);
        weeks.interval_count = 2;
        assert_eq!(range(&weeks), (date(2021, 4, 25, 0, 0), date(2021, 5, 8, 23, 59)));

        let mut months = settings(ViewType::TimelineMonth);
        months.interval_count = 2;
        months.start_date = Some(date(2021, 3, 15, 0, 0));
        assert_eq!(range(&months), (date(2021, 3, 1, 0, 0), date(2021, 4, 30, 23, 59)));
    }

    #[test]
    fn test_overlap() {
        let r = view_range(&settings(ViewType::Day));
        assert!(r.overlaps(date(2021, 4, 27, 23, 0), date(2021, 4, 28, 1, 0)));
        assert!(!r.overlaps(date(2021, 4, 27, 22, 0), date(2021, 4, 28, 0, 0)));
        assert!(r.overlaps(date(2021, 4, 28, 10, 0), date(2021, 4, 28, 10, 0)));
        assert!(!r.overlaps(date(2021, 4, 29, 0, 0), date(2021, 4, 29, 1, 0)));
        assert!(r.contains(date(2021, 4, 28, 23, 59)));
        assert!(ViewType::TimelineWeek.is_timeline());
    }
}

//! Week and month day grids for calendar views.

use chrono::{Datelike, Days, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::streak::StreakRecord;
use crate::time::week_start;

/// What happened on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayMark {
    Learned,
    Frozen,
    Idle,
}

impl DayMark {
    /// Frozen wins over learned if a record somehow holds both.
    pub fn of(record: &StreakRecord, day: NaiveDate) -> Self {
        if record.is_frozen(day) {
            DayMark::Frozen
        } else if record.is_learned(day) {
            DayMark::Learned
        } else {
            DayMark::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub mark: DayMark,
    pub is_today: bool,
}

/// Sunday-first week containing `day`, or `None` at the edges of the calendar.
pub fn week_days(day: NaiveDate) -> Option<[NaiveDate; 7]> {
    let start = week_start(day)?;
    start.checked_add_days(Days::new(6))?;
    Some(std::array::from_fn(|i| start + Duration::days(i as i64)))
}

/// Every day of `month` in `year`, or empty if the month doesn't exist.
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect()
}

pub fn annotate(
    record: &StreakRecord,
    days: impl IntoIterator<Item = NaiveDate>,
    today: NaiveDate,
) -> Vec<CalendarDay> {
    days.into_iter()
        .map(|date| CalendarDay {
            date,
            mark: DayMark::of(record, date),
            is_today: date == today,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_days_sunday_first() {
        let week = week_days(day(2026, 10, 21)).unwrap();
        assert_eq!(week[0], day(2026, 10, 18));
        assert_eq!(week[6], day(2026, 10, 24));
        assert_eq!(week[0].weekday(), chrono::Weekday::Sun);
    }

    #[test]
    fn test_week_days_at_calendar_edges() {
        assert!(week_days(NaiveDate::MIN).is_none());
        assert!(week_days(NaiveDate::MAX).is_none());
    }

    #[test]
    fn test_month_days_lengths() {
        assert_eq!(month_days(2026, 2).len(), 28);
        assert_eq!(month_days(2028, 2).len(), 29);
        assert_eq!(month_days(2026, 12).len(), 31);
        assert_eq!(month_days(2026, 12).last(), Some(&day(2026, 12, 31)));
        assert!(month_days(2026, 13).is_empty());
        assert!(month_days(2026, 0).is_empty());
    }

    #[test]
    fn test_annotate_marks() {
        let mut record = StreakRecord::new();
        record.learned_dates.insert(day(2026, 10, 19));
        record.freezed_dates.insert(day(2026, 10, 20));

        let grid = annotate(&record, week_days(day(2026, 10, 20)).unwrap(), day(2026, 10, 20));
        assert_eq!(grid.len(), 7);
        assert_eq!(grid[1].mark, DayMark::Learned);
        assert_eq!(grid[2].mark, DayMark::Frozen);
        assert!(grid[2].is_today);
        assert_eq!(grid.iter().filter(|d| d.mark == DayMark::Idle).count(), 5);
    }
}

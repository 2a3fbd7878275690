use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Winter/summer split of a run of days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonDays {
    pub winter_days: i64,
    pub summer_days: i64,
}

impl SeasonDays {
    pub fn total(&self) -> i64 {
        self.winter_days + self.summer_days
    }
}

/// Signed number of whole days from `start` to `end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

pub fn is_winter_month(date: NaiveDate, winter_months: &[u32]) -> bool {
    winter_months.contains(&date.month())
}

/// Classifies every day of the half-open interval `[start, end)`.
///
/// An empty or reversed interval yields zero days of either kind, so the
/// total always matches `days_between(start, end)` for `start <= end`.
/// The interval is walked one calendar month at a time.
pub fn count_season_days(start: NaiveDate, end: NaiveDate, winter_months: &[u32]) -> SeasonDays {
    let mut days = SeasonDays::default();
    let mut cursor = start;

    while cursor < end {
        let month_end = first_of_next_month(cursor).map_or(end, |next| next.min(end));
        let span = days_between(cursor, month_end);

        if is_winter_month(cursor, winter_months) {
            days.winter_days += span;
        } else {
            days.summer_days += span;
        }

        cursor = month_end;
    }

    days
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

/// True when `b` is the calendar day right after `a` or right before it.
pub fn are_adjacent_days(a: NaiveDate, b: NaiveDate) -> bool {
    days_between(a, b).abs() == 1
}

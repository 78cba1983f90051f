//! Calendar-aligned date ranges and their labels.

use serde::Serialize;
use time::{Date, Duration, Month, util::is_leap_year};

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// Whether `date` falls within the range, including both ends.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The Sunday-to-Saturday week containing `anchor_date`.
pub fn week_bounds(anchor_date: Date) -> DateRange {
    let days_since_sunday = anchor_date.weekday().number_days_from_sunday() as i64;
    let start = anchor_date
        .checked_sub(Duration::days(days_since_sunday))
        .unwrap_or(Date::MIN);
    let end = start.checked_add(Duration::days(6)).unwrap_or(Date::MAX);

    DateRange { start, end }
}

/// The first to the last day of `month` in `year`, or `None` if the year is
/// outside the supported range of dates.
pub fn month_bounds(year: i32, month: Month) -> Option<DateRange> {
    let start = Date::from_calendar_date(year, month, 1).ok()?;
    let end = Date::from_calendar_date(year, month, last_day_of_month(year, month)).ok()?;

    Some(DateRange { start, end })
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

/// 1 January to 31 December of `year`, or `None` if the year is outside the
/// supported range of dates.
pub fn year_bounds(year: i32) -> Option<DateRange> {
    Some(DateRange {
        start: Date::from_calendar_date(year, Month::January, 1).ok()?,
        end: Date::from_calendar_date(year, Month::December, 31).ok()?,
    })
}

/// The year and month `count` months before `year` and `month`.
///
/// Returns `None` if the year does not fit in an `i32`.
pub fn months_before(year: i32, month: Month, count: u32) -> Option<(i32, Month)> {
    let index = i64::from(year) * 12 + i64::from(u8::from(month)) - 1 - i64::from(count);

    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = Month::try_from(index.rem_euclid(12) as u8 + 1).ok()?;

    Some((year, month))
}

/// Every day from `start` to `end` inclusive, in ascending order.
///
/// Empty if `start` is after `end`.
pub fn each_day(start: Date, end: Date) -> Vec<Date> {
    let mut days = Vec::new();
    let mut current = Some(start);

    while let Some(day) = current.filter(|day| *day <= end) {
        days.push(day);
        current = day.next_day();
    }

    days
}

/// The month as a three-letter abbreviation, e.g. "Jan".
pub fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Formats a date as "Jan 5".
pub fn day_label(date: Date) -> String {
    format!("{} {}", month_abbrev(date.month()), date.day())
}

/// Formats a date as "Jan 2024".
pub fn month_label(date: Date) -> String {
    format!("{} {}", month_abbrev(date.month()), date.year())
}

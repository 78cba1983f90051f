//! Income and expenses per calendar week, month or year.

use std::{fmt::Display, str::FromStr};

use serde::Serialize;
use time::{Date, Duration};

use crate::{
    Error,
    aggregation::calendar::{
        DateRange, day_label, month_bounds, month_label, months_before, week_bounds, year_bounds,
    },
    models::{Transaction, TransactionKind},
};

/// How many days before today the weekly series starts.
pub const WEEKLY_LOOKBACK_DAYS: i64 = 60;

/// How many calendar months the monthly series covers, including the current one.
pub const MONTHLY_INTERVALS: u32 = 12;

/// How many calendar years the yearly series covers, including the current one.
pub const YEARLY_INTERVALS: i32 = 5;

/// The size of the calendar intervals to group transactions into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// Sunday to Saturday weeks over roughly the last two months.
    Weekly,
    /// The last twelve calendar months.
    #[default]
    Monthly,
    /// The last five calendar years.
    Yearly,
}

impl Timeframe {
    /// The name shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Timeframe::Weekly => "Weekly",
            Timeframe::Monthly => "Monthly",
            Timeframe::Yearly => "Yearly",
        }
    }

    /// The intervals this timeframe covers, oldest first, with the last one
    /// containing `today`.
    pub fn intervals(self, today: Date) -> Vec<DateRange> {
        match self {
            Timeframe::Weekly => {
                let first_day = today
                    .checked_sub(Duration::days(WEEKLY_LOOKBACK_DAYS))
                    .unwrap_or(Date::MIN);
                let mut intervals = Vec::new();
                let mut week = week_bounds(first_day);

                loop {
                    intervals.push(week);

                    if week.end >= today {
                        break;
                    }

                    match week.end.next_day() {
                        Some(next_sunday) => week = week_bounds(next_sunday),
                        None => break,
                    }
                }

                intervals
            }
            Timeframe::Monthly => (0..MONTHLY_INTERVALS)
                .rev()
                .filter_map(|offset| {
                    let (year, month) = months_before(today.year(), today.month(), offset)?;
                    month_bounds(year, month)
                })
                .collect(),
            Timeframe::Yearly => (0..YEARLY_INTERVALS)
                .rev()
                .filter_map(|offset| year_bounds(today.year().checked_sub(offset)?))
                .collect(),
        }
    }

    fn period_label(self, interval: &DateRange) -> String {
        match self {
            Timeframe::Weekly => day_label(interval.start),
            Timeframe::Monthly => month_label(interval.start),
            Timeframe::Yearly => interval.start.year().to_string(),
        }
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(Timeframe::Weekly),
            "monthly" | "month" => Ok(Timeframe::Monthly),
            "yearly" | "year" => Ok(Timeframe::Yearly),
            _ => Err(Error::InvalidChoice {
                value: s.to_owned(),
                expected: "weekly, monthly, yearly",
            }),
        }
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label().to_lowercase())
    }
}

/// The income and expenses that fall within one calendar interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalTotals {
    /// The label for the interval, e.g. "Jan 7", "Jan 2024" or "2024".
    pub period_label: String,
    /// The first day of the interval.
    pub start: Date,
    /// The last day of the interval.
    pub end: Date,
    /// The sum of income in the interval.
    pub income: f64,
    /// The sum of expenses in the interval.
    pub expense: f64,
    /// Income minus expenses.
    pub balance: f64,
}

/// Sums income and expenses for each interval of `timeframe`.
///
/// Every interval appears in the output even if no transactions fall within
/// it. Transactions outside all intervals are ignored.
pub fn compute_interval_series(
    transactions: &[Transaction],
    timeframe: Timeframe,
    today: Date,
) -> Vec<IntervalTotals> {
    let intervals = timeframe.intervals(today);

    let mut series: Vec<IntervalTotals> = intervals
        .iter()
        .map(|interval| IntervalTotals {
            period_label: timeframe.period_label(interval),
            start: interval.start,
            end: interval.end,
            income: 0.0,
            expense: 0.0,
            balance: 0.0,
        })
        .collect();

    for transaction in transactions {
        // Intervals are sorted and non-overlapping, so the only candidate is
        // the first interval that ends on or after the transaction's date.
        let index = intervals.partition_point(|interval| interval.end < transaction.date);

        let Some(totals) = series.get_mut(index) else {
            continue;
        };

        if !intervals[index].contains(transaction.date) {
            continue;
        }

        match transaction.kind {
            TransactionKind::Income => totals.income += transaction.amount,
            TransactionKind::Expense => totals.expense += transaction.amount,
        }
    }

    for totals in &mut series {
        totals.balance = totals.income - totals.expense;
    }

    series
}

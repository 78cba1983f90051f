//! The running balance over a trailing window of days.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, Duration};

use crate::{
    aggregation::calendar::each_day,
    models::{Transaction, TransactionKind},
};

/// The balance at the end of one day, and the money that moved on that day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalancePoint {
    /// The calendar day.
    pub date: Date,
    /// The signed sum of every transaction dated on or before `date`.
    pub cumulative_balance: f64,
    /// The income dated exactly on `date`.
    pub day_income: f64,
    /// The expenses dated exactly on `date`.
    pub day_expense: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct DayTotals {
    income: f64,
    expense: f64,
}

/// Calculates the running balance for each day from `today - lookback_days` to
/// `today`.
///
/// Transactions dated before the window contribute to the opening balance, so
/// the first point already includes everything that happened before it.
/// Transactions dated after `today` are ignored.
///
/// # Arguments
/// * `transactions` - The transactions to sum, in any order
/// * `lookback_days` - How many days before `today` the window starts
/// * `today` - The last day in the window
///
/// # Returns
/// One point per calendar day, `lookback_days + 1` in total, oldest first.
pub fn compute_balance_series(
    transactions: &[Transaction],
    lookback_days: u32,
    today: Date,
) -> Vec<BalancePoint> {
    let window_start = today
        .checked_sub(Duration::days(lookback_days as i64))
        .unwrap_or(Date::MIN);

    let mut opening_balance = 0.0;
    let mut daily_totals: BTreeMap<Date, DayTotals> = BTreeMap::new();

    for transaction in transactions {
        if transaction.date > today {
            continue;
        }

        if transaction.date < window_start {
            opening_balance += transaction.signed_amount();
            continue;
        }

        let totals = daily_totals.entry(transaction.date).or_default();
        match transaction.kind {
            TransactionKind::Income => totals.income += transaction.amount,
            TransactionKind::Expense => totals.expense += transaction.amount,
        }
    }

    let mut cumulative_balance = opening_balance;

    each_day(window_start, today)
        .into_iter()
        .map(|date| {
            let totals = daily_totals.get(&date).copied().unwrap_or_default();
            cumulative_balance += totals.income - totals.expense;

            BalancePoint {
                date,
                cumulative_balance,
                day_income: totals.income,
                day_expense: totals.expense,
            }
        })
        .collect()
}

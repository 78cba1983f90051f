//! Derived state for the dashboard and analytics views.
//!
//! Every function here is pure: it reads a slice of validated transactions and
//! the current date, passed in by the caller, and returns a new series ready to
//! be printed. Nothing reads the clock or mutates its input.

mod balance;
mod calendar;
mod category;
mod interval;
mod summary;

pub use balance::{BalancePoint, compute_balance_series};
pub use calendar::{DateRange, day_label, month_abbrev, month_label};
pub use category::{
    CategoryShare, CategoryTotal, MonthlyCategorySpending, UNKNOWN_CATEGORY_NAME, category_shares,
    compute_category_breakdown, compute_category_spending_series, top_categories,
};
pub use interval::{
    IntervalTotals, MONTHLY_INTERVALS, Timeframe, WEEKLY_LOOKBACK_DAYS, YEARLY_INTERVALS,
    compute_interval_series,
};
pub use summary::compute_financial_summary;

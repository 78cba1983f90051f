//! Totals per category, for breakdowns and the category spending chart.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{
    aggregation::calendar::{month_bounds, month_label, months_before},
    models::{Category, CategoryId, DEFAULT_COLOR, Transaction, TransactionKind},
};

/// The name shown for a category that is not in the local collection.
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown";

/// The sum of transaction amounts for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category the transactions belong to.
    pub category_id: CategoryId,
    /// The summed amount.
    pub total: f64,
}

/// Groups the transactions of `kind` by category and sums each group.
///
/// Transactions without a category are excluded, as are groups that sum to
/// zero. The result is sorted by total, highest first, with ties ordered by
/// category ID.
pub fn compute_category_breakdown(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&CategoryId, f64> = HashMap::new();

    for transaction in transactions.iter().filter(|transaction| transaction.kind == kind) {
        let Some(category_id) = &transaction.category_id else {
            continue;
        };

        *totals.entry(category_id).or_insert(0.0) += transaction.amount;
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .filter(|(_, total)| *total != 0.0)
        .map(|(category_id, total)| CategoryTotal {
            category_id: category_id.clone(),
            total,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category_id.cmp(&b.category_id))
    });

    breakdown
}

/// The `n` largest entries of a breakdown from [compute_category_breakdown].
pub fn top_categories(breakdown: &[CategoryTotal], n: usize) -> &[CategoryTotal] {
    &breakdown[..n.min(breakdown.len())]
}

/// A category's total with the details needed to display it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    /// The category the total belongs to.
    pub category_id: CategoryId,
    /// The category's name, or "Unknown" if it could not be found.
    pub name: String,
    /// The category's display color.
    pub color: String,
    /// The summed amount.
    pub total: f64,
    /// The total as a percentage of the sum of all entries.
    pub percentage: f64,
}

/// Looks up each entry of `breakdown` in `categories` and calculates its share
/// of the overall total.
pub fn category_shares(breakdown: &[CategoryTotal], categories: &[Category]) -> Vec<CategoryShare> {
    let overall: f64 = breakdown.iter().map(|entry| entry.total).sum();

    breakdown
        .iter()
        .map(|entry| {
            let category = categories
                .iter()
                .find(|category| category.id == entry.category_id);

            CategoryShare {
                category_id: entry.category_id.clone(),
                name: category
                    .map(|category| category.name.clone())
                    .unwrap_or_else(|| UNKNOWN_CATEGORY_NAME.to_owned()),
                color: category
                    .map(|category| category.color.clone())
                    .unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
                total: entry.total,
                percentage: if overall > 0.0 {
                    entry.total / overall * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// The expenses of the selected categories in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCategorySpending {
    /// The month, e.g. "Jan 2024".
    pub period_label: String,
    /// The first day of the month.
    pub start: Date,
    /// The last day of the month.
    pub end: Date,
    /// One entry per selected category, in the order they were requested.
    pub totals: Vec<CategoryTotal>,
}

/// Sums the expenses of each category in `category_ids` per calendar month.
///
/// Covers the `months` months ending with the month containing `today`, oldest
/// first. Every requested category appears in every month, with a zero total
/// if nothing was spent. Months before the earliest supported date are left
/// out.
pub fn compute_category_spending_series(
    transactions: &[Transaction],
    category_ids: &[CategoryId],
    months: u32,
    today: Date,
) -> Vec<MonthlyCategorySpending> {
    (0..months)
        .rev()
        .filter_map(|offset| {
            let (year, month) = months_before(today.year(), today.month(), offset)?;
            let range = month_bounds(year, month)?;

            let totals = category_ids
                .iter()
                .map(|category_id| CategoryTotal {
                    category_id: category_id.clone(),
                    total: transactions
                        .iter()
                        .filter(|transaction| {
                            transaction.kind == TransactionKind::Expense
                                && transaction.category_id.as_ref() == Some(category_id)
                                && range.contains(transaction.date)
                        })
                        .map(|transaction| transaction.amount)
                        .sum(),
                })
                .collect();

            Some(MonthlyCategorySpending {
                period_label: month_label(range.start),
                start: range.start,
                end: range.end,
                totals,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::models::{Category, CategoryId, Transaction, TransactionId, TransactionKind};

    use super::{
        CategoryTotal, category_shares, compute_category_breakdown,
        compute_category_spending_series, top_categories,
    };

    fn transaction(
        amount: f64,
        kind: TransactionKind,
        date: Date,
        category_id: Option<&str>,
    ) -> Transaction {
        Transaction {
            id: TransactionId::new(format!("{date}-{amount}")),
            amount,
            kind,
            date,
            category_id: category_id.map(CategoryId::new),
            account_id: None,
            description: String::new(),
        }
    }

    fn total(category_id: &str, total: f64) -> CategoryTotal {
        CategoryTotal {
            category_id: CategoryId::new(category_id),
            total,
        }
    }

    #[test]
    fn expense_breakdown_is_sorted_by_total() {
        let transactions = vec![
            transaction(100.0, TransactionKind::Income, date!(2024 - 01 - 01), Some("S")),
            transaction(20.0, TransactionKind::Expense, date!(2024 - 01 - 02), Some("B")),
            transaction(40.0, TransactionKind::Expense, date!(2024 - 01 - 01), Some("A")),
        ];

        let breakdown = compute_category_breakdown(&transactions, TransactionKind::Expense);

        assert_eq!(breakdown, vec![total("A", 40.0), total("B", 20.0)]);
    }

    #[test]
    fn breakdown_excludes_uncategorised_and_zero_totals() {
        let transactions = vec![
            transaction(15.0, TransactionKind::Expense, date!(2024 - 01 - 01), None),
            transaction(0.0, TransactionKind::Expense, date!(2024 - 01 - 01), Some("Z")),
            transaction(5.0, TransactionKind::Expense, date!(2024 - 01 - 01), Some("A")),
            transaction(7.5, TransactionKind::Expense, date!(2024 - 01 - 03), Some("A")),
        ];

        let breakdown = compute_category_breakdown(&transactions, TransactionKind::Expense);

        assert_eq!(breakdown, vec![total("A", 12.5)]);
    }

    #[test]
    fn breakdown_breaks_ties_by_category_id() {
        let transactions = vec![
            transaction(10.0, TransactionKind::Income, date!(2024 - 01 - 01), Some("c")),
            transaction(10.0, TransactionKind::Income, date!(2024 - 01 - 01), Some("a")),
            transaction(10.0, TransactionKind::Income, date!(2024 - 01 - 01), Some("b")),
        ];

        let breakdown = compute_category_breakdown(&transactions, TransactionKind::Income);

        assert_eq!(
            breakdown,
            vec![total("a", 10.0), total("b", 10.0), total("c", 10.0)]
        );
    }

    #[test]
    fn breakdown_is_strictly_ordered() {
        let transactions: Vec<Transaction> = (1..=20)
            .map(|i| {
                transaction(
                    (i * 7 % 11) as f64,
                    TransactionKind::Expense,
                    date!(2024 - 01 - 01),
                    Some(format!("cat-{}", i % 6).as_str()),
                )
            })
            .collect();

        let breakdown = compute_category_breakdown(&transactions, TransactionKind::Expense);

        assert!(breakdown.iter().all(|entry| entry.total != 0.0));
        for pair in breakdown.windows(2) {
            assert!(
                pair[0].total > pair[1].total
                    || (pair[0].total == pair[1].total && pair[0].category_id < pair[1].category_id)
            );
        }
    }

    #[test]
    fn top_categories_takes_at_most_n() {
        let breakdown = vec![total("a", 3.0), total("b", 2.0), total("c", 1.0)];

        assert_eq!(top_categories(&breakdown, 2), &breakdown[..2]);
        assert_eq!(top_categories(&breakdown, 10).len(), 3);
        assert!(top_categories(&[], 5).is_empty());
    }

    #[test]
    fn shares_use_category_details_with_fallback() {
        let categories = vec![Category {
            id: CategoryId::new("a"),
            name: "Groceries".to_owned(),
            kind: TransactionKind::Expense,
            color: "#00ff00".to_owned(),
        }];
        let breakdown = vec![total("a", 75.0), total("gone", 25.0)];

        let shares = category_shares(&breakdown, &categories);

        assert_eq!(shares[0].name, "Groceries");
        assert_eq!(shares[0].color, "#00ff00");
        assert_eq!(shares[0].percentage, 75.0);
        assert_eq!(shares[1].name, "Unknown");
        assert_eq!(shares[1].color, "#888888");
        assert_eq!(shares[1].percentage, 25.0);
    }

    #[test]
    fn spending_series_has_every_category_every_month() {
        let transactions = vec![
            transaction(40.0, TransactionKind::Expense, date!(2024 - 01 - 10), Some("A")),
            transaction(20.0, TransactionKind::Expense, date!(2024 - 03 - 31), Some("B")),
            transaction(5.0, TransactionKind::Expense, date!(2024 - 03 - 01), Some("B")),
            // Income and unselected categories are not counted.
            transaction(99.0, TransactionKind::Income, date!(2024 - 03 - 02), Some("A")),
            transaction(99.0, TransactionKind::Expense, date!(2024 - 03 - 02), Some("C")),
        ];
        let selected = [CategoryId::new("A"), CategoryId::new("B")];

        let series =
            compute_category_spending_series(&transactions, &selected, 3, date!(2024 - 03 - 15));

        let labels: Vec<&str> = series.iter().map(|month| month.period_label.as_str()).collect();
        assert_eq!(labels, ["Jan 2024", "Feb 2024", "Mar 2024"]);
        assert_eq!(series[0].totals, vec![total("A", 40.0), total("B", 0.0)]);
        assert_eq!(series[1].totals, vec![total("A", 0.0), total("B", 0.0)]);
        assert_eq!(series[2].totals, vec![total("A", 0.0), total("B", 25.0)]);
    }

    #[test]
    fn spending_series_stops_at_earliest_supported_month() {
        let series = compute_category_spending_series(&[], &[], 150_000, date!(2024 - 01 - 01));

        let supported_months = (2024 - Date::MIN.year()) as usize * 12 + 1;
        assert_eq!(series.len(), supported_months);
        assert_eq!(series[0].start, Date::MIN);
        assert_eq!(
            series.last().map(|month| month.period_label.as_str()),
            Some("Jan 2024")
        );
    }
}

//! Filtering and sorting for transaction lists.

use std::str::FromStr;

use time::Date;

use crate::{
    Error,
    models::{Category, CategoryId, Transaction, TransactionKind},
};

/// The criteria a transaction must meet to be listed. Unset criteria match
/// everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Text the description must contain, ignoring case.
    pub search: Option<String>,
    /// The category the transaction must belong to.
    pub category_id: Option<CategoryId>,
    /// Only income or only expenses.
    pub kind: Option<TransactionKind>,
    /// The day the transaction must have happened on.
    pub date: Option<Date>,
}

impl TransactionFilter {
    /// Whether `transaction` meets every set criterion.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let search = self.search.as_deref().map(str::trim).unwrap_or_default();
        let matches_search = search.is_empty()
            || transaction
                .description
                .to_lowercase()
                .contains(&search.to_lowercase());

        let matches_category = self
            .category_id
            .as_ref()
            .is_none_or(|category_id| transaction.category_id.as_ref() == Some(category_id));
        let matches_kind = self.kind.is_none_or(|kind| transaction.kind == kind);
        let matches_date = self.date.is_none_or(|date| transaction.date == date);

        matches_search && matches_category && matches_kind && matches_date
    }

    /// The transactions that match the filter, in their original order.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|transaction| self.matches(transaction))
            .collect()
    }
}

/// The field to sort transactions by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// When the transaction happened.
    #[default]
    Date,
    /// The amount, ignoring the kind.
    Amount,
    /// The description, ignoring case.
    Description,
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortField::Date),
            "amount" => Ok(SortField::Amount),
            "description" => Ok(SortField::Description),
            _ => Err(Error::InvalidChoice {
                value: s.to_owned(),
                expected: "date, amount, description",
            }),
        }
    }
}

/// Ascending or descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest, earliest or A first.
    Asc,
    /// Largest, latest or Z first.
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(Error::InvalidChoice {
                value: s.to_owned(),
                expected: "asc, desc",
            }),
        }
    }
}

/// Sort `transactions` in place. The sort is stable, so transactions that
/// compare equal keep their relative order.
pub fn sort_transactions(
    transactions: &mut [&Transaction],
    field: SortField,
    direction: SortDirection,
) {
    transactions.sort_by(|a, b| {
        let ordering = match field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.total_cmp(&b.amount),
            SortField::Description => a
                .description
                .to_lowercase()
                .cmp(&b.description.to_lowercase()),
        };

        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// The `n` most recent transactions, latest first.
pub fn recent_transactions(transactions: &[Transaction], n: usize) -> Vec<&Transaction> {
    let mut recent: Vec<&Transaction> = transactions.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(n);
    recent
}

/// The categories that may be chosen for a transaction of `kind`.
pub fn categories_of_kind(categories: &[Category], kind: TransactionKind) -> Vec<&Category> {
    categories
        .iter()
        .filter(|category| category.kind == kind)
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::models::{Category, CategoryId, Transaction, TransactionId, TransactionKind};

    use super::{
        SortDirection, SortField, TransactionFilter, categories_of_kind, recent_transactions,
        sort_transactions,
    };

    fn transaction(
        id: &str,
        amount: f64,
        kind: TransactionKind,
        date: Date,
        category_id: &str,
        description: &str,
    ) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            amount,
            kind,
            date,
            category_id: Some(CategoryId::new(category_id)),
            account_id: None,
            description: description.to_owned(),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            transaction("1", 12.5, TransactionKind::Expense, date!(2024 - 01 - 03), "food", "Lunch at cafe"),
            transaction("2", 2000.0, TransactionKind::Income, date!(2024 - 01 - 01), "salary", "January salary"),
            transaction("3", 60.0, TransactionKind::Expense, date!(2024 - 01 - 03), "food", "groceries"),
            transaction("4", 9.99, TransactionKind::Expense, date!(2024 - 01 - 02), "fun", "Movie"),
        ]
    }

    fn ids(transactions: &[&Transaction]) -> Vec<String> {
        transactions.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let transactions = sample();

        assert_eq!(TransactionFilter::default().apply(&transactions).len(), 4);
    }

    #[test]
    fn search_ignores_case() {
        let transactions = sample();
        let filter = TransactionFilter {
            search: Some("CAFE".to_owned()),
            ..Default::default()
        };

        assert_eq!(ids(&filter.apply(&transactions)), ["1"]);
    }

    #[test]
    fn criteria_combine() {
        let transactions = sample();
        let filter = TransactionFilter {
            search: None,
            category_id: Some(CategoryId::new("food")),
            kind: Some(TransactionKind::Expense),
            date: Some(date!(2024 - 01 - 03)),
        };

        assert_eq!(ids(&filter.apply(&transactions)), ["1", "3"]);

        let filter = TransactionFilter {
            kind: Some(TransactionKind::Income),
            ..filter
        };

        assert!(filter.apply(&transactions).is_empty());
    }

    #[test]
    fn sorts_by_each_field() {
        let transactions = sample();
        let mut listed = TransactionFilter::default().apply(&transactions);

        sort_transactions(&mut listed, SortField::Amount, SortDirection::Desc);
        assert_eq!(ids(&listed), ["2", "3", "1", "4"]);

        sort_transactions(&mut listed, SortField::Description, SortDirection::Asc);
        assert_eq!(ids(&listed), ["3", "2", "1", "4"]);

        sort_transactions(&mut listed, SortField::Date, SortDirection::Asc);
        assert_eq!(ids(&listed), ["2", "4", "3", "1"]);
    }

    #[test]
    fn recent_transactions_are_latest_first() {
        let transactions = sample();

        let recent = recent_transactions(&transactions, 3);

        assert_eq!(ids(&recent), ["1", "3", "4"]);
        assert_eq!(recent_transactions(&transactions, 10).len(), 4);
    }

    #[test]
    fn offers_categories_of_the_same_kind() {
        let categories = vec![
            Category {
                id: CategoryId::new("food"),
                name: "Food".to_owned(),
                kind: TransactionKind::Expense,
                color: "#ff0000".to_owned(),
            },
            Category {
                id: CategoryId::new("salary"),
                name: "Salary".to_owned(),
                kind: TransactionKind::Income,
                color: "#00ff00".to_owned(),
            },
        ];

        let choices = categories_of_kind(&categories, TransactionKind::Income);

        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].name, "Salary");
    }

    #[test]
    fn parses_sort_options() {
        assert_eq!("Amount".parse::<SortField>(), Ok(SortField::Amount));
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("size".parse::<SortField>().is_err());
    }
}

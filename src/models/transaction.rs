//! Defines the core data model for transactions.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{
    Error,
    models::{AccountId, CategoryId, TransactionId},
};

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in, e.g. a salary.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// The value used for the kind in request and response bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// The name shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(Error::InvalidChoice {
                value: s.to_owned(),
                expected: "income, expense",
            }),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are validated when they are received from the server: the
/// amount is a finite, non-negative magnitude and the date is a calendar date.
/// The direction of the money is given by `kind`, never by the sign of
/// `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction belongs to, if the reference could be
    /// resolved.
    pub category_id: Option<CategoryId>,
    /// The account the money moved in or out of.
    pub account_id: Option<AccountId>,
    /// A text description of what the transaction was for.
    pub description: String,
}

impl Transaction {
    /// The amount with income as positive and expenses as negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// The validated data needed to create or update a transaction.
///
/// Create one with [crate::validation::TransactionDraft::validate].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount of money, greater than zero.
    pub amount: f64,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// When the transaction happened.
    pub date: Date,
    /// The category, which has the same kind as the transaction.
    pub category_id: CategoryId,
    /// The account the money moved in or out of.
    pub account_id: AccountId,
    /// A text description of what the transaction was for.
    pub description: String,
}

/// Parse an ISO-8601 date or date-time string into a calendar date.
///
/// Only the leading `YYYY-MM-DD` is used, so "2024-01-31T00:00:00.000Z" is
/// read as 31 January 2024 regardless of the time or offset that follows.
///
/// # Errors
///
/// Returns an [Error::InvalidDateFormat] if the string does not start with a
/// valid date, or if the date is followed by anything other than a `T` and
/// the time.
pub fn parse_iso_date(text: &str) -> Result<Date, Error> {
    let trimmed = text.trim();
    let (date_part, time_part) = trimmed.split_at_checked(10).unwrap_or((trimmed, ""));

    if !time_part.is_empty() && !time_part.starts_with('T') {
        return Err(Error::InvalidDateFormat(
            "unexpected characters after the date".to_owned(),
            text.to_owned(),
        ));
    }

    Date::parse(date_part, format_description!("[year]-[month]-[day]"))
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), text.to_owned()))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{Transaction, TransactionKind, parse_iso_date};
    use crate::{Error, models::TransactionId};

    fn transaction(amount: f64, kind: TransactionKind) -> Transaction {
        Transaction {
            id: TransactionId::new("t1"),
            amount,
            kind,
            date: date!(2024 - 01 - 01),
            category_id: None,
            account_id: None,
            description: String::new(),
        }
    }

    #[test]
    fn signed_amount_is_negative_for_expenses() {
        assert_eq!(transaction(40.0, TransactionKind::Expense).signed_amount(), -40.0);
        assert_eq!(transaction(40.0, TransactionKind::Income).signed_amount(), 40.0);
    }

    #[test]
    fn parses_plain_dates() {
        assert_eq!(parse_iso_date("2024-01-02"), Ok(date!(2024 - 01 - 02)));
    }

    #[test]
    fn parses_date_times_by_their_date() {
        assert_eq!(
            parse_iso_date("2024-02-29T23:59:59.999Z"),
            Ok(date!(2024 - 02 - 29))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_iso_date("yesterday"),
            Err(Error::InvalidDateFormat(_, _))
        ));
        assert!(matches!(
            parse_iso_date("2023-02-29"),
            Err(Error::InvalidDateFormat(_, _))
        ));
    }

    #[test]
    fn rejects_trailing_characters_after_the_date() {
        assert!(matches!(
            parse_iso_date("2024-01-02xyz"),
            Err(Error::InvalidDateFormat(_, _))
        ));
        assert_eq!(parse_iso_date("2024-01-02 "), Ok(date!(2024 - 01 - 02)));
    }

    #[test]
    fn trims_short_input_before_parsing() {
        assert!(matches!(
            parse_iso_date("  2024-1-2 "),
            Err(Error::InvalidDateFormat(_, _))
        ));
        assert_eq!(parse_iso_date(" 2024-01-02\n"), Ok(date!(2024 - 01 - 02)));
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Income".parse(), Ok(TransactionKind::Income));
        assert_eq!("expense".parse(), Ok(TransactionKind::Expense));
        assert!("transfer".parse::<TransactionKind>().is_err());
    }
}

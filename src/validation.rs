//! Checks on user input before it is sent to the server.
//!
//! A draft holds the raw values of a form. Validating it either produces the
//! data needed to create or update a record, or an error describing the first
//! problem found.

use time::Date;

use crate::{
    Error,
    models::{
        Account, AccountId, Category, CategoryId, DEFAULT_COLOR, NewAccount, NewCategory,
        NewTransaction, TransactionKind,
    },
};

/// The special characters, one of which must appear in a new password.
pub const PASSWORD_SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// The minimum number of characters in a new password.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// The color given to new accounts when none is chosen.
pub const DEFAULT_ACCOUNT_COLOR: &str = "#3b82f6";

/// The raw values of the transaction form.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// The amount as typed, e.g. "12.50".
    pub amount: String,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// When the transaction happened.
    pub date: Date,
    /// The selected category, if any.
    pub category_id: Option<CategoryId>,
    /// The selected account, if any.
    pub account_id: Option<AccountId>,
    /// What the transaction was for.
    pub description: String,
}

impl TransactionDraft {
    /// Check the draft against the categories and accounts the user has.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::InvalidAmount] if the amount is not a finite number above zero,
    /// - [Error::MissingCategory] or [Error::MissingAccount] if either was not selected,
    /// - [Error::UnknownReference] if the selected category or account does not exist,
    /// - [Error::CategoryKindMismatch] if the category is for the other kind of transaction.
    pub fn validate(
        &self,
        categories: &[Category],
        accounts: &[Account],
    ) -> Result<NewTransaction, Error> {
        let amount = parse_amount(&self.amount)?;

        let category_id = self.category_id.as_ref().ok_or(Error::MissingCategory)?;
        let account_id = self.account_id.as_ref().ok_or(Error::MissingAccount)?;

        let category = categories
            .iter()
            .find(|category| &category.id == category_id)
            .ok_or(Error::UnknownReference("category"))?;

        if !accounts.iter().any(|account| &account.id == account_id) {
            return Err(Error::UnknownReference("account"));
        }

        if category.kind != self.kind {
            return Err(Error::CategoryKindMismatch(category.name.clone()));
        }

        Ok(NewTransaction {
            amount,
            kind: self.kind,
            date: self.date,
            category_id: category_id.clone(),
            account_id: account_id.clone(),
            description: self.description.trim().to_owned(),
        })
    }
}

fn parse_amount(text: &str) -> Result<f64, Error> {
    match text.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(Error::InvalidAmount(text.to_owned())),
    }
}

/// The raw values of the account form.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDraft {
    /// The account name.
    pub name: String,
    /// The balance as typed, may be negative for debt.
    pub balance: String,
    /// The display color, or empty for the default.
    pub color: String,
}

impl AccountDraft {
    /// Check the name is not blank and the balance is a finite number.
    pub fn validate(&self) -> Result<NewAccount, Error> {
        let name = non_empty(&self.name, "account name")?;

        let balance = if self.balance.trim().is_empty() {
            0.0
        } else {
            match self.balance.trim().parse::<f64>() {
                Ok(balance) if balance.is_finite() => balance,
                _ => return Err(Error::InvalidAmount(self.balance.clone())),
            }
        };

        Ok(NewAccount {
            name,
            balance,
            color: color_or(&self.color, DEFAULT_ACCOUNT_COLOR),
        })
    }
}

/// The raw values of the category form.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    /// The category name.
    pub name: String,
    /// Whether the category is for income or expenses.
    pub kind: TransactionKind,
    /// The display color, or empty for the default.
    pub color: String,
}

impl CategoryDraft {
    /// Check the name is not blank.
    pub fn validate(&self) -> Result<NewCategory, Error> {
        Ok(NewCategory {
            name: non_empty(&self.name, "category name")?,
            kind: self.kind,
            color: color_or(&self.color, DEFAULT_COLOR),
        })
    }
}

fn non_empty(value: &str, field: &'static str) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        Err(Error::EmptyField(field))
    } else {
        Ok(value.to_owned())
    }
}

fn color_or(color: &str, default: &str) -> String {
    let color = color.trim();

    if color.is_empty() {
        default.to_owned()
    } else {
        color.to_owned()
    }
}

/// Check that an email address was entered.
pub fn validate_email(email: &str) -> Result<String, Error> {
    non_empty(email, "email")
}

/// Which of the password requirements a password meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordRequirements {
    /// At least [PASSWORD_MIN_LENGTH] characters.
    pub length: bool,
    /// At least one lowercase ASCII letter.
    pub lowercase: bool,
    /// At least one uppercase ASCII letter.
    pub uppercase: bool,
    /// At least one ASCII digit.
    pub number: bool,
    /// At least one of [PASSWORD_SPECIAL_CHARACTERS].
    pub special: bool,
}

impl PasswordRequirements {
    /// Check `password` against each requirement.
    pub fn check(password: &str) -> Self {
        Self {
            length: password.chars().count() >= PASSWORD_MIN_LENGTH,
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            number: password.chars().any(|c| c.is_ascii_digit()),
            special: password
                .chars()
                .any(|c| PASSWORD_SPECIAL_CHARACTERS.contains(c)),
        }
    }

    /// Whether every requirement is met.
    pub fn all_met(&self) -> bool {
        self.length && self.lowercase && self.uppercase && self.number && self.special
    }

    /// Descriptions of the requirements that are not met.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (self.length, "at least 8 characters"),
            (self.lowercase, "a lowercase letter"),
            (self.uppercase, "an uppercase letter"),
            (self.number, "a number"),
            (self.special, "a special character"),
        ]
        .into_iter()
        .filter(|(met, _)| !met)
        .map(|(_, description)| description)
        .collect()
    }
}

/// Check a new password meets every requirement and matches its confirmation.
///
/// # Errors
/// Returns [Error::WeakPassword] listing the unmet requirements, or
/// [Error::PasswordMismatch] if the confirmation differs.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), Error> {
    let requirements = PasswordRequirements::check(password);

    if !requirements.all_met() {
        return Err(Error::WeakPassword(requirements.missing().join(", ")));
    }

    if password != confirmation {
        return Err(Error::PasswordMismatch);
    }

    Ok(())
}

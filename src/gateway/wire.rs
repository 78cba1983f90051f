//! Request and response bodies exchanged with the REST API.
//!
//! Records are decoded leniently and then validated into the domain types in
//! [crate::models] before they reach a store.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{
        Account, AccountId, Category, CategoryId, DEFAULT_COLOR, NewAccount, NewCategory,
        NewTransaction, Transaction, TransactionId, TransactionKind, User, UserId,
        parse_iso_date,
    },
};

/// A reference to another record.
///
/// Depending on the endpoint, the server either sends the bare ID or embeds the
/// whole referenced object. Both forms are reduced to the ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    /// The bare ID, e.g. `"category": "665f..."`.
    Id(String),
    /// The embedded object, e.g. `"category": {"_id": "665f...", "name": "Food"}`.
    Embedded {
        /// The ID of the embedded object.
        #[serde(rename = "_id", alias = "id")]
        id: String,
    },
}

impl Reference {
    /// The ID of the referenced record.
    pub fn id(&self) -> &str {
        match self {
            Reference::Id(id) => id,
            Reference::Embedded { id } => id,
        }
    }
}

/// A transaction as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// The server ID.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// The amount, expected to be a non-negative magnitude.
    pub amount: f64,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: String,
    /// An ISO-8601 date or date-time string.
    pub date: String,
    /// The category, possibly missing when it has been deleted.
    #[serde(default, alias = "categoryId")]
    pub category: Option<Reference>,
    /// The account, possibly missing when it has been deleted.
    #[serde(default, alias = "accountId")]
    pub account: Option<Reference>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = Error;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let invalid = |reason: String| Error::InvalidTransactionData {
            id: record.id.clone(),
            reason,
        };

        if !record.amount.is_finite() || record.amount < 0.0 {
            return Err(invalid(format!(
                "amount {} is not a finite, non-negative number",
                record.amount
            )));
        }

        let kind = record
            .kind
            .parse::<TransactionKind>()
            .map_err(|_| invalid(format!("unknown transaction type \"{}\"", record.kind)))?;

        let date = parse_iso_date(&record.date)
            .map_err(|_| invalid(format!("unparseable date \"{}\"", record.date)))?;

        Ok(Transaction {
            id: TransactionId::new(record.id),
            amount: record.amount,
            kind,
            date,
            category_id: record.category.map(|c| CategoryId::new(c.id())),
            account_id: record.account.map(|a| AccountId::new(a.id())),
            description: record.description.unwrap_or_default(),
        })
    }
}

/// The body of a create or update transaction request.
///
/// The server expects the references under `category` and `account`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionBody {
    /// The amount of money.
    pub amount: f64,
    /// Free-text description.
    pub description: String,
    /// The date as `YYYY-MM-DD`.
    pub date: String,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category ID.
    pub category: CategoryId,
    /// The account ID.
    pub account: AccountId,
}

impl From<&NewTransaction> for TransactionBody {
    fn from(transaction: &NewTransaction) -> Self {
        Self {
            amount: transaction.amount,
            description: transaction.description.clone(),
            date: transaction.date.to_string(),
            kind: transaction.kind,
            category: transaction.category_id.clone(),
            account: transaction.account_id.clone(),
        }
    }
}

/// A category as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// The server ID.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// The display name.
    pub name: String,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: String,
    /// The display color.
    #[serde(default)]
    pub color: Option<String>,
}

impl TryFrom<CategoryRecord> for Category {
    type Error = Error;

    fn try_from(record: CategoryRecord) -> Result<Self, Self::Error> {
        let kind = record
            .kind
            .parse::<TransactionKind>()
            .map_err(|_| Error::InvalidRecord {
                id: record.id.clone(),
                reason: format!("unknown category type \"{}\"", record.kind),
            })?;

        Ok(Category {
            id: CategoryId::new(record.id),
            name: record.name,
            kind,
            color: record.color.unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
        })
    }
}

/// The body of a create or update category request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBody {
    /// The display name.
    pub name: String,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The display color.
    pub color: String,
}

impl From<&NewCategory> for CategoryBody {
    fn from(category: &NewCategory) -> Self {
        Self {
            name: category.name.clone(),
            kind: category.kind,
            color: category.color.clone(),
        }
    }
}

/// An account as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// The server ID.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// The display name.
    pub name: String,
    /// The balance, treated as zero when missing.
    #[serde(default)]
    pub balance: Option<f64>,
    /// The display color.
    #[serde(default)]
    pub color: Option<String>,
}

impl TryFrom<AccountRecord> for Account {
    type Error = Error;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        let balance = record.balance.unwrap_or(0.0);

        if !balance.is_finite() {
            return Err(Error::InvalidRecord {
                id: record.id,
                reason: format!("balance {balance} is not a finite number"),
            });
        }

        Ok(Account {
            id: AccountId::new(record.id),
            name: record.name,
            balance,
            color: record.color.unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
        })
    }
}

/// The body of a create or update account request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountBody {
    /// The display name.
    pub name: String,
    /// The balance.
    pub balance: f64,
    /// The display color.
    pub color: String,
}

impl From<&NewAccount> for AccountBody {
    fn from(account: &NewAccount) -> Self {
        Self {
            name: account.name.clone(),
            balance: account.balance,
            color: account.color.clone(),
        }
    }
}

/// A user as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// The server ID.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// The display name.
    #[serde(default)]
    pub name: String,
    /// The login email.
    #[serde(default)]
    pub email: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: UserId::new(record.id),
            name: record.name,
            email: record.email,
        }
    }
}

/// The body of a login request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    /// The login email.
    pub email: String,
    /// The plain-text password, sent over TLS.
    pub password: String,
}

/// The response to a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer token to attach to later requests.
    pub token: String,
    /// The logged-in user.
    #[serde(default)]
    pub user: Option<UserRecord>,
}

/// The body of a forgot-password request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForgotPasswordBody {
    /// The email to send the reset link to.
    pub email: String,
}

/// The body of a reset-password request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetPasswordBody {
    /// The new password.
    pub password: String,
}

/// The JSON error body returned by the server, e.g. `{"message": "Invalid token"}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

/// Extract the human-readable message from an error response body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
}

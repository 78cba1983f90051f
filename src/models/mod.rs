//! This module defines the domain data types.

pub use account::{Account, NewAccount};
pub use category::{Category, DEFAULT_COLOR, NewCategory};
pub use id::{AccountId, CategoryId, TransactionId, UserId};
pub use summary::FinancialSummary;
pub use transaction::{NewTransaction, Transaction, TransactionKind, parse_iso_date};
pub use user::User;

mod account;
mod category;
mod id;
mod summary;
mod transaction;
mod user;

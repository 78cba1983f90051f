use serde::{Deserialize, Serialize};

use crate::models::AccountId;

/// The amount of money available in a bank account, wallet or credit card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The name of the account.
    pub name: String,
    /// The balance, negative for debt.
    pub balance: f64,
    /// The display color as a CSS color string.
    pub color: String,
}

/// The validated data needed to create or update an account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The name of the account, non-empty.
    pub name: String,
    /// The opening or corrected balance.
    pub balance: f64,
    /// The display color as a CSS color string.
    pub color: String,
}

//! This file defines the `Category` type and the types needed to create a category.
//! A category groups transactions of one kind, e.g. 'Groceries' for expenses or
//! 'Salary' for income.

use serde::{Deserialize, Serialize};

use crate::models::{CategoryId, TransactionKind};

/// The color used for a category or account when none is set.
pub const DEFAULT_COLOR: &str = "#888888";

/// A category for grouping transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name, e.g. 'Groceries'.
    pub name: String,
    /// Which kind of transaction the category may be used for.
    pub kind: TransactionKind,
    /// The display color as a CSS color string.
    pub color: String,
}

/// The validated data needed to create or update a category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The display name, non-empty.
    pub name: String,
    /// Which kind of transaction the category may be used for.
    pub kind: TransactionKind,
    /// The display color as a CSS color string.
    pub color: String,
}

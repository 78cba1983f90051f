//! The remote data gateway: everything that talks to the REST API.
//!
//! [FinanceApi] is the seam between the stores and the network. [ApiClient]
//! implements it over HTTP; tests implement it in memory.

mod client;
pub mod wire;

pub use client::ApiClient;

use crate::{
    Error,
    models::{AccountId, CategoryId, FinancialSummary, NewAccount, NewCategory, NewTransaction, TransactionId},
};
use wire::{AccountRecord, CategoryRecord, Credentials, LoginResponse, TransactionRecord};

/// The operations the REST API offers.
///
/// Implementations attach the bearer token set with [FinanceApi::set_token] to
/// every request and classify failures into the HTTP variants of [Error].
#[allow(async_fn_in_trait)]
pub trait FinanceApi {
    /// The bearer token attached to requests, if any.
    fn token(&self) -> Option<&str>;

    /// Set or clear the bearer token.
    fn set_token(&mut self, token: Option<String>);

    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, Error>;

    /// Ask the server to email a password reset link.
    async fn forgot_password(&self, email: &str) -> Result<(), Error>;

    /// Set a new password using the token from a reset link.
    async fn reset_password(&self, reset_token: &str, password: &str) -> Result<(), Error>;

    /// Get all of the user's accounts.
    async fn fetch_accounts(&self) -> Result<Vec<AccountRecord>, Error>;

    /// Create an account and return the server's copy.
    async fn create_account(&self, account: &NewAccount) -> Result<AccountRecord, Error>;

    /// Replace an account and return the server's copy.
    async fn update_account(
        &self,
        id: &AccountId,
        account: &NewAccount,
    ) -> Result<AccountRecord, Error>;

    /// Delete an account.
    async fn delete_account(&self, id: &AccountId) -> Result<(), Error>;

    /// Get all of the user's categories.
    async fn fetch_categories(&self) -> Result<Vec<CategoryRecord>, Error>;

    /// Create a category and return the server's copy.
    async fn create_category(&self, category: &NewCategory) -> Result<CategoryRecord, Error>;

    /// Replace a category and return the server's copy.
    async fn update_category(
        &self,
        id: &CategoryId,
        category: &NewCategory,
    ) -> Result<CategoryRecord, Error>;

    /// Delete a category.
    ///
    /// The server rejects deleting a category that transactions still refer to.
    async fn delete_category(&self, id: &CategoryId) -> Result<(), Error>;

    /// Get all of the user's transactions.
    async fn fetch_transactions(&self) -> Result<Vec<TransactionRecord>, Error>;

    /// Create a transaction and return the server's copy.
    async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<TransactionRecord, Error>;

    /// Replace a transaction and return the server's copy.
    async fn update_transaction(
        &self,
        id: &TransactionId,
        transaction: &NewTransaction,
    ) -> Result<TransactionRecord, Error>;

    /// Delete a transaction.
    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), Error>;

    /// Get the server-computed income/expense totals.
    async fn fetch_financial_summary(&self) -> Result<FinancialSummary, Error>;
}

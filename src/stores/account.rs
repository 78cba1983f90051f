//! The user's bank accounts, wallets and credit cards.

use crate::{
    Error, FinanceApi,
    models::{Account, AccountId, NewAccount},
    stores::RequestStatus,
};

/// The accounts collection and the sum of their balances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountStore {
    accounts: Vec<Account>,
    total_balance: f64,
    status: RequestStatus,
}

impl AccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding accounts restored from a previous session.
    pub fn from_accounts(accounts: Vec<Account>) -> Self {
        Self {
            total_balance: sum_balances(&accounts),
            accounts,
            status: RequestStatus::Idle,
        }
    }

    /// The accounts, in the order the server sent them.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// The sum of every account's balance.
    pub fn total_balance(&self) -> f64 {
        self.total_balance
    }

    /// The status of the latest request.
    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// Look up an account by ID.
    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| &account.id == id)
    }

    /// Replace the collection with the server's.
    pub async fn fetch(&mut self, api: &impl FinanceApi) -> Result<(), Error> {
        self.status.begin();

        let result = api.fetch_accounts().await.and_then(|records| {
            records
                .into_iter()
                .map(Account::try_from)
                .collect::<Result<Vec<_>, _>>()
        });
        let accounts = self.status.settle(result, "Failed to fetch accounts")?;

        tracing::info!("Fetched {} accounts", accounts.len());
        self.total_balance = sum_balances(&accounts);
        self.accounts = accounts;

        Ok(())
    }

    /// Create an account and add the server's copy to the collection.
    pub async fn create(
        &mut self,
        api: &impl FinanceApi,
        account: &NewAccount,
    ) -> Result<Account, Error> {
        self.status.begin();

        let result = api
            .create_account(account)
            .await
            .and_then(Account::try_from);
        let created = self.status.settle(result, "Failed to create account")?;

        tracing::info!("Created account {}", created.id);
        self.total_balance += created.balance;
        self.accounts.push(created.clone());

        Ok(created)
    }

    /// Update an account and replace the local copy with the server's.
    pub async fn update(
        &mut self,
        api: &impl FinanceApi,
        id: &AccountId,
        account: &NewAccount,
    ) -> Result<Account, Error> {
        self.status.begin();

        let result = api
            .update_account(id, account)
            .await
            .and_then(Account::try_from);
        let updated = self.status.settle(result, "Failed to update account")?;

        tracing::info!("Updated account {}", updated.id);
        if let Some(existing) = self
            .accounts
            .iter_mut()
            .find(|existing| existing.id == updated.id)
        {
            self.total_balance = self.total_balance - existing.balance + updated.balance;
            *existing = updated.clone();
        }

        Ok(updated)
    }

    /// Delete an account and remove it from the collection.
    pub async fn delete(&mut self, api: &impl FinanceApi, id: &AccountId) -> Result<(), Error> {
        self.status.begin();

        let result = api.delete_account(id).await;
        self.status.settle(result, "Failed to delete account")?;

        tracing::info!("Deleted account {id}");
        if let Some(index) = self.accounts.iter().position(|account| &account.id == id) {
            let removed = self.accounts.remove(index);
            self.total_balance -= removed.balance;
        }

        Ok(())
    }

    /// Set an account's balance locally, e.g. after a transaction is recorded,
    /// without contacting the server.
    ///
    /// Returns `false` if there is no account with the ID.
    pub fn update_account_balance(&mut self, id: &AccountId, new_balance: f64) -> bool {
        let Some(account) = self.accounts.iter_mut().find(|account| &account.id == id) else {
            return false;
        };

        self.total_balance = self.total_balance - account.balance + new_balance;
        account.balance = new_balance;

        true
    }

    /// Forget the latest error.
    pub fn clear_error(&mut self) {
        self.status.clear_error();
    }

    /// Empty the store, e.g. on logout.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn sum_balances(accounts: &[Account]) -> f64 {
    accounts.iter().map(|account| account.balance).sum()
}

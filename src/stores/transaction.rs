//! The user's transactions and the server's totals over them.

use crate::{
    Error, FinanceApi,
    models::{FinancialSummary, NewTransaction, Transaction, TransactionId},
    stores::RequestStatus,
};

/// The transactions collection and the financial summary.
///
/// The summary has its own status so that a failed summary request does not
/// hide the transactions, and vice versa.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    status: RequestStatus,
    summary: FinancialSummary,
    summary_status: RequestStatus,
}

impl TransactionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The transactions, in the order the server sent them.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The status of the latest transaction request.
    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// The latest summary from the server, all zeros until fetched.
    pub fn summary(&self) -> FinancialSummary {
        self.summary
    }

    /// The status of the latest summary request.
    pub fn summary_status(&self) -> &RequestStatus {
        &self.summary_status
    }

    /// Look up a transaction by ID.
    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| &transaction.id == id)
    }

    /// Replace the collection with the server's.
    ///
    /// Fails with [Error::InvalidTransactionData] if any record is malformed,
    /// leaving the previous collection in place.
    pub async fn fetch(&mut self, api: &impl FinanceApi) -> Result<(), Error> {
        self.status.begin();

        let result = api.fetch_transactions().await.and_then(|records| {
            records
                .into_iter()
                .map(Transaction::try_from)
                .collect::<Result<Vec<_>, _>>()
        });
        self.transactions = self.status.settle(result, "Failed to fetch transactions")?;

        tracing::info!("Fetched {} transactions", self.transactions.len());
        Ok(())
    }

    /// Create a transaction and add the server's copy to the collection.
    pub async fn create(
        &mut self,
        api: &impl FinanceApi,
        transaction: &NewTransaction,
    ) -> Result<Transaction, Error> {
        self.status.begin();

        let result = api
            .create_transaction(transaction)
            .await
            .and_then(Transaction::try_from);
        let created = self.status.settle(result, "Failed to create transaction")?;

        tracing::info!("Created transaction {}", created.id);
        self.transactions.push(created.clone());

        Ok(created)
    }

    /// Update a transaction and replace the local copy with the server's.
    pub async fn update(
        &mut self,
        api: &impl FinanceApi,
        id: &TransactionId,
        transaction: &NewTransaction,
    ) -> Result<Transaction, Error> {
        self.status.begin();

        let result = api
            .update_transaction(id, transaction)
            .await
            .and_then(Transaction::try_from);
        let updated = self.status.settle(result, "Failed to update transaction")?;

        tracing::info!("Updated transaction {}", updated.id);
        if let Some(existing) = self
            .transactions
            .iter_mut()
            .find(|existing| existing.id == updated.id)
        {
            *existing = updated.clone();
        }

        Ok(updated)
    }

    /// Delete a transaction and remove it from the collection.
    pub async fn delete(&mut self, api: &impl FinanceApi, id: &TransactionId) -> Result<(), Error> {
        self.status.begin();

        let result = api.delete_transaction(id).await;
        self.status.settle(result, "Failed to delete transaction")?;

        tracing::info!("Deleted transaction {id}");
        self.transactions.retain(|transaction| &transaction.id != id);

        Ok(())
    }

    /// Get the income/expense totals computed by the server.
    pub async fn fetch_summary(&mut self, api: &impl FinanceApi) -> Result<FinancialSummary, Error> {
        self.summary_status.begin();

        let result = api.fetch_financial_summary().await;
        self.summary = self
            .summary_status
            .settle(result, "Failed to fetch financial summary")?;

        tracing::debug!("Fetched financial summary: {:?}", self.summary);
        Ok(self.summary)
    }

    /// Forget the latest errors of both the transactions and the summary.
    pub fn clear_error(&mut self) {
        self.status.clear_error();
        self.summary_status.clear_error();
    }

    /// Empty the store, e.g. on logout.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

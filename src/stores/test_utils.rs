//! An in-memory [FinanceApi] for store and app state tests.

use std::cell::{Cell, RefCell};

use crate::{
    Error, FinanceApi,
    gateway::wire::{
        AccountRecord, CategoryRecord, Credentials, LoginResponse, Reference, TransactionBody,
        TransactionRecord, UserRecord,
    },
    models::{
        AccountId, CategoryId, FinancialSummary, NewAccount, NewCategory, NewTransaction,
        TransactionId,
    },
};

pub(crate) const TEST_EMAIL: &str = "jane@example.com";
pub(crate) const TEST_PASSWORD: &str = "Sup3r$ecret";
pub(crate) const TEST_TOKEN: &str = "test-token";

/// Serves records from memory and checks the bearer token like the real API.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    pub token: Option<String>,
    pub accounts: RefCell<Vec<AccountRecord>>,
    pub categories: RefCell<Vec<CategoryRecord>>,
    pub transactions: RefCell<Vec<TransactionRecord>>,
    pub summary: FinancialSummary,
    /// When set, every request fails with this status and message. Status 0
    /// is a network failure.
    pub failure: RefCell<Option<(u16, Option<String>)>>,
    pub reset_passwords: RefCell<Vec<(String, String)>>,
    pub next_id: Cell<u32>,
}

impl FakeApi {
    /// A fake that accepts [TEST_TOKEN].
    pub fn logged_in() -> Self {
        Self {
            token: Some(TEST_TOKEN.to_owned()),
            ..Default::default()
        }
    }

    pub fn fail_with(&self, status: u16, message: Option<&str>) {
        *self.failure.borrow_mut() = Some((status, message.map(str::to_owned)));
    }

    pub fn succeed(&self) {
        *self.failure.borrow_mut() = None;
    }

    pub fn account(id: &str, name: &str, balance: f64) -> AccountRecord {
        AccountRecord {
            id: id.to_owned(),
            name: name.to_owned(),
            balance: Some(balance),
            color: None,
        }
    }

    pub fn category(id: &str, name: &str, kind: &str) -> CategoryRecord {
        CategoryRecord {
            id: id.to_owned(),
            name: name.to_owned(),
            kind: kind.to_owned(),
            color: None,
        }
    }

    pub fn transaction(
        id: &str,
        amount: f64,
        kind: &str,
        date: &str,
        category: Option<&str>,
    ) -> TransactionRecord {
        TransactionRecord {
            id: id.to_owned(),
            amount,
            kind: kind.to_owned(),
            date: date.to_owned(),
            category: category.map(|id| Reference::Id(id.to_owned())),
            account: None,
            description: Some(format!("Transaction {id}")),
        }
    }

    fn check(&self) -> Result<(), Error> {
        if let Some((status, message)) = self.failure.borrow().clone() {
            return Err(match status {
                0 => Error::Network("connection refused".to_owned()),
                status => Error::from_status(status, message),
            });
        }

        Ok(())
    }

    fn authorize(&self) -> Result<(), Error> {
        self.check()?;

        match self.token.as_deref() {
            Some(TEST_TOKEN) => Ok(()),
            _ => Err(Error::Unauthorized(Some("Not authorized, no token".to_owned()))),
        }
    }

    fn new_id(&self, prefix: &str) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("{prefix}-new-{id}")
    }

    fn not_found(what: &str) -> Error {
        Error::NotFound(Some(format!("{what} not found")))
    }
}

impl FinanceApi for FakeApi {
    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, Error> {
        self.check()?;

        if credentials.email != TEST_EMAIL || credentials.password != TEST_PASSWORD {
            return Err(Error::Unauthorized(Some(
                "Invalid email or password".to_owned(),
            )));
        }

        Ok(LoginResponse {
            token: TEST_TOKEN.to_owned(),
            user: Some(UserRecord {
                id: "u1".to_owned(),
                name: "Jane Doe".to_owned(),
                email: TEST_EMAIL.to_owned(),
            }),
        })
    }

    async fn forgot_password(&self, email: &str) -> Result<(), Error> {
        self.check()?;

        if email == TEST_EMAIL {
            Ok(())
        } else {
            Err(Self::not_found("User"))
        }
    }

    async fn reset_password(&self, reset_token: &str, password: &str) -> Result<(), Error> {
        self.check()?;

        if reset_token == "expired" {
            return Err(Error::HttpStatus {
                status: 400,
                message: Some("Reset token is invalid or has expired".to_owned()),
            });
        }

        self.reset_passwords
            .borrow_mut()
            .push((reset_token.to_owned(), password.to_owned()));
        Ok(())
    }

    async fn fetch_accounts(&self) -> Result<Vec<AccountRecord>, Error> {
        self.authorize()?;
        Ok(self.accounts.borrow().clone())
    }

    async fn create_account(&self, account: &NewAccount) -> Result<AccountRecord, Error> {
        self.authorize()?;

        let record = AccountRecord {
            id: self.new_id("account"),
            name: account.name.clone(),
            balance: Some(account.balance),
            color: Some(account.color.clone()),
        };
        self.accounts.borrow_mut().push(record.clone());

        Ok(record)
    }

    async fn update_account(
        &self,
        id: &AccountId,
        account: &NewAccount,
    ) -> Result<AccountRecord, Error> {
        self.authorize()?;

        let mut accounts = self.accounts.borrow_mut();
        let record = accounts
            .iter_mut()
            .find(|record| record.id == id.as_str())
            .ok_or_else(|| Self::not_found("Account"))?;

        record.name = account.name.clone();
        record.balance = Some(account.balance);
        record.color = Some(account.color.clone());

        Ok(record.clone())
    }

    async fn delete_account(&self, id: &AccountId) -> Result<(), Error> {
        self.authorize()?;

        let mut accounts = self.accounts.borrow_mut();
        let before = accounts.len();
        accounts.retain(|record| record.id != id.as_str());

        if accounts.len() == before {
            Err(Self::not_found("Account"))
        } else {
            Ok(())
        }
    }

    async fn fetch_categories(&self) -> Result<Vec<CategoryRecord>, Error> {
        self.authorize()?;
        Ok(self.categories.borrow().clone())
    }

    async fn create_category(&self, category: &NewCategory) -> Result<CategoryRecord, Error> {
        self.authorize()?;

        let record = CategoryRecord {
            id: self.new_id("category"),
            name: category.name.clone(),
            kind: category.kind.as_str().to_owned(),
            color: Some(category.color.clone()),
        };
        self.categories.borrow_mut().push(record.clone());

        Ok(record)
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        category: &NewCategory,
    ) -> Result<CategoryRecord, Error> {
        self.authorize()?;

        let mut categories = self.categories.borrow_mut();
        let record = categories
            .iter_mut()
            .find(|record| record.id == id.as_str())
            .ok_or_else(|| Self::not_found("Category"))?;

        record.name = category.name.clone();
        record.kind = category.kind.as_str().to_owned();
        record.color = Some(category.color.clone());

        Ok(record.clone())
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), Error> {
        self.authorize()?;

        let in_use = self.transactions.borrow().iter().any(|transaction| {
            transaction
                .category
                .as_ref()
                .is_some_and(|category| category.id() == id.as_str())
        });

        if in_use {
            return Err(Error::HttpStatus {
                status: 400,
                message: Some("Category is used by existing transactions".to_owned()),
            });
        }

        let mut categories = self.categories.borrow_mut();
        let before = categories.len();
        categories.retain(|record| record.id != id.as_str());

        if categories.len() == before {
            Err(Self::not_found("Category"))
        } else {
            Ok(())
        }
    }

    async fn fetch_transactions(&self) -> Result<Vec<TransactionRecord>, Error> {
        self.authorize()?;
        Ok(self.transactions.borrow().clone())
    }

    async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<TransactionRecord, Error> {
        self.authorize()?;

        let record = record_from_body(self.new_id("transaction"), transaction);
        self.transactions.borrow_mut().push(record.clone());

        Ok(record)
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        transaction: &NewTransaction,
    ) -> Result<TransactionRecord, Error> {
        self.authorize()?;

        let mut transactions = self.transactions.borrow_mut();
        let record = transactions
            .iter_mut()
            .find(|record| record.id == id.as_str())
            .ok_or_else(|| Self::not_found("Transaction"))?;

        *record = record_from_body(id.to_string(), transaction);

        Ok(record.clone())
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), Error> {
        self.authorize()?;

        let mut transactions = self.transactions.borrow_mut();
        let before = transactions.len();
        transactions.retain(|record| record.id != id.as_str());

        if transactions.len() == before {
            Err(Self::not_found("Transaction"))
        } else {
            Ok(())
        }
    }

    async fn fetch_financial_summary(&self) -> Result<FinancialSummary, Error> {
        self.authorize()?;
        Ok(self.summary)
    }
}

/// The record the server would store for `transaction`, with the category
/// embedded the way the real server populates it.
fn record_from_body(id: String, transaction: &NewTransaction) -> TransactionRecord {
    let body = TransactionBody::from(transaction);

    TransactionRecord {
        id,
        amount: body.amount,
        kind: body.kind.as_str().to_owned(),
        date: format!("{}T00:00:00.000Z", body.date),
        category: Some(Reference::Embedded {
            id: body.category.to_string(),
        }),
        account: Some(Reference::Id(body.account.to_string())),
        description: Some(body.description),
    }
}

//! Implements a struct that holds the state of the client.

use crate::{
    ApiClient, Error, FinanceApi, SessionStore,
    aggregation::compute_financial_summary,
    gateway::wire::Credentials,
    models::FinancialSummary,
    notice::Notice,
    stores::{AccountStore, AuthStore, CategoryStore, RequestStatus, TransactionStore},
};

/// The state of the client: the API it talks to, one store per record type,
/// and the notices waiting to be shown.
///
/// The state is owned by the caller and passed explicitly to whatever needs it.
#[derive(Debug)]
pub struct AppState<A: FinanceApi = ApiClient> {
    /// The REST API.
    pub api: A,
    /// The login.
    pub auth: AuthStore,
    /// The user's accounts.
    pub accounts: AccountStore,
    /// The user's categories.
    pub categories: CategoryStore,
    /// The user's transactions and the server's summary of them.
    pub transactions: TransactionStore,
    notices: Vec<Notice>,
}

impl<A: FinanceApi> AppState<A> {
    /// Create a logged-out state with empty stores.
    pub fn new(api: A) -> Self {
        Self {
            api,
            auth: AuthStore::new(),
            accounts: AccountStore::new(),
            categories: CategoryStore::new(),
            transactions: TransactionStore::new(),
            notices: Vec::new(),
        }
    }

    /// Create a state with the login and accounts saved in `session`.
    ///
    /// # Errors
    /// Returns an error if the session file cannot be read.
    pub fn restore(mut api: A, session: &SessionStore) -> Result<Self, Error> {
        let auth = match session.load_auth()? {
            Some(saved) => {
                tracing::debug!("Restored login from session");
                api.set_token(Some(saved.token.clone()));
                AuthStore::from_saved(saved)
            }
            None => AuthStore::new(),
        };

        let accounts = AccountStore::from_accounts(session.load_accounts()?);

        Ok(Self {
            auth,
            accounts,
            ..Self::new(api)
        })
    }

    /// Save the login and accounts to `session` for the next run.
    pub fn persist(&self, session: &SessionStore) -> Result<(), Error> {
        session.save_auth(self.auth.to_saved().as_ref())?;
        session.save_accounts(self.accounts.accounts())
    }

    /// Fail with [Error::NotLoggedIn] unless a bearer token is held.
    pub fn require_login(&self) -> Result<(), Error> {
        if self.auth.is_logged_in() {
            Ok(())
        } else {
            Err(Error::NotLoggedIn)
        }
    }

    /// Log in and queue a notice with the outcome.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), Error> {
        let result = self.auth.login(&mut self.api, credentials).await;

        let welcome = match self.auth.user() {
            Some(user) => format!("Welcome back, {}.", user.name),
            None => "Welcome back.".to_owned(),
        };

        self.report(result, Notice::success("Logged In", welcome), "Login failed")
    }

    /// Log out and empty every store.
    pub fn logout(&mut self) {
        self.auth.logout(&mut self.api);
        self.accounts.reset();
        self.categories.reset();
        self.transactions.reset();
    }

    /// Fetch everything the dashboard shows.
    ///
    /// The server summary is optional: if it cannot be fetched,
    /// [AppState::financial_summary] falls back to totals computed from the
    /// transactions.
    pub async fn load_dashboard(&mut self) -> Result<(), Error> {
        self.require_login()?;

        let result = self.accounts.fetch(&self.api).await;
        self.report_failure(result, "Failed to fetch accounts")?;

        let result = self.categories.fetch(&self.api).await;
        self.report_failure(result, "Failed to fetch categories")?;

        let result = self.transactions.fetch(&self.api).await;
        self.report_failure(result, "Failed to fetch transactions")?;

        if let Err(error) = self.transactions.fetch_summary(&self.api).await {
            tracing::warn!("Using locally computed summary: {error}");
            if error.is_unauthorized() {
                self.report_failure::<()>(Err(error), "Failed to fetch financial summary")?;
            }
        }

        Ok(())
    }

    /// The server's summary if the latest request for it succeeded, otherwise
    /// totals computed from the local transactions.
    pub fn financial_summary(&self) -> FinancialSummary {
        match self.transactions.summary_status() {
            RequestStatus::Succeeded => self.transactions.summary(),
            _ => compute_financial_summary(self.transactions.transactions()),
        }
    }

    /// Queue `success` if `result` is `Ok`, otherwise queue an error notice.
    ///
    /// See [AppState::report_failure] for how errors are handled.
    pub fn report<T>(
        &mut self,
        result: Result<T, Error>,
        success: Notice,
        fallback: &str,
    ) -> Result<T, Error> {
        if result.is_ok() {
            self.notices.push(success);
        }

        self.report_failure(result, fallback)
    }

    /// Queue an error notice if `result` is an error, and pass it on.
    ///
    /// An [Error::Unauthorized] means the token is no longer valid, so the
    /// user is logged out and every store is emptied.
    pub fn report_failure<T>(&mut self, result: Result<T, Error>, fallback: &str) -> Result<T, Error> {
        if let Err(error) = &result {
            if error.is_unauthorized() && self.auth.is_logged_in() {
                tracing::warn!("Unauthorized access - please login again");
                self.logout();
            }

            self.notices
                .push(Notice::error("Error", error.user_message(fallback)));
        }

        result
    }

    /// Queue a notice.
    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// The queued notices, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Remove and return the queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

//! The login state: the bearer token and the logged-in user.

use crate::{
    Error, FinanceApi,
    gateway::wire::Credentials,
    models::User,
    session::SavedAuth,
    stores::RequestStatus,
};

/// Holds the bearer token and keeps the API client's token in step with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthStore {
    token: Option<String>,
    user: Option<User>,
    status: RequestStatus,
}

impl AuthStore {
    /// Create a logged-out store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a login saved in a previous session.
    pub fn from_saved(saved: SavedAuth) -> Self {
        Self {
            token: Some(saved.token),
            user: saved.user,
            status: RequestStatus::Idle,
        }
    }

    /// The login to save for the next session, if logged in.
    pub fn to_saved(&self) -> Option<SavedAuth> {
        self.token.as_ref().map(|token| SavedAuth {
            token: token.clone(),
            user: self.user.clone(),
        })
    }

    /// The bearer token, if logged in.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The logged-in user, if the server reported one.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether a bearer token is held.
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// The status of the latest request.
    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// Exchange the credentials for a bearer token and attach it to `api`.
    pub async fn login(
        &mut self,
        api: &mut impl FinanceApi,
        credentials: &Credentials,
    ) -> Result<(), Error> {
        self.status.begin();

        let result = api.login(credentials).await;
        let response = self.status.settle(result, "Login failed")?;

        self.user = response.user.map(User::from);
        api.set_token(Some(response.token.clone()));
        self.token = Some(response.token);

        match &self.user {
            Some(user) => tracing::info!("Logged in as {}", user.email),
            None => tracing::info!("Logged in"),
        }

        Ok(())
    }

    /// Forget the token, locally and on `api`.
    pub fn logout(&mut self, api: &mut impl FinanceApi) {
        tracing::info!("Logging out");
        api.set_token(None);
        *self = Self::default();
    }

    /// Ask the server to email a password reset link to `email`.
    pub async fn forgot_password(
        &mut self,
        api: &impl FinanceApi,
        email: &str,
    ) -> Result<(), Error> {
        self.status.begin();

        let result = api.forgot_password(email).await;
        self.status
            .settle(result, "Failed to send password reset email")
    }

    /// Set a new password with the token from a reset link.
    ///
    /// The password should already have been checked with
    /// [crate::validation::validate_new_password].
    pub async fn reset_password(
        &mut self,
        api: &impl FinanceApi,
        reset_token: &str,
        password: &str,
    ) -> Result<(), Error> {
        self.status.begin();

        let result = api.reset_password(reset_token, password).await;
        self.status.settle(result, "Failed to reset password")
    }

    /// Forget the latest error.
    pub fn clear_error(&mut self) {
        self.status.clear_error();
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error, FinanceApi,
        gateway::wire::Credentials,
        stores::test_utils::{FakeApi, TEST_EMAIL, TEST_PASSWORD, TEST_TOKEN},
    };

    use super::AuthStore;

    fn credentials(password: &str) -> Credentials {
        Credentials {
            email: TEST_EMAIL.to_owned(),
            password: password.to_owned(),
        }
    }

    #[tokio::test]
    async fn login_stores_token_and_attaches_it() {
        let mut api = FakeApi::default();
        let mut store = AuthStore::new();

        store
            .login(&mut api, &credentials(TEST_PASSWORD))
            .await
            .unwrap();

        assert!(store.is_logged_in());
        assert_eq!(store.token(), Some(TEST_TOKEN));
        assert_eq!(api.token(), Some(TEST_TOKEN));
        assert_eq!(store.user().map(|u| u.name.as_str()), Some("Jane Doe"));
        assert_eq!(
            store.to_saved().map(|saved| saved.token),
            Some(TEST_TOKEN.to_owned())
        );
    }

    #[tokio::test]
    async fn wrong_password_reports_server_message() {
        let mut api = FakeApi::default();
        let mut store = AuthStore::new();

        let result = store.login(&mut api, &credentials("wrong")).await;

        assert!(matches!(result, Err(Error::Unauthorized(_))));
        assert!(!store.is_logged_in());
        assert_eq!(api.token(), None);
        assert_eq!(store.status().error(), Some("Invalid email or password"));
    }

    #[tokio::test]
    async fn logout_clears_token_everywhere() {
        let mut api = FakeApi::default();
        let mut store = AuthStore::new();
        store
            .login(&mut api, &credentials(TEST_PASSWORD))
            .await
            .unwrap();

        store.logout(&mut api);

        assert!(!store.is_logged_in());
        assert!(store.user().is_none());
        assert_eq!(api.token(), None);
        assert_eq!(store.to_saved(), None);
    }

    #[tokio::test]
    async fn password_reset_flow() {
        let api = FakeApi::default();
        let mut store = AuthStore::new();

        store.forgot_password(&api, TEST_EMAIL).await.unwrap();
        store
            .reset_password(&api, "reset-123", "N3w$ecret")
            .await
            .unwrap();
        assert_eq!(
            api.reset_passwords.borrow().as_slice(),
            [("reset-123".to_owned(), "N3w$ecret".to_owned())]
        );

        let result = store.reset_password(&api, "expired", "N3w$ecret").await;
        assert!(result.is_err());
        assert_eq!(
            store.status().error(),
            Some("Reset token is invalid or has expired")
        );
    }
}

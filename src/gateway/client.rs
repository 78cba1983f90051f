//! The HTTP implementation of [FinanceApi].

use reqwest::{
    Client, Method, Url,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Error,
    gateway::{
        FinanceApi,
        wire::{
            AccountBody, AccountRecord, CategoryBody, CategoryRecord, Credentials,
            ForgotPasswordBody, LoginResponse, ResetPasswordBody, TransactionBody,
            TransactionRecord, error_message,
        },
    },
    logging::{RESET_PASSWORD_SEGMENT, log_request, log_response},
    models::{
        AccountId, CategoryId, FinancialSummary, NewAccount, NewCategory, NewTransaction,
        TransactionId,
    },
};

/// A client for the REST API.
///
/// All requests are resolved against `base_url` and carry the bearer token,
/// when one is set.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the API served at `base_url`, e.g.
    /// "https://finance.example.com".
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidBaseUrl] if `base_url` is not an absolute
    /// HTTP(S) URL, or [Error::RequestSetup] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let base_url = parse_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|error| Error::RequestSetup(error.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Set the bearer token, e.g. one restored from a previous session.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// The URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The URL for `segments` under the base URL. Each segment is
    /// percent-encoded, so IDs and tokens cannot change the path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        if let Some(segment) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(Error::RequestSetup(format!(
                "invalid path segment \"{segment}\""
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Send a request and return the body of a successful response.
    async fn send(
        &self,
        method: Method,
        path: &[&str],
        body: Option<serde_json::Value>,
    ) -> Result<String, Error> {
        let url = self.endpoint(path)?;
        let mut request = self.http.request(method.clone(), url.clone());

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let body_text = match body {
            Some(body) => {
                let text = body.to_string();
                request = request.body(text.clone());
                text
            }
            None => String::new(),
        };

        log_request(&method, &url, &body_text);
        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;
        log_response(status, &url, &response_text);

        if status.is_success() {
            Ok(response_text)
        } else {
            Err(classify_failure(status.as_u16(), &response_text))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, Error> {
        let text = self.send(Method::GET, path, None).await?;
        decode(&text)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let body = serde_json::to_value(body)?;
        let text = self.send(method, path, Some(body)).await?;
        decode(&text)
    }

    async fn send_ignoring_body<B: Serialize>(
        &self,
        method: Method,
        path: &[&str],
        body: Option<&B>,
    ) -> Result<(), Error> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.send(method, path, body).await.map(|_| ())
    }
}

impl FinanceApi for ApiClient {
    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, Error> {
        self.send_json(Method::POST, &["api", "auth", "login"], credentials)
            .await
    }

    async fn forgot_password(&self, email: &str) -> Result<(), Error> {
        let body = ForgotPasswordBody {
            email: email.to_owned(),
        };
        self.send_ignoring_body(Method::POST, &["api", "auth", "forgot-password"], Some(&body))
            .await
    }

    async fn reset_password(&self, reset_token: &str, password: &str) -> Result<(), Error> {
        let body = ResetPasswordBody {
            password: password.to_owned(),
        };
        self.send_ignoring_body(
            Method::POST,
            &["api", "auth", RESET_PASSWORD_SEGMENT, reset_token],
            Some(&body),
        )
        .await
    }

    async fn fetch_accounts(&self) -> Result<Vec<AccountRecord>, Error> {
        self.get_json(&["api", "accounts"]).await
    }

    async fn create_account(&self, account: &NewAccount) -> Result<AccountRecord, Error> {
        self.send_json(Method::POST, &["api", "accounts"], &AccountBody::from(account))
            .await
    }

    async fn update_account(
        &self,
        id: &AccountId,
        account: &NewAccount,
    ) -> Result<AccountRecord, Error> {
        self.send_json(
            Method::PUT,
            &["api", "accounts", id.as_str()],
            &AccountBody::from(account),
        )
        .await
    }

    async fn delete_account(&self, id: &AccountId) -> Result<(), Error> {
        self.send_ignoring_body::<()>(Method::DELETE, &["api", "accounts", id.as_str()], None)
            .await
    }

    async fn fetch_categories(&self) -> Result<Vec<CategoryRecord>, Error> {
        self.get_json(&["api", "categories"]).await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<CategoryRecord, Error> {
        self.send_json(Method::POST, &["api", "categories"], &CategoryBody::from(category))
            .await
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        category: &NewCategory,
    ) -> Result<CategoryRecord, Error> {
        self.send_json(
            Method::PUT,
            &["api", "categories", id.as_str()],
            &CategoryBody::from(category),
        )
        .await
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), Error> {
        self.send_ignoring_body::<()>(Method::DELETE, &["api", "categories", id.as_str()], None)
            .await
    }

    async fn fetch_transactions(&self) -> Result<Vec<TransactionRecord>, Error> {
        self.get_json(&["api", "transactions"]).await
    }

    async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<TransactionRecord, Error> {
        self.send_json(
            Method::POST,
            &["api", "transactions"],
            &TransactionBody::from(transaction),
        )
        .await
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        transaction: &NewTransaction,
    ) -> Result<TransactionRecord, Error> {
        self.send_json(
            Method::PUT,
            &["api", "transactions", id.as_str()],
            &TransactionBody::from(transaction),
        )
        .await
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), Error> {
        self.send_ignoring_body::<()>(Method::DELETE, &["api", "transactions", id.as_str()], None)
            .await
    }

    async fn fetch_financial_summary(&self) -> Result<FinancialSummary, Error> {
        self.get_json(&["api", "transactions", "summary"]).await
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, Error> {
    // A trailing slash makes `Url::join` append to the path instead of
    // replacing its last segment.
    let normalized = if base_url.ends_with('/') {
        base_url.to_owned()
    } else {
        format!("{base_url}/")
    };

    match Url::parse(&normalized) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(Error::InvalidBaseUrl(base_url.to_owned())),
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    serde_json::from_str(text).map_err(|error| Error::Decode(error.to_string()))
}

fn classify_failure(status: u16, body: &str) -> Error {
    let message = error_message(body);

    match status {
        401 => tracing::error!("Unauthorized access - please login again"),
        403 => tracing::error!("Forbidden - you don't have permission"),
        404 => tracing::error!("Resource not found"),
        500 => tracing::error!("Server error"),
        status => tracing::error!("An error occurred, status {status}"),
    }

    Error::from_status(status, message)
}

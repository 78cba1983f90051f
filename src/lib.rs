//! Fintrack is a client for a personal-finance REST API.
//!
//! The library keeps a local copy of the user's accounts, categories and
//! transactions, and turns the transaction collection into the series shown by
//! the dashboard and analytics views: a running balance over the last N days,
//! income and expenses per calendar week/month/year, and totals per category.

#![warn(missing_docs)]

pub mod aggregation;
pub mod app_state;
pub mod config;
pub mod filters;
pub mod format;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod notice;
pub mod session;
pub mod stores;
pub mod timezone;
pub mod validation;

pub use app_state::AppState;
pub use config::ClientConfig;
pub use gateway::{ApiClient, FinanceApi};
pub use session::SessionStore;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The server rejected the bearer token, or no token was sent.
    ///
    /// The held token should be discarded and the user asked to log in again.
    #[error("unauthorized access, please log in again")]
    Unauthorized(Option<String>),

    /// The user is logged in but is not allowed to perform the request.
    #[error("forbidden, you don't have permission")]
    Forbidden(Option<String>),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound(Option<String>),

    /// The server failed while handling the request.
    #[error("the server encountered an error")]
    ServerError(Option<String>),

    /// The server responded with a non-success status that is not handled by
    /// the other variants.
    #[error("the server responded with status {status}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// The message from the response body, if any.
        message: Option<String>,
    },

    /// The request was sent but no response was received.
    #[error("no response received: {0}")]
    Network(String),

    /// The request could not be constructed.
    #[error("could not build the request: {0}")]
    RequestSetup(String),

    /// The response body could not be decoded.
    #[error("could not decode the response body: {0}")]
    Decode(String),

    /// The configured base URL is not a valid URL.
    #[error("invalid base URL \"{0}\"")]
    InvalidBaseUrl(String),

    /// A transaction record from the server is malformed, e.g. the date cannot
    /// be parsed or the amount is not a finite, non-negative number.
    #[error("invalid transaction data for \"{id}\": {reason}")]
    InvalidTransactionData {
        /// The ID of the offending record.
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A category or account record from the server is malformed.
    #[error("invalid record \"{id}\": {reason}")]
    InvalidRecord {
        /// The ID of the offending record.
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An operation that requires a bearer token was attempted while logged out.
    #[error("not logged in")]
    NotLoggedIn,

    /// A required form field was left empty.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// The amount entered is not a positive number.
    #[error("\"{0}\" is not a valid amount, enter a number greater than zero")]
    InvalidAmount(String),

    /// A transaction was submitted without a category.
    #[error("please select a category")]
    MissingCategory,

    /// A transaction was submitted without an account.
    #[error("please select an account")]
    MissingAccount,

    /// The selected category or account is not in the local collection.
    #[error("the selected {0} does not exist")]
    UnknownReference(&'static str),

    /// The selected category is for income while the transaction is an
    /// expense, or vice versa.
    #[error("the category \"{0}\" cannot be used for this type of transaction")]
    CategoryKindMismatch(String),

    /// The new password does not meet the password requirements.
    #[error("password is too weak, it must have {0}")]
    WeakPassword(String),

    /// The password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// A string could not be parsed as a date.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not parse date \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// A command-line choice was not one of the accepted values.
    #[error("invalid value \"{value}\", expected one of {expected}")]
    InvalidChoice {
        /// The rejected input.
        value: String,
        /// The accepted values.
        expected: &'static str,
    },

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An unhandled/unexpected SQL error in the session file.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// Map a non-success HTTP status code and the message from the response
    /// body to an error.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => Error::Unauthorized(message),
            403 => Error::Forbidden(message),
            404 => Error::NotFound(message),
            500 => Error::ServerError(message),
            status => Error::HttpStatus { status, message },
        }
    }

    /// The message to show to the user when an operation fails.
    ///
    /// Server-provided messages take priority. Transport failures without a
    /// server message fall back to `fallback`, e.g. "Failed to fetch
    /// transactions". Client-side errors describe themselves.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Unauthorized(Some(message))
            | Error::Forbidden(Some(message))
            | Error::NotFound(Some(message))
            | Error::ServerError(Some(message))
            | Error::HttpStatus {
                message: Some(message),
                ..
            } => message.clone(),
            Error::Unauthorized(None)
            | Error::Forbidden(None)
            | Error::NotFound(None)
            | Error::ServerError(None)
            | Error::HttpStatus { message: None, .. }
            | Error::Network(_)
            | Error::RequestSetup(_)
            | Error::Decode(_) => fallback.to_owned(),
            error => capitalise_first_char(&error.to_string()),
        }
    }

    /// Whether the error means the bearer token is no longer valid.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized(_))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        // The URL may hold a password reset token.
        let value = value.without_url();

        if value.is_builder() {
            tracing::error!("Request error: {value}");
            Error::RequestSetup(value.to_string())
        } else if value.is_decode() || value.is_body() {
            Error::Decode(value.to_string())
        } else {
            tracing::error!("No response received: {value}");
            Error::Network(value.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

/// Uppercase the first character of `string`, e.g. for error messages.
pub fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}

#[cfg(test)]
mod error_tests {
    use crate::{Error, capitalise_first_char};

    #[test]
    fn capitalises_only_the_first_character() {
        assert_eq!(capitalise_first_char("not logged in"), "Not logged in");
        assert_eq!(capitalise_first_char("ändern"), "Ändern");
        assert_eq!(capitalise_first_char(""), "");
    }

    #[test]
    fn classifies_status_codes() {
        assert_eq!(Error::from_status(401, None), Error::Unauthorized(None));
        assert_eq!(Error::from_status(403, None), Error::Forbidden(None));
        assert_eq!(Error::from_status(404, None), Error::NotFound(None));
        assert_eq!(Error::from_status(500, None), Error::ServerError(None));
        assert_eq!(
            Error::from_status(422, Some("bad".to_owned())),
            Error::HttpStatus {
                status: 422,
                message: Some("bad".to_owned())
            }
        );
    }

    #[test]
    fn user_message_prefers_server_message() {
        let error = Error::ServerError(Some("Database unavailable".to_owned()));

        assert_eq!(
            error.user_message("Failed to fetch accounts"),
            "Database unavailable"
        );
    }

    #[test]
    fn user_message_falls_back_for_transport_errors() {
        let error = Error::Network("connection refused".to_owned());

        assert_eq!(
            error.user_message("Failed to fetch accounts"),
            "Failed to fetch accounts"
        );
    }

    #[test]
    fn user_message_describes_client_errors() {
        assert_eq!(
            Error::MissingCategory.user_message("Failed to create transaction"),
            "Please select a category"
        );
    }
}

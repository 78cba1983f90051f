use serde::Serialize;

use crate::Error;

/// Where a store's latest request is up to.
///
/// Each request moves the status from any state to `Pending`, then to either
/// `Succeeded` or `Failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum RequestStatus {
    /// No request has been made.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The latest request succeeded.
    Succeeded,
    /// The latest request failed with the given message.
    Failed(String),
}

impl RequestStatus {
    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }

    /// The message from the latest failed request, if the latest request failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            RequestStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Mark a request as started, clearing any previous error.
    pub fn begin(&mut self) {
        *self = RequestStatus::Pending;
    }

    /// Record the outcome of a request and pass the result on.
    ///
    /// On failure the status holds the message to show the user, using
    /// `fallback` when the server did not provide one.
    pub fn settle<T>(&mut self, result: Result<T, Error>, fallback: &str) -> Result<T, Error> {
        match &result {
            Ok(_) => *self = RequestStatus::Succeeded,
            Err(error) => {
                let message = error.user_message(fallback);
                tracing::warn!("{fallback}: {error}");
                *self = RequestStatus::Failed(message);
            }
        }

        result
    }

    /// Forget the latest error, keeping any other state.
    pub fn clear_error(&mut self) {
        if let RequestStatus::Failed(_) = self {
            *self = RequestStatus::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::RequestStatus;

    #[test]
    fn moves_through_pending_to_succeeded() {
        let mut status = RequestStatus::default();
        assert_eq!(status, RequestStatus::Idle);

        status.begin();
        assert!(status.is_loading());

        let result = status.settle(Ok(3), "Failed to fetch accounts");
        assert_eq!(result, Ok(3));
        assert_eq!(status, RequestStatus::Succeeded);
    }

    #[test]
    fn failure_keeps_server_message_or_fallback() {
        let mut status = RequestStatus::default();

        status.begin();
        let _ = status.settle::<()>(
            Err(Error::NotFound(Some("Account not found".to_owned()))),
            "Failed to update account",
        );
        assert_eq!(status.error(), Some("Account not found"));

        status.begin();
        assert_eq!(status.error(), None);
        let _ = status.settle::<()>(
            Err(Error::Network("connection refused".to_owned())),
            "Failed to update account",
        );
        assert_eq!(status.error(), Some("Failed to update account"));

        status.clear_error();
        assert_eq!(status, RequestStatus::Idle);
    }
}

//! Success and error messages to show the user once an operation finishes.

use std::fmt::Display;

use serde::Serialize;

/// Whether a notice reports a success or a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// The operation succeeded.
    Success,
    /// The operation failed.
    Error,
}

/// A short message with optional details, e.g. "Transaction Added" and
/// "Your transaction has been recorded successfully."
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Success or error.
    pub kind: NoticeKind,
    /// The headline.
    pub message: String,
    /// Extra details, may be empty.
    pub details: String,
}

impl Notice {
    /// Create a new success notice
    pub fn success(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            details: details.into(),
        }
    }

    /// Create a new error notice
    pub fn error(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            details: details.into(),
        }
    }

    /// Create a new error notice without details
    pub fn error_simple(message: impl Into<String>) -> Self {
        Self::error(message, "")
    }

    /// Whether this notice reports a failure.
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.details.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.message, self.details)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Notice, NoticeKind};

    #[test]
    fn displays_message_and_details() {
        let notice = Notice::success("Account Added", "Savings has been added to your accounts.");

        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(
            notice.to_string(),
            "Account Added: Savings has been added to your accounts."
        );
    }

    #[test]
    fn simple_error_has_no_details() {
        let notice = Notice::error_simple("Passwords do not match");

        assert!(notice.is_error());
        assert_eq!(notice.to_string(), "Passwords do not match");
    }
}

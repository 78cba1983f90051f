//! Identifier types for records owned by the server.
//!
//! The server issues string identifiers (`_id`). Each record type gets its own
//! newtype so that, e.g., an account ID cannot be passed where a category ID is
//! expected.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an identifier issued by the server.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

record_id!(
    /// The server identifier of a transaction.
    TransactionId
);

record_id!(
    /// The server identifier of a category.
    CategoryId
);

record_id!(
    /// The server identifier of an account.
    AccountId
);

record_id!(
    /// The server identifier of a user.
    UserId
);

use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// The logged-in user as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID.
    pub id: UserId,
    /// The user's display name.
    pub name: String,
    /// The email address the user logs in with.
    pub email: String,
}

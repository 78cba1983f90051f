//! Keeps the login and the last-fetched accounts between runs of the client.
//!
//! The session is a small SQLite file with one key-value table. Values are
//! stored as JSON.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    Error,
    models::{Account, User},
};

const AUTH_KEY: &str = "auth";
const ACCOUNTS_KEY: &str = "accounts";

/// The login saved from a previous run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAuth {
    /// The bearer token.
    pub token: String,
    /// The logged-in user, if the server sent one.
    pub user: Option<User>,
}

/// The session file.
#[derive(Debug)]
pub struct SessionStore {
    connection: Connection,
}

impl SessionStore {
    /// Open the session file at `path`, creating it if it does not exist.
    pub fn open(path: &Path) -> Result<Self, Error> {
        tracing::debug!("Opening session file at {path:?}");
        Self::from_connection(Connection::open(path)?)
    }

    /// Create a session that only lives as long as the returned store.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> Result<Self, Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            (),
        )?;

        Ok(Self { connection })
    }

    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), Error> {
        let json = serde_json::to_string(value)?;

        self.connection.execute(
            "INSERT INTO session (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, &json),
        )?;

        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        let json: Option<String> = self
            .connection
            .query_row("SELECT value FROM session WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;

        match json {
            Some(json) => match serde_json::from_str(&json) {
                Ok(value) => Ok(Some(value)),
                Err(error) => {
                    // A file written by an older client is treated as empty.
                    tracing::warn!("Ignoring unreadable session value for \"{key}\": {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.connection
            .execute("DELETE FROM session WHERE key = ?1", [key])?;
        Ok(())
    }

    /// Save the login, or forget it if `auth` is `None`.
    pub fn save_auth(&self, auth: Option<&SavedAuth>) -> Result<(), Error> {
        match auth {
            Some(auth) => self.set(AUTH_KEY, auth),
            None => self.remove(AUTH_KEY),
        }
    }

    /// The saved login, if any.
    pub fn load_auth(&self) -> Result<Option<SavedAuth>, Error> {
        self.get(AUTH_KEY)
    }

    /// Save the accounts collection.
    pub fn save_accounts(&self, accounts: &[Account]) -> Result<(), Error> {
        self.set(ACCOUNTS_KEY, accounts)
    }

    /// The saved accounts, empty if none were saved.
    pub fn load_accounts(&self) -> Result<Vec<Account>, Error> {
        Ok(self.get(ACCOUNTS_KEY)?.unwrap_or_default())
    }

    /// Forget everything in the session.
    pub fn clear(&self) -> Result<(), Error> {
        self.connection.execute("DELETE FROM session", ())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Account, AccountId, User, UserId};

    use super::{SavedAuth, SessionStore};

    fn auth() -> SavedAuth {
        SavedAuth {
            token: "abc.def.ghi".to_owned(),
            user: Some(User {
                id: UserId::new("u1"),
                name: "Jane Doe".to_owned(),
                email: "jane@example.com".to_owned(),
            }),
        }
    }

    #[test]
    fn new_session_is_empty() {
        let store = SessionStore::open_in_memory().unwrap();

        assert_eq!(store.load_auth().unwrap(), None);
        assert!(store.load_accounts().unwrap().is_empty());
    }

    #[test]
    fn saves_and_replaces_auth() {
        let store = SessionStore::open_in_memory().unwrap();

        store.save_auth(Some(&auth())).unwrap();
        assert_eq!(store.load_auth().unwrap(), Some(auth()));

        let replacement = SavedAuth {
            token: "new-token".to_owned(),
            user: None,
        };
        store.save_auth(Some(&replacement)).unwrap();
        assert_eq!(store.load_auth().unwrap(), Some(replacement));

        store.save_auth(None).unwrap();
        assert_eq!(store.load_auth().unwrap(), None);
    }

    #[test]
    fn saves_accounts() {
        let store = SessionStore::open_in_memory().unwrap();
        let accounts = vec![Account {
            id: AccountId::new("a1"),
            name: "Savings".to_owned(),
            balance: 1234.5,
            color: "#3b82f6".to_owned(),
        }];

        store.save_accounts(&accounts).unwrap();

        assert_eq!(store.load_accounts().unwrap(), accounts);
    }

    #[test]
    fn clear_removes_everything() {
        let store = SessionStore::open_in_memory().unwrap();
        store.save_auth(Some(&auth())).unwrap();
        store.save_accounts(&[]).unwrap();

        store.clear().unwrap();

        assert_eq!(store.load_auth().unwrap(), None);
        assert!(store.load_accounts().unwrap().is_empty());
    }

    #[test]
    fn persists_to_file() {
        let path = std::env::temp_dir().join(format!(
            "fintrack-session-test-{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        {
            let store = SessionStore::open(&path).unwrap();
            store.save_auth(Some(&auth())).unwrap();
        }

        let store = SessionStore::open(&path).unwrap();
        assert_eq!(store.load_auth().unwrap(), Some(auth()));

        drop(store);
        std::fs::remove_file(&path).unwrap();
    }
}

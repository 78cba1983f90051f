//! Where the client finds the server, the session file and the user's timezone.

use std::path::PathBuf;

use time::Date;

use crate::{
    Error,
    format::CurrencyFormat,
    timezone::{DEFAULT_TIMEZONE, get_local_offset, local_today},
};

/// The environment variable holding the base URL of the REST API.
pub const BACKEND_URL_VAR: &str = "FINTRACK_BACKEND_URL";
/// The environment variable holding the path to the session file.
pub const SESSION_PATH_VAR: &str = "FINTRACK_SESSION_PATH";
/// The environment variable holding the canonical timezone name.
pub const TIMEZONE_VAR: &str = "FINTRACK_TIMEZONE";

/// The base URL used when none is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
/// The session file used when none is configured.
pub const DEFAULT_SESSION_PATH: &str = "fintrack-session.db";

/// Values given explicitly, e.g. on the command line. These take priority
/// over environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// The base URL of the REST API.
    pub base_url: Option<String>,
    /// The path to the session file.
    pub session_path: Option<PathBuf>,
    /// The canonical timezone name, e.g. "Asia/Kolkata".
    pub timezone: Option<String>,
}

/// The resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// The base URL of the REST API.
    pub base_url: String,
    /// The SQLite file the session is saved in.
    pub session_path: PathBuf,
    /// The canonical timezone used to work out today's date.
    pub timezone: String,
    /// How amounts are displayed.
    pub currency: CurrencyFormat,
}

impl ClientConfig {
    /// Resolve each setting from `overrides`, then the environment, then the
    /// defaults.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the resolved timezone is not a
    /// known canonical timezone name.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, Error> {
        Self::resolve_with(overrides, |name| std::env::var(name).ok())
    }

    fn resolve_with(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Error> {
        let from_env = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let base_url = overrides
            .base_url
            .or_else(|| from_env(BACKEND_URL_VAR))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_owned());

        let session_path = overrides
            .session_path
            .or_else(|| from_env(SESSION_PATH_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_PATH));

        let timezone = overrides
            .timezone
            .or_else(|| from_env(TIMEZONE_VAR))
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_owned());

        if get_local_offset(&timezone).is_none() {
            return Err(Error::InvalidTimezoneError(timezone));
        }

        tracing::debug!(
            "Resolved config: base_url={base_url}, session_path={session_path:?}, timezone={timezone}"
        );

        Ok(Self {
            base_url,
            session_path,
            timezone,
            currency: CurrencyFormat::default(),
        })
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> Result<Date, Error> {
        local_today(&self.timezone)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, path::PathBuf};

    use crate::Error;

    use super::{ClientConfig, ConfigOverrides};

    fn resolve(
        overrides: ConfigOverrides,
        env: &[(&'static str, &'static str)],
    ) -> Result<ClientConfig, Error> {
        let env: HashMap<&str, &str> = env.iter().copied().collect();

        ClientConfig::resolve_with(overrides, |name| env.get(name).map(|value| value.to_string()))
    }

    #[test]
    fn uses_defaults_without_flags_or_env() {
        let config = resolve(ConfigOverrides::default(), &[]).unwrap();

        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.session_path, PathBuf::from("fintrack-session.db"));
        assert_eq!(config.timezone, "Etc/UTC");
    }

    #[test]
    fn env_overrides_defaults() {
        let config = resolve(
            ConfigOverrides::default(),
            &[
                ("FINTRACK_BACKEND_URL", "https://api.example.com"),
                ("FINTRACK_SESSION_PATH", "/tmp/session.db"),
                ("FINTRACK_TIMEZONE", "Asia/Kolkata"),
            ],
        )
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.session_path, PathBuf::from("/tmp/session.db"));
        assert_eq!(config.timezone, "Asia/Kolkata");
    }

    #[test]
    fn flags_override_env() {
        let overrides = ConfigOverrides {
            base_url: Some("http://127.0.0.1:8080".to_owned()),
            session_path: None,
            timezone: Some("Pacific/Auckland".to_owned()),
        };

        let config = resolve(
            overrides,
            &[
                ("FINTRACK_BACKEND_URL", "https://api.example.com"),
                ("FINTRACK_TIMEZONE", "Asia/Kolkata"),
            ],
        )
        .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.timezone, "Pacific/Auckland");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = resolve(ConfigOverrides::default(), &[("FINTRACK_TIMEZONE", "  ")]).unwrap();

        assert_eq!(config.timezone, "Etc/UTC");
    }

    #[test]
    fn rejects_unknown_timezone() {
        let result = resolve(
            ConfigOverrides::default(),
            &[("FINTRACK_TIMEZONE", "Not/A_Zone")],
        );

        assert_eq!(
            result,
            Err(Error::InvalidTimezoneError("Not/A_Zone".to_owned()))
        );
    }
}

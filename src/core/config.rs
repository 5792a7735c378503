//! Client settings.
//!
//! Settings come from built-in defaults, then `~/.envseal/config.toml` (or
//! an explicit path), then `ENVSEAL_*` environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::core::constants;
use crate::error::{ConfigError, Result, StoreError};

/// Environment variable overrides, by field.
pub const ENV_API_URL: &str = "ENVSEAL_API_URL";
pub const ENV_GRAPHQL_URL: &str = "ENVSEAL_GRAPHQL_URL";
pub const ENV_AUTH_URL: &str = "ENVSEAL_AUTH_URL";
pub const ENV_CREDENTIALS_DIR: &str = "ENVSEAL_CREDENTIALS_DIR";

/// Endpoint and storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// REST endpoint base
    pub api_url: String,
    /// GraphQL endpoint
    pub graphql_url: String,
    /// Auth service base; refresh goes to `{auth_url}/token/refresh`
    pub auth_url: String,
    /// Where credentials live; `~/.envseal/credentials` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_dir: Option<PathBuf>,
    /// Per-request timeout
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: constants::DEFAULT_API_URL.to_string(),
            graphql_url: constants::DEFAULT_GRAPHQL_URL.to_string(),
            auth_url: constants::DEFAULT_AUTH_URL.to_string(),
            credentials_dir: None,
            timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
            user_agent: format!("envseal/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    /// Default config file location, `~/.envseal/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        Ok(home()?.join(constants::HOME_DIR).join(constants::CONFIG_FILE))
    }

    /// Load settings.
    ///
    /// An explicit `path` must exist; the default location is optional.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or if the
    /// resulting settings fail validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    debug!(path = %path.display(), "no config file, using defaults");
                    Self::default()
                }
            }
        };

        settings.apply_env(|name| std::env::var(name).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Parse a TOML config file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse`.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&contents)
    }

    /// Parse TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the TOML is malformed.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents).map_err(ConfigError::Parse)?)
    }

    /// Apply `ENVSEAL_*` overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty(ENV_API_URL) {
            self.api_url = v;
        }
        if let Some(v) = non_empty(ENV_GRAPHQL_URL) {
            self.graphql_url = v;
        }
        if let Some(v) = non_empty(ENV_AUTH_URL) {
            self.auth_url = v;
        }
        if let Some(v) = non_empty(ENV_CREDENTIALS_DIR) {
            self.credentials_dir = Some(PathBuf::from(v));
        }
    }

    /// Check that every URL parses as http(s) and the timeout is non-zero.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.api_url)?;
        validate_url("graphql_url", &self.graphql_url)?;
        validate_url("auth_url", &self.auth_url)?;

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "user_agent",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Resolved credentials directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoHome` if unset and no home directory exists.
    pub fn credentials_dir(&self) -> Result<PathBuf> {
        match &self.credentials_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(home()?
                .join(constants::HOME_DIR)
                .join(constants::CREDENTIALS_DIR)),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Token refresh endpoint.
    pub fn refresh_url(&self) -> String {
        format!("{}/token/refresh", self.auth_url.trim_end_matches('/'))
    }
}

fn home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| StoreError::NoHome.into())
}

fn validate_url(field: &'static str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidValue {
            field,
            reason: format!("unsupported scheme '{}'", scheme),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml("api_url = \"http://localhost:8080\"\n").unwrap();
        assert_eq!(settings.api_url, "http://localhost:8080");
        assert_eq!(settings.auth_url, constants::DEFAULT_AUTH_URL);
        assert_eq!(settings.timeout_secs, constants::DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut settings = Settings::from_toml("api_url = \"http://file\"\n").unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "http://env"),
            (ENV_CREDENTIALS_DIR, "/tmp/creds"),
            (ENV_AUTH_URL, "  "),
        ]
        .into_iter()
        .collect();

        settings.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.api_url, "http://env");
        assert_eq!(settings.auth_url, constants::DEFAULT_AUTH_URL);
        assert_eq!(
            settings.credentials_dir().unwrap(),
            PathBuf::from("/tmp/creds")
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = Settings {
            graphql_url: "not a url".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            auth_url: "ftp://auth".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            timeout_secs: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let tmp = TempDir::new().unwrap();
        let err = Settings::load(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Config(ConfigError::ReadFile(_))
        ));
    }

    #[test]
    fn test_malformed_file_errors() {
        assert!(Settings::from_toml("api_url = [").is_err());
    }

    #[test]
    fn test_refresh_url() {
        let settings = Settings {
            auth_url: "https://auth.example.com/".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            settings.refresh_url(),
            "https://auth.example.com/token/refresh"
        );
    }
}

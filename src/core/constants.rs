//! Constants used throughout envseal.
//!
//! Centralizes magic strings and configuration values.

/// Settings directory relative to HOME (~/.envseal).
pub const HOME_DIR: &str = ".envseal";

/// Settings file name inside the settings directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Credentials subdirectory inside the settings directory.
pub const CREDENTIALS_DIR: &str = "credentials";

/// Organization key length in bytes.
pub const ORG_KEY_LEN: usize = 32;

/// AEAD nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.envseal.dev";

/// Default GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.envseal.dev/graphql";

/// Default auth service URL.
pub const DEFAULT_AUTH_URL: &str = "https://auth.envseal.dev";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

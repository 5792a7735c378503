//! Error types for envseal.
//!
//! Each concern has its own error enum; all of them fold into [`Error`]
//! so library callers can use a single `Result` alias and still branch on
//! [`ErrorKind`] without matching nested variants.

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Payload encode/encrypt failures.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("invalid key: expected {expected} bytes, got {actual}")]
    InvalidKey { expected: usize, actual: usize },
}

/// Key/payload map failures.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("key not found: {0}")]
    KeyNotFound(String),
}

/// Key bootstrap failures at login.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("key decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("key encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Remote API failures.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("token refresh failed: {source}")]
    RefreshFailed {
        #[source]
        source: Box<Error>,
    },

    #[error("permission denied")]
    PermissionDenied,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("graphql error: {0}")]
    GraphQl(String),
}

/// Credential store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no {0} stored")]
    NotFound(&'static str),

    #[error("failed to read credentials: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("failed to write credentials: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("failed to parse {kind}: {source}")]
    Parse {
        kind: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize {kind}: {source}")]
    Serialize {
        kind: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unable to determine home directory")]
    NoHome,
}

/// Configuration failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Coarse error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Decryption,
    KeyDecryptionFailed,
    Unauthenticated,
    RefreshFailed,
    PermissionDenied,
    MapKeyNotFound,
    Transport,
    MalformedResponse,
    Other,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Payload(PayloadError::Decode(_)) => ErrorKind::Decode,
            Error::Payload(PayloadError::Decryption(_)) => ErrorKind::Decryption,
            Error::Payload(PayloadError::InvalidKey { .. }) => ErrorKind::Decryption,
            Error::Payload(PayloadError::Encryption(_)) => ErrorKind::Other,
            Error::Map(MapError::KeyNotFound(_)) => ErrorKind::MapKeyNotFound,
            Error::Key(KeyError::DecryptionFailed(_)) => ErrorKind::KeyDecryptionFailed,
            Error::Key(KeyError::EncryptionFailed(_)) => ErrorKind::Other,
            Error::Client(e) => match e {
                ClientError::Unauthenticated => ErrorKind::Unauthenticated,
                ClientError::RefreshFailed { .. } => ErrorKind::RefreshFailed,
                ClientError::PermissionDenied => ErrorKind::PermissionDenied,
                ClientError::Transport(_) => ErrorKind::Transport,
                ClientError::MalformedResponse(_) | ClientError::GraphQl(_) => {
                    ErrorKind::MalformedResponse
                }
                ClientError::Status { .. } => ErrorKind::Other,
            },
            Error::Store(_) | Error::Config(_) | Error::Io(_) => ErrorKind::Other,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::MalformedResponse(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Client(e.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_maps_nested_variants() {
        let err: Error = MapError::KeyNotFound("A".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::MapKeyNotFound);

        let err: Error = ClientError::Unauthenticated.into();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);

        let err: Error = KeyError::DecryptionFailed("bad password".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::KeyDecryptionFailed);
    }

    #[test]
    fn test_refresh_failed_keeps_source() {
        let inner: Error = ClientError::Transport("connection reset".to_string()).into();
        let err: Error = ClientError::RefreshFailed {
            source: Box::new(inner),
        }
        .into();

        assert_eq!(err.kind(), ErrorKind::RefreshFailed);
        assert!(err.to_string().contains("connection reset"));
    }
}

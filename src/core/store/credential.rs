//! Credential entities persisted by a [`CredentialStore`](super::CredentialStore).
//!
//! Each kind is a concrete struct decoded by serde at the boundary, so a
//! malformed file fails as a parse error naming its kind.

use ::age::x25519;
use serde::{Deserialize, Serialize};

use crate::core::cipher::age;
use crate::core::types::{EnvId, PublicKey, SecretId, UserId};
use crate::error::{Result, StoreError};

/// The kinds of credential a store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    AccountSession,
    AsymmetricKeys,
    ProjectBinding,
}

impl CredentialKind {
    /// All kinds, in a fixed order.
    pub const ALL: [CredentialKind; 3] = [
        CredentialKind::AccountSession,
        CredentialKind::AsymmetricKeys,
        CredentialKind::ProjectBinding,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccountSession => "account session",
            Self::AsymmetricKeys => "keys",
            Self::ProjectBinding => "project binding",
        }
    }

    /// File stem used by file-backed stores.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::AccountSession => "session",
            Self::AsymmetricKeys => "keys",
            Self::ProjectBinding => "project",
        }
    }
}

/// Authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: String,
}

/// Access and refresh tokens for one account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
    /// Organization key encrypted to the holder's public key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_org_key: Option<String>,
}

impl std::fmt::Debug for AccountSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSession")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("user", &self.user)
            .field("encrypted_org_key", &self.encrypted_org_key.is_some())
            .finish()
    }
}

/// The holder's x25519 keypair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    pub public_key: PublicKey,
    /// `AGE-SECRET-KEY-...`
    pub private_key: String,
}

impl Keys {
    /// Build from an age identity.
    pub fn from_identity(identity: &x25519::Identity) -> Self {
        use ::age::secrecy::ExposeSecret;

        Self {
            public_key: identity.to_public().to_string(),
            private_key: identity.to_string().expose_secret().to_string(),
        }
    }

    /// Parse the private key.
    pub fn identity(&self) -> Result<x25519::Identity> {
        age::parse_identity(&self.private_key)
    }
}

impl std::fmt::Debug for Keys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keys")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Which remote secret the working directory is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectBinding {
    pub secret_id: SecretId,
    pub env_id: EnvId,
}

/// A stored credential of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    AccountSession(AccountSession),
    AsymmetricKeys(Keys),
    ProjectBinding(ProjectBinding),
}

impl Credential {
    /// Kind of this credential.
    pub fn kind(&self) -> CredentialKind {
        match self {
            Self::AccountSession(_) => CredentialKind::AccountSession,
            Self::AsymmetricKeys(_) => CredentialKind::AsymmetricKeys,
            Self::ProjectBinding(_) => CredentialKind::ProjectBinding,
        }
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialize` if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        let result = match self {
            Self::AccountSession(v) => serde_yaml::to_string(v),
            Self::AsymmetricKeys(v) => serde_yaml::to_string(v),
            Self::ProjectBinding(v) => serde_yaml::to_string(v),
        };
        result.map_err(|source| {
            StoreError::Serialize {
                kind: self.kind().name(),
                source,
            }
            .into()
        })
    }

    /// Parse YAML as the given kind.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` if the document does not match the kind's
    /// shape.
    pub fn from_yaml(kind: CredentialKind, contents: &str) -> Result<Self> {
        let parse_err = |source| StoreError::Parse {
            kind: kind.name(),
            source,
        };
        let credential = match kind {
            CredentialKind::AccountSession => {
                Self::AccountSession(serde_yaml::from_str(contents).map_err(parse_err)?)
            }
            CredentialKind::AsymmetricKeys => {
                Self::AsymmetricKeys(serde_yaml::from_str(contents).map_err(parse_err)?)
            }
            CredentialKind::ProjectBinding => {
                Self::ProjectBinding(serde_yaml::from_str(contents).map_err(parse_err)?)
            }
        };
        Ok(credential)
    }
}

impl From<AccountSession> for Credential {
    fn from(v: AccountSession) -> Self {
        Self::AccountSession(v)
    }
}

impl From<Keys> for Credential {
    fn from(v: Keys) -> Self {
        Self::AsymmetricKeys(v)
    }
}

impl From<ProjectBinding> for Credential {
    fn from(v: ProjectBinding) -> Self {
        Self::ProjectBinding(v)
    }
}

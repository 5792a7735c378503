//! Secret type.
//!
//! A versioned aggregate: ownership metadata plus a [`KPMap`] of values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::{KPMap, KVMap, Payload};
use crate::core::cipher::OrgKey;
use crate::core::types::{EnvId, SecretId, UserId};
use crate::error::Result;

/// A versioned set of key=value secrets owned by a user and environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    id: SecretId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_id: UserId,
    env_id: EnvId,
    #[serde(default)]
    version: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    data: KPMap,
}

impl Secret {
    /// Create an empty secret with an unknown version.
    pub fn new(
        id: impl Into<SecretId>,
        user_id: impl Into<UserId>,
        env_id: impl Into<EnvId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            created_at: now,
            updated_at: now,
            user_id: user_id.into(),
            env_id: env_id.into(),
            version: None,
            data: KPMap::new(),
        }
    }

    /// Set the known version.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Replace the contents.
    pub fn with_data(mut self, data: KPMap) -> Self {
        self.data = data;
        self
    }

    /// Secret identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Owning user
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Owning environment
    pub fn env_id(&self) -> &str {
        &self.env_id
    }

    /// Known version, `None` if never fetched
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    /// Creation time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification time
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The key/payload map
    pub fn data(&self) -> &KPMap {
        &self.data
    }

    /// Bump the version by one. No-op while the version is unknown, and
    /// at `u64::MAX`.
    pub fn increment_version(&mut self) {
        if let Some(v) = self.version.as_mut() {
            match v.checked_add(1) {
                Some(next) => *v = next,
                None => warn!(secret = %self.id, "version is at its maximum, not incremented"),
            }
        }
    }

    /// Record a modification time of now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether the secret holds no values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Insert or replace a value.
    pub fn set(&self, key: impl Into<String>, payload: Payload) {
        self.data.set(key, payload);
    }

    /// Copy of the payload at `key`.
    pub fn get(&self, key: &str) -> Option<Payload> {
        self.data.get(key)
    }

    /// Remove a value.
    pub fn delete(&self, key: &str) -> Option<Payload> {
        self.data.delete(key)
    }

    /// Rename a key.
    ///
    /// # Errors
    ///
    /// Returns `MapError::KeyNotFound` if `old` is absent.
    pub fn rename(&self, old: &str, new: impl Into<String>) -> Result<()> {
        self.data.rename(old, new)
    }

    /// Sorted keys
    pub fn keys(&self) -> Vec<String> {
        self.data.keys()
    }

    /// Merge `source` into this secret, replacing existing keys.
    ///
    /// `source` is copied first, so no payload is shared with the caller.
    pub fn overwrite(&self, source: &KPMap) {
        let copy = source.snapshot();
        self.data.overwrite(&copy);
    }

    /// Base64-encode every value in place.
    pub fn encode(&self) {
        self.data.encode();
    }

    /// Decode every value in place, failing fast.
    pub fn decode(&self) -> Result<()> {
        self.data.decode()
    }

    /// Encrypt every value in place, failing fast.
    pub fn encrypt(&self, key: &OrgKey) -> Result<()> {
        self.data.encrypt(key)
    }

    /// Decrypt every value in place, failing fast.
    pub fn decrypt(&self, key: &OrgKey) -> Result<()> {
        self.data.decrypt(key)
    }

    /// Copy with every value encrypted; `self` is not modified.
    pub fn encrypted(&self, key: &OrgKey) -> Result<Secret> {
        let data = self.data.encrypted(key)?;
        Ok(self.with_copied_fields(data))
    }

    /// Copy with every value decrypted; `self` is not modified.
    pub fn decrypted(&self, key: &OrgKey) -> Result<Secret> {
        let data = self.data.decrypted(key)?;
        Ok(self.with_copied_fields(data))
    }

    /// Flatten to key → current value.
    pub fn to_kv_map(&self) -> KVMap {
        self.data.to_kv_map()
    }

    fn with_copied_fields(&self, data: KPMap) -> Secret {
        Secret {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            user_id: self.user_id.clone(),
            env_id: self.env_id.clone(),
            version: self.version,
            data,
        }
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.version {
            Some(v) => write!(f, "{}@{}", self.id, v),
            None => write!(f, "{}", self.id),
        }
    }
}

/// `"data": null` reads as an empty map.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<KPMap, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<KPMap>::deserialize(deserializer)?.unwrap_or_default())
}

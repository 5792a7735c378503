//! KPMap type.
//!
//! Key → [`Payload`] map guarded by one mutex per instance. Every map-level
//! operation, reads included, holds the lock for its whole duration. Share
//! a map between threads with `Arc<KPMap>`; copying one always builds a new
//! lock and clones every payload.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use super::{KVMap, Payload};
use crate::core::cipher::OrgKey;
use crate::error::{MapError, Result};

/// Concurrency-safe map of secret keys to payloads.
#[derive(Default)]
pub struct KPMap {
    inner: Mutex<BTreeMap<String, Payload>>,
}

impl KPMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    fn from_entries(entries: BTreeMap<String, Payload>) -> Self {
        Self {
            inner: Mutex::new(entries),
        }
    }

    // Payloads are plain values; a panic while holding the lock cannot
    // leave the tree structurally broken.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Payload>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace the payload at `key`.
    pub fn set(&self, key: impl Into<String>, payload: Payload) {
        self.lock().insert(key.into(), payload);
    }

    /// Copy of the payload at `key`.
    pub fn get(&self, key: &str) -> Option<Payload> {
        self.lock().get(key).cloned()
    }

    /// Remove `key`, returning its payload if it was present.
    pub fn delete(&self, key: &str) -> Option<Payload> {
        self.lock().remove(key)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Copies of all entries, sorted by key.
    pub fn entries(&self) -> Vec<(String, Payload)> {
        self.lock()
            .iter()
            .map(|(k, p)| (k.clone(), p.clone()))
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Move the payload at `old` to `new`.
    ///
    /// An existing entry at `new` is replaced.
    ///
    /// # Errors
    ///
    /// Returns `MapError::KeyNotFound` if `old` is absent; the map is left
    /// unchanged.
    pub fn rename(&self, old: &str, new: impl Into<String>) -> Result<()> {
        let mut entries = self.lock();
        let payload = entries
            .remove(old)
            .ok_or_else(|| MapError::KeyNotFound(old.to_string()))?;
        entries.insert(new.into(), payload);
        Ok(())
    }

    /// Apply `f` to the payload at `key` in place.
    ///
    /// # Errors
    ///
    /// Returns `MapError::KeyNotFound` if `key` is absent.
    pub fn update<F>(&self, key: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Payload),
    {
        let mut entries = self.lock();
        let payload = entries
            .get_mut(key)
            .ok_or_else(|| MapError::KeyNotFound(key.to_string()))?;
        f(payload);
        Ok(())
    }

    /// Copy every entry of `other` into this map, replacing existing keys.
    pub fn load(&self, other: &KPMap) {
        if std::ptr::eq(self, other) {
            return;
        }
        // Copy out first so the two locks are never held together.
        let incoming = other.lock().clone();
        self.lock().extend(incoming);
    }

    /// Same as [`KPMap::load`].
    pub fn overwrite(&self, source: &KPMap) {
        self.load(source);
    }

    /// Base64-encode every payload.
    pub fn encode(&self) {
        for payload in self.lock().values_mut() {
            payload.encode();
        }
    }

    /// Decode every payload, stopping at the first failure.
    ///
    /// Entries are processed in key order. Entries before the failing one
    /// stay decoded.
    ///
    /// # Errors
    ///
    /// Returns the first `PayloadError::Decode`.
    pub fn decode(&self) -> Result<()> {
        self.try_each(Payload::decode)
    }

    /// Encrypt every payload, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first payload error. Already-processed entries stay
    /// encrypted.
    pub fn encrypt(&self, key: &OrgKey) -> Result<()> {
        debug!(entries = self.len(), "encrypting map");
        self.try_each(|payload| payload.encrypt(key))
    }

    /// Decrypt every payload, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first payload error. Already-processed entries stay
    /// decrypted.
    pub fn decrypt(&self, key: &OrgKey) -> Result<()> {
        debug!(entries = self.len(), "decrypting map");
        self.try_each(|payload| payload.decrypt(key))
    }

    /// Encrypted deep copy; `self` is not modified.
    ///
    /// # Errors
    ///
    /// Returns the first payload error; no copy is returned in that case.
    pub fn encrypted(&self, key: &OrgKey) -> Result<KPMap> {
        let copy = self.snapshot();
        copy.encrypt(key)?;
        Ok(copy)
    }

    /// Decrypted deep copy; `self` is not modified.
    ///
    /// # Errors
    ///
    /// Returns the first payload error; no copy is returned in that case.
    pub fn decrypted(&self, key: &OrgKey) -> Result<KPMap> {
        let copy = self.snapshot();
        copy.decrypt(key)?;
        Ok(copy)
    }

    /// Deep copy with a fresh lock.
    pub fn snapshot(&self) -> KPMap {
        KPMap::from_entries(self.lock().clone())
    }

    /// Flatten to key → current value, without decoding or decrypting.
    pub fn to_kv_map(&self) -> KVMap {
        self.lock()
            .iter()
            .map(|(k, p)| (k.clone(), p.value().to_string()))
            .collect()
    }

    fn try_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Payload) -> Result<()>,
    {
        for payload in self.lock().values_mut() {
            f(payload)?;
        }
        Ok(())
    }
}

impl Clone for KPMap {
    fn clone(&self) -> Self {
        self.snapshot()
    }
}

impl PartialEq for KPMap {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        let theirs = other.lock().clone();
        *self.lock() == theirs
    }
}

impl FromIterator<(String, Payload)> for KPMap {
    fn from_iter<I: IntoIterator<Item = (String, Payload)>>(iter: I) -> Self {
        KPMap::from_entries(iter.into_iter().collect())
    }
}

impl From<&KVMap> for KPMap {
    fn from(kv: &KVMap) -> Self {
        kv.iter()
            .map(|(k, v)| (k.to_string(), Payload::new(v)))
            .collect()
    }
}

impl std::fmt::Debug for KPMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.lock().iter()).finish()
    }
}

impl Serialize for KPMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.lock().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KPMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        BTreeMap::<String, Payload>::deserialize(deserializer).map(KPMap::from_entries)
    }
}

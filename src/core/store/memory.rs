//! In-memory credential storage, for tests and one-shot sessions.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{Credential, CredentialKind, CredentialStore};
use crate::error::{Result, StoreError};

/// Credentials held in process memory.
#[derive(Debug, Default)]
pub struct Memory {
    entries: Mutex<HashMap<CredentialKind, Credential>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `credentials`.
    pub fn with(credentials: impl IntoIterator<Item = Credential>) -> Self {
        let entries = credentials.into_iter().map(|c| (c.kind(), c)).collect();
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl CredentialStore for Memory {
    fn load(&self, kind: CredentialKind) -> Result<Credential> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&kind)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(kind.name()).into())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(credential.kind(), credential.clone());
        Ok(())
    }

    fn exists(&self, kind: CredentialKind) -> bool {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.contains_key(&kind)
    }

    fn delete(&self, kind: CredentialKind) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&kind);
        Ok(())
    }
}

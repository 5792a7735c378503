//! Credential storage.
//!
//! The account session, the holder's keys and the project binding are
//! persisted through the [`CredentialStore`] trait. The resilient client
//! writes refreshed sessions back through it.
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the `CredentialStore` trait
//! 2. Add the implementation in a new file (e.g., `keychain.rs`)
//! 3. Re-export from this module

use crate::error::{Result, StoreError};

mod credential;
mod fs;
mod memory;

pub use credential::{AccountSession, Credential, CredentialKind, Keys, ProjectBinding, User};
pub use fs::Filesystem;
pub use memory::Memory;

/// Credential storage trait.
///
/// Implementations must be safe to share between tasks; the client holds
/// one behind an `Arc`.
pub trait CredentialStore: Send + Sync {
    /// Load the stored credential of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if nothing is stored, or a read/parse
    /// error if the stored document is unusable.
    fn load(&self, kind: CredentialKind) -> Result<Credential>;

    /// Store `credential`, replacing any previous one of the same kind.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    fn save(&self, credential: &Credential) -> Result<()>;

    /// Whether a credential of `kind` is stored.
    fn exists(&self, kind: CredentialKind) -> bool;

    /// Remove the credential of `kind`. Removing a missing one succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if removal fails.
    fn delete(&self, kind: CredentialKind) -> Result<()>;

    /// Load the account session.
    fn session(&self) -> Result<AccountSession> {
        match self.load(CredentialKind::AccountSession)? {
            Credential::AccountSession(session) => Ok(session),
            _ => Err(StoreError::NotFound(CredentialKind::AccountSession.name()).into()),
        }
    }

    /// Load the holder's keys.
    fn keys(&self) -> Result<Keys> {
        match self.load(CredentialKind::AsymmetricKeys)? {
            Credential::AsymmetricKeys(keys) => Ok(keys),
            _ => Err(StoreError::NotFound(CredentialKind::AsymmetricKeys.name()).into()),
        }
    }

    /// Load the project binding.
    fn binding(&self) -> Result<ProjectBinding> {
        match self.load(CredentialKind::ProjectBinding)? {
            Credential::ProjectBinding(binding) => Ok(binding),
            _ => Err(StoreError::NotFound(CredentialKind::ProjectBinding.name()).into()),
        }
    }
}

//! Key bootstrap at login.
//!
//! A login hands back the account session together with the holder's key
//! material: their public key, their private key sealed under the account
//! password, and the organization key encrypted to the public key. The
//! password opens the private key, and the private key opens the
//! organization key.

use ::age::x25519;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::cipher::{age, OrgKey};
use crate::core::store::{AccountSession, Keys};
use crate::core::types::PublicKey;
use crate::error::{Error, KeyError, Result};

/// What a successful sign-in returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSession {
    pub session: AccountSession,
    pub public_key: PublicKey,
    /// Private key sealed under the account password.
    pub encrypted_private_key: String,
}

/// Key material produced for a new enrolment.
#[derive(Clone)]
pub struct SealedKeys {
    pub public_key: PublicKey,
    pub encrypted_private_key: String,
    pub encrypted_org_key: String,
}

impl std::fmt::Debug for SealedKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedKeys")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Recover the holder's keypair from a login.
///
/// The organization key is unwrapped once as a check that the recovered
/// private key matches what the server holds; it is not returned.
///
/// # Errors
///
/// Every failure is `KeyError::DecryptionFailed`: wrong password,
/// corrupted envelope, public key mismatch, or a missing or malformed
/// organization key.
pub fn decrypt_keys_from_session(login: &LoginSession, password: &str) -> Result<Keys> {
    debug!(user = %login.session.user.id, "decrypting keys from session");

    let private_key = age::open_with_passphrase(&login.encrypted_private_key, password)?;
    let private_key = std::str::from_utf8(&private_key)
        .map_err(|_| KeyError::DecryptionFailed("private key is not valid UTF-8".to_string()))?;
    let identity = age::parse_identity(private_key)?;

    let expected = age::parse_recipient(&login.public_key)?;
    let keys = Keys::from_identity(&identity);
    if keys.public_key != expected.to_string() {
        return Err(
            KeyError::DecryptionFailed("private key does not match public key".to_string()).into(),
        );
    }

    unwrap_org_key(&keys, &login.session)?;
    Ok(keys)
}

/// Unwrap the organization key carried by `session`.
///
/// # Errors
///
/// Returns `KeyError::DecryptionFailed` if the session has no organization
/// key, it was not encrypted to `keys`, or it is not exactly 32 bytes.
pub fn unwrap_org_key(keys: &Keys, session: &AccountSession) -> Result<OrgKey> {
    let sealed = session.encrypted_org_key.as_deref().ok_or_else(|| {
        KeyError::DecryptionFailed("session carries no organization key".to_string())
    })?;

    let identity = keys.identity()?;
    let bytes = age::decrypt_with(sealed, &identity)?;
    OrgKey::from_slice(&bytes).map_err(as_key_failure)
}

/// Generate a keypair and seal it and `org_key` for a new login.
///
/// # Errors
///
/// Returns `KeyError::EncryptionFailed` if sealing fails.
pub fn seal_keys_for_session(password: &str, org_key: &OrgKey) -> Result<SealedKeys> {
    use ::age::secrecy::ExposeSecret;

    let identity = x25519::Identity::generate();
    let recipient = identity.to_public();

    let encrypted_private_key =
        age::seal_with_passphrase(identity.to_string().expose_secret().as_bytes(), password)?;
    let encrypted_org_key = age::encrypt_to(org_key.as_bytes(), &recipient)?;

    Ok(SealedKeys {
        public_key: recipient.to_string(),
        encrypted_private_key,
        encrypted_org_key,
    })
}

fn as_key_failure(err: Error) -> Error {
    match err {
        Error::Key(_) => err,
        other => KeyError::DecryptionFailed(other.to_string()).into(),
    }
}

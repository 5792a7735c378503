//! Cryptographic operations.
//!
//! Two kinds of encryption live here:
//!
//! - **Payload encryption**: symmetric AEAD under the 32-byte organization
//!   key ([`OrgKey`]). Every secret value goes through this.
//! - **Key wrapping**: age x25519 and passphrase envelopes, used once at
//!   login to recover the holder's private key and the organization key.
//!
//! ## Adding a New Payload Cipher
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file (e.g., `chacha.rs`)
//! 3. Re-export from this module

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::core::constants::ORG_KEY_LEN;
use crate::error::{PayloadError, Result};

mod aead;
pub mod age;

pub use aead::Aes256;

/// Symmetric payload cipher.
///
/// Implementations must be authenticated: opening a tampered buffer or
/// opening with the wrong key fails rather than returning garbage.
pub trait Cipher {
    /// Seal plaintext bytes. The output carries everything needed to open
    /// it again (nonce included).
    ///
    /// # Errors
    ///
    /// Returns `PayloadError::Encryption` if sealing fails.
    fn encrypt(&self, plaintext: &[u8], key: &OrgKey) -> Result<Vec<u8>>;

    /// Open a sealed buffer.
    ///
    /// # Errors
    ///
    /// Returns `PayloadError::Decryption` on a bad key, tampered data or a
    /// malformed envelope.
    fn decrypt(&self, sealed: &[u8], key: &OrgKey) -> Result<Vec<u8>>;
}

/// The 32-byte organization key.
///
/// Zeroed on drop. `Debug` never prints key material.
#[derive(Clone)]
pub struct OrgKey(Zeroizing<[u8; ORG_KEY_LEN]>);

impl OrgKey {
    /// Build a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `PayloadError::InvalidKey` unless `bytes` is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ORG_KEY_LEN {
            return Err(PayloadError::InvalidKey {
                expected: ORG_KEY_LEN,
                actual: bytes.len(),
            }
            .into());
        }
        let mut key = Zeroizing::new([0u8; ORG_KEY_LEN]);
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut key = Zeroizing::new([0u8; ORG_KEY_LEN]);
        rand::rngs::OsRng.fill_bytes(key.as_mut());
        Self(key)
    }

    /// Parse a base64-encoded key.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            BASE64
                .decode(encoded.trim())
                .map_err(|e| PayloadError::Decode(e.to_string()))?,
        );
        Self::from_slice(&bytes)
    }

    /// Base64 form of the key.
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(BASE64.encode(self.0.as_ref()))
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; ORG_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for OrgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OrgKey(<redacted>)")
    }
}

/// Seal bytes with the default payload cipher.
///
/// This is a convenience wrapper around `Aes256::encrypt`.
pub fn encrypt(plaintext: &[u8], key: &OrgKey) -> Result<Vec<u8>> {
    Aes256.encrypt(plaintext, key)
}

/// Open bytes sealed by [`encrypt`].
///
/// This is a convenience wrapper around `Aes256::decrypt`.
pub fn decrypt(sealed: &[u8], key: &OrgKey) -> Result<Vec<u8>> {
    Aes256.decrypt(sealed, key)
}

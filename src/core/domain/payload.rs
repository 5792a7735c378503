//! Payload type.
//!
//! One secret value plus its representation flags. The `encoded` flag is
//! the source of truth for whether `value` holds base64 text: nothing here
//! sniffs the content to guess.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::core::cipher::{self, OrgKey};
use crate::error::{PayloadError, Result};

/// A secret value with its encoding and sync-routing flags.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    value: String,
    #[serde(default)]
    encoded: bool,
    #[serde(default)]
    exposable: bool,
}

impl Payload {
    /// Create a plain (not encoded) payload.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            encoded: false,
            exposable: false,
        }
    }

    /// Create a payload whose value is already base64 text, as received
    /// from the wire.
    pub fn from_encoded(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            encoded: true,
            exposable: false,
        }
    }

    /// Current value, in whatever representation the flags say.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether `value` currently holds base64 text.
    pub fn is_encoded(&self) -> bool {
        self.encoded
    }

    /// Whether this value may be synced to destinations as a plain variable.
    pub fn is_exposable(&self) -> bool {
        self.exposable
    }

    /// Base64-encode the value. No-op if already encoded.
    pub fn encode(&mut self) {
        if self.encoded {
            return;
        }
        self.value = BASE64.encode(self.value.as_bytes());
        self.encoded = true;
    }

    /// Base64-decode the value. No-op if not encoded.
    ///
    /// # Errors
    ///
    /// Returns `PayloadError::Decode` if the value is not valid base64 or
    /// does not decode to UTF-8. The payload is left unchanged on error.
    pub fn decode(&mut self) -> Result<()> {
        if !self.encoded {
            return Ok(());
        }
        let bytes = BASE64
            .decode(self.value.as_bytes())
            .map_err(|e| PayloadError::Decode(e.to_string()))?;
        self.value = String::from_utf8(bytes).map_err(|e| PayloadError::Decode(e.to_string()))?;
        self.encoded = false;
        Ok(())
    }

    /// Encrypt the value under the organization key.
    ///
    /// An encoded payload is decoded first. On success the value holds
    /// `base64(nonce || ciphertext)` and the payload is marked encoded.
    ///
    /// # Errors
    ///
    /// Returns `PayloadError::Decode` if the implicit decode fails, or
    /// `PayloadError::Encryption` if sealing fails.
    pub fn encrypt(&mut self, key: &OrgKey) -> Result<()> {
        self.decode()?;
        let sealed = cipher::encrypt(self.value.as_bytes(), key)?;
        self.value = BASE64.encode(sealed);
        self.encoded = true;
        Ok(())
    }

    /// Decrypt a value produced by [`Payload::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns `PayloadError::Decryption` if the payload is not in encoded
    /// form, the envelope is malformed, the key is wrong, or the ciphertext
    /// was tampered with.
    pub fn decrypt(&mut self, key: &OrgKey) -> Result<()> {
        if !self.encoded {
            return Err(PayloadError::Decryption("payload is not encoded".to_string()).into());
        }
        let sealed = BASE64
            .decode(self.value.as_bytes())
            .map_err(|e| PayloadError::Decryption(format!("malformed envelope: {}", e)))?;
        let plaintext = cipher::decrypt(&sealed, key)?;
        self.value = String::from_utf8(plaintext)
            .map_err(|e| PayloadError::Decryption(format!("UTF-8 error: {}", e)))?;
        self.encoded = false;
        Ok(())
    }

    /// Flag the value as base64 without transforming it.
    pub fn mark_encoded(&mut self) {
        self.encoded = true;
    }

    /// Flag the value as plain without transforming it.
    pub fn mark_decoded(&mut self) {
        self.encoded = false;
    }

    /// Allow syncing this value as a plain variable.
    pub fn mark_exposable(&mut self) {
        self.exposable = true;
    }

    /// Route this value as a secret.
    pub fn mark_not_exposable(&mut self) {
        self.exposable = false;
    }

    /// Consume the payload, returning its value.
    pub fn into_value(self) -> String {
        self.value
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload")
            .field("value", &"<redacted>")
            .field("encoded", &self.encoded)
            .field("exposable", &self.exposable)
            .finish()
    }
}

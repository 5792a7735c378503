//! AES-256-GCM payload cipher.
//!
//! Sealed layout is `nonce (12 bytes) || ciphertext+tag`.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use tracing::trace;

use super::{Cipher, OrgKey};
use crate::core::constants::NONCE_LEN;
use crate::error::{PayloadError, Result};

/// AES-256-GCM with a random 96-bit nonce per seal.
pub struct Aes256;

impl Cipher for Aes256 {
    fn encrypt(&self, plaintext: &[u8], key: &OrgKey) -> Result<Vec<u8>> {
        trace!(plaintext_len = plaintext.len(), "sealing");

        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| PayloadError::Encryption(format!("{}", e)))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| PayloadError::Encryption(format!("{}", e)))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        trace!(sealed_len = sealed.len(), "sealed");
        Ok(sealed)
    }

    fn decrypt(&self, sealed: &[u8], key: &OrgKey) -> Result<Vec<u8>> {
        trace!(sealed_len = sealed.len(), "opening");

        if sealed.len() < NONCE_LEN {
            return Err(PayloadError::Decryption(format!(
                "sealed value too short ({} bytes)",
                sealed.len()
            ))
            .into());
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| PayloadError::Decryption(format!("{}", e)))?;

        cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| {
                PayloadError::Decryption("invalid key or corrupted data".to_string()).into()
            })
    }
}

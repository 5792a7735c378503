//! Age key wrapping.
//!
//! The holder's private key travels encrypted under their password
//! (scrypt passphrase envelope) and the organization key travels
//! encrypted to the holder's x25519 public key. Both use ASCII armor.

use std::io::{Read, Write};

use ::age::secrecy::SecretString;
use ::age::x25519;
use tracing::trace;
use zeroize::Zeroizing;

use crate::error::{KeyError, Result};

/// Encrypt bytes to a single x25519 recipient.
///
/// # Errors
///
/// Returns `KeyError::EncryptionFailed` if encryption fails at any stage.
pub fn encrypt_to(plaintext: &[u8], recipient: &x25519::Recipient) -> Result<String> {
    trace!(plaintext_len = plaintext.len(), "wrapping for recipient");

    let encryptor =
        age::Encryptor::with_recipients(std::iter::once(recipient as &dyn age::Recipient))
            .map_err(|e| KeyError::EncryptionFailed(format!("{}", e)))?;
    armor(encryptor, plaintext)
}

/// Decrypt an armored x25519 envelope.
///
/// # Errors
///
/// Returns `KeyError::DecryptionFailed` if the envelope is malformed or was
/// not encrypted to `identity`.
pub fn decrypt_with(armored: &str, identity: &x25519::Identity) -> Result<Zeroizing<Vec<u8>>> {
    trace!(armored_len = armored.len(), "unwrapping with identity");
    dearmor(armored, identity)
}

/// Encrypt bytes under a passphrase.
///
/// # Errors
///
/// Returns `KeyError::EncryptionFailed` if encryption fails at any stage.
pub fn seal_with_passphrase(plaintext: &[u8], passphrase: &str) -> Result<String> {
    trace!(plaintext_len = plaintext.len(), "sealing with passphrase");

    let encryptor =
        age::Encryptor::with_user_passphrase(SecretString::from(passphrase.to_string()));
    armor(encryptor, plaintext)
}

/// Decrypt an armored passphrase envelope.
///
/// # Errors
///
/// Returns `KeyError::DecryptionFailed` on a wrong passphrase or corrupted
/// envelope.
pub fn open_with_passphrase(armored: &str, passphrase: &str) -> Result<Zeroizing<Vec<u8>>> {
    trace!(armored_len = armored.len(), "opening with passphrase");

    let identity = age::scrypt::Identity::new(SecretString::from(passphrase.to_string()));
    dearmor(armored, &identity)
}

/// Parse a public key string into an age recipient.
///
/// # Errors
///
/// Returns `KeyError::DecryptionFailed` if the key format is invalid.
pub fn parse_recipient(key: &str) -> Result<x25519::Recipient> {
    key.trim()
        .parse::<x25519::Recipient>()
        .map_err(|_| KeyError::DecryptionFailed(format!("invalid public key: {}", key)).into())
}

/// Parse an `AGE-SECRET-KEY-...` string into an identity.
///
/// # Errors
///
/// Returns `KeyError::DecryptionFailed` if the key format is invalid.
pub fn parse_identity(key: &str) -> Result<x25519::Identity> {
    key.trim()
        .parse::<x25519::Identity>()
        .map_err(|e: &str| {
            KeyError::DecryptionFailed(format!("invalid private key: {}", e)).into()
        })
}

fn armor(encryptor: age::Encryptor, plaintext: &[u8]) -> Result<String> {
    let mut encrypted = Vec::new();
    let mut writer = encryptor
        .wrap_output(age::armor::ArmoredWriter::wrap_output(
            &mut encrypted,
            age::armor::Format::AsciiArmor,
        )?)
        .map_err(|e| KeyError::EncryptionFailed(format!("{}", e)))?;

    writer.write_all(plaintext)?;
    let armored = writer
        .finish()
        .map_err(|e| KeyError::EncryptionFailed(format!("{}", e)))?;
    armored
        .finish()
        .map_err(|e| KeyError::EncryptionFailed(format!("armor: {}", e)))?;

    String::from_utf8(encrypted)
        .map_err(|e| KeyError::EncryptionFailed(format!("UTF-8 error: {}", e)).into())
}

fn dearmor(armored: &str, identity: &dyn age::Identity) -> Result<Zeroizing<Vec<u8>>> {
    let reader = age::armor::ArmoredReader::new(armored.as_bytes());
    let decryptor =
        age::Decryptor::new(reader).map_err(|e| KeyError::DecryptionFailed(format!("{}", e)))?;

    let mut reader = decryptor
        .decrypt(std::iter::once(identity))
        .map_err(|e| KeyError::DecryptionFailed(format!("{}", e)))?;

    let mut decrypted = Zeroizing::new(Vec::new());
    reader
        .read_to_end(&mut decrypted)
        .map_err(|e| KeyError::DecryptionFailed(format!("{}", e)))?;

    Ok(decrypted)
}

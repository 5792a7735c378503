//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// Opaque identifier of a remote secret.
pub type SecretId = String;

/// Opaque identifier of a user account.
pub type UserId = String;

/// Opaque identifier of an environment.
pub type EnvId = String;

/// An age public key string (starts with "age1...").
pub type PublicKey = String;

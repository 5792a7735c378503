//! Envseal - client-side encrypted secrets with a self-refreshing API client.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── pull          # Fetch, decrypt and export a secret
//! │   ├── push          # Encrypt and upload a .env file
//! │   ├── list          # Secrets of an environment
//! │   ├── whoami        # Show the stored session
//! │   └── logout        # Forget stored credentials
//! └── core/             # Core library components
//!     ├── config        # Endpoint and storage settings
//!     ├── cipher/       # Encryption
//!     │   ├── mod       # Cipher trait and organization key
//!     │   ├── aead      # AES-256-GCM payload sealing
//!     │   └── age       # Key wrapping for login
//!     ├── domain/       # Payload, KPMap, KVMap, Secret
//!     ├── keys          # Key bootstrap at login
//!     ├── store/        # Credential storage
//!     │   ├── mod       # CredentialStore trait
//!     │   ├── fs        # YAML files on disk
//!     │   └── memory    # In-process storage
//!     └── client/       # Authenticated API client
//!         ├── mod       # Transport trait and refresh-and-retry
//!         ├── http      # reqwest transport
//!         ├── auth      # Token refresh
//!         ├── graphql   # Typed queries over the same client
//!         └── secrets   # Remote secret operations
//! ```
//!
//! # Features
//!
//! - Values sealed with a 32-byte organization key before they leave the process
//! - Thread-safe key/payload maps with real deep copies
//! - One transparent token refresh per request, persisted before the retry
//! - Refreshes serialized per client
//! - dotenv and JSON export

pub mod cli;
pub mod core;
pub mod error;

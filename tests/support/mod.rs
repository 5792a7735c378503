//! Test support utilities for envseal integration tests.
//!
//! Provides an isolated home directory with seeded credentials, a local
//! HTTP server standing in for the API, and command helpers.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod server;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use server::*;

use std::path::PathBuf;

use envseal::core::cipher::{age, OrgKey};
use envseal::core::store::{
    AccountSession, CredentialStore, Filesystem, Keys, ProjectBinding, User,
};
use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own project dir and home dir. No process-global
/// state is mutated; child processes get their environment explicitly so
/// tests can safely run in parallel.
pub struct Test {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
    /// API base URL handed to the binary
    pub api_url: String,
}

impl Test {
    /// Create a new empty test environment pointed at an unreachable API.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self {
            dir,
            home,
            api_url: "http://127.0.0.1:9".to_string(),
        }
    }

    /// Create a test environment whose API is `server`.
    pub fn with_server(server: &MockServer) -> Self {
        let mut t = Self::new();
        t.api_url = server.url();
        t
    }

    /// Credentials directory used by the binary.
    pub fn credentials_dir(&self) -> PathBuf {
        self.home.path().join(".envseal").join("credentials")
    }

    /// Store for the credentials directory.
    pub fn store(&self) -> Filesystem {
        Filesystem::new(self.credentials_dir())
    }

    /// Seed a signed-in session with fresh keys holding `org_key`.
    pub fn sign_in(&self, org_key: &OrgKey) -> Keys {
        self.sign_in_as("user_1", "access-1", org_key)
    }

    /// Seed a session for `user` with `access_token`.
    pub fn sign_in_as(&self, user: &str, access_token: &str, org_key: &OrgKey) -> Keys {
        let identity = ::age::x25519::Identity::generate();
        let keys = Keys::from_identity(&identity);
        let sealed = age::encrypt_to(org_key.as_bytes(), &identity.to_public())
            .expect("failed to seal org key");

        let session = AccountSession {
            access_token: access_token.to_string(),
            refresh_token: "refresh-1".to_string(),
            user: User {
                id: user.to_string(),
                email: format!("{}@example.com", user),
            },
            encrypted_org_key: Some(sealed),
        };

        let store = self.store();
        store.save(&session.into()).expect("failed to save session");
        store.save(&keys.clone().into()).expect("failed to save keys");
        keys
    }

    /// Seed a project binding.
    pub fn bind(&self, secret_id: &str, env_id: &str) {
        let binding = ProjectBinding {
            secret_id: secret_id.to_string(),
            env_id: env_id.to_string(),
        };
        self.store()
            .save(&binding.into())
            .expect("failed to save binding");
    }

    /// Write a file into the project directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("failed to write file");
        path
    }
}

//! Command-line interface.

pub mod list;
pub mod logout;
pub mod output;
pub mod pull;
pub mod push;
pub mod whoami;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use crate::core::cipher::OrgKey;
use crate::core::client::{ResilientClient, SecretsApi};
use crate::core::config::Settings;
use crate::core::keys;
use crate::core::store::{CredentialKind, CredentialStore, Filesystem};
use crate::error::{ClientError, Error, ErrorKind, Result, StoreError};

/// Envseal - client-side encrypted secrets.
#[derive(Parser)]
#[command(
    name = "envseal",
    about = "Client-side encrypted secrets for your environments",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ~/.envseal/config.toml)
    #[arg(long, global = true, env = "ENVSEAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Log line format.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Export format for pulled values.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// KEY=value lines
    Env,
    /// JSON object
    Json,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Fetch a secret, decrypt it and print its values
    Pull {
        /// Secret identifier
        secret_id: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Env)]
        format: Format,
    },

    /// Encrypt a .env file and upload it as a secret
    Push {
        /// Secret identifier
        secret_id: String,
        /// Path to .env file
        #[arg(short, long)]
        file: PathBuf,
        /// Keys that may be synced as plain variables
        #[arg(long, num_args = 1..)]
        exposable: Vec<String>,
    },

    /// List secrets in an environment
    List {
        /// Environment (default: the project binding's)
        #[arg(long)]
        env: Option<String>,
    },

    /// Show the signed-in account
    Whoami,

    /// Forget the stored session and keys
    Logout,
}

/// Shared state for a command invocation.
pub struct Context {
    pub settings: Settings,
    pub store: Arc<dyn CredentialStore>,
}

impl Context {
    /// Load settings and open the credential store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if settings are invalid, or `StoreError::NoHome`
    /// if no credentials directory can be resolved.
    pub fn load(config: Option<PathBuf>) -> Result<Self> {
        let settings = Settings::load(config.as_deref())?;
        let store = Filesystem::new(settings.credentials_dir()?);
        Ok(Self {
            settings,
            store: Arc::new(store),
        })
    }

    /// Secrets API over the configured endpoints.
    pub fn api(&self) -> Result<SecretsApi> {
        let client = ResilientClient::from_settings(&self.settings, self.store.clone())?;
        SecretsApi::new(Arc::new(client), &self.settings)
    }

    /// Unwrap the organization key with the stored keys and session.
    pub fn org_key(&self) -> Result<OrgKey> {
        let keys = self.store.keys()?;
        let session = self.store.session()?;
        keys::unwrap_org_key(&keys, &session)
    }
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    use Command::*;

    let ctx = Context::load(cli.config)?;

    match cli.command {
        Pull { secret_id, format } => block_on(pull::execute(&ctx, &secret_id, format)),
        Push {
            secret_id,
            file,
            exposable,
        } => block_on(push::execute(&ctx, &secret_id, &file, &exposable)),
        List { env } => block_on(list::execute(&ctx, env)),
        Whoami => whoami::execute(&ctx),
        Logout => logout::execute(&ctx),
    }
}

/// Suggested next step for an error, if there is one.
pub fn hint(err: &Error) -> Option<&'static str> {
    match err {
        Error::Store(StoreError::NotFound(kind))
            if *kind == CredentialKind::ProjectBinding.name() =>
        {
            Some("pass --env, or bind this project to an environment")
        }
        Error::Store(StoreError::NotFound(_)) => Some("sign in to store a session and keys"),
        Error::Client(ClientError::Status { status: 404, .. }) => {
            Some("check the secret id, or push to create it")
        }
        _ => match err.kind() {
            ErrorKind::Unauthenticated | ErrorKind::RefreshFailed => {
                Some("your session has expired, sign in again")
            }
            ErrorKind::KeyDecryptionFailed => {
                Some("stored keys do not match this account, sign in again")
            }
            ErrorKind::Decryption => Some("the organization key may have been rotated"),
            ErrorKind::PermissionDenied => Some("ask an owner for access to this secret"),
            _ => None,
        },
    }
}

fn block_on<F: Future<Output = Result<()>>>(future: F) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(future)
}

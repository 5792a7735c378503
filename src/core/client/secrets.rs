//! Remote secret operations.
//!
//! Values never leave the process in plaintext: `push` sends an encrypted
//! copy of the secret, and `pull` returns the secret as stored remotely,
//! still encrypted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{GraphQlClient, Method, ResilientClient};
use crate::core::cipher::OrgKey;
use crate::core::config::Settings;
use crate::core::domain::Secret;
use crate::core::types::{EnvId, SecretId};
use crate::error::{ConfigError, Result};

const LIST_SECRETS: &str = "query Secrets($envId: ID!) { \
    secrets(envId: $envId) { id envId version updatedAt } }";

/// One value as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretValue {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub exposable: bool,
}

/// Listing entry for a secret.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretSummary {
    pub id: SecretId,
    pub env_id: EnvId,
    #[serde(default)]
    pub version: Option<u64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct PushRequest<'a> {
    env_id: &'a str,
    version: Option<u64>,
    values: Vec<SecretValue>,
}

#[derive(Deserialize)]
struct SecretsData {
    secrets: Vec<SecretSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListVariables<'a> {
    env_id: &'a str,
}

/// Secrets endpoints.
pub struct SecretsApi {
    client: Arc<ResilientClient>,
    graphql: GraphQlClient,
    api_url: Url,
}

impl SecretsApi {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `api_url` does not parse.
    pub fn new(client: Arc<ResilientClient>, settings: &Settings) -> Result<Self> {
        let api_url = Url::parse(&settings.api_url).map_err(|e| ConfigError::InvalidValue {
            field: "api_url",
            reason: e.to_string(),
        })?;
        Ok(Self {
            graphql: GraphQlClient::new(client.clone(), settings.graphql_url.clone()),
            client,
            api_url,
        })
    }

    /// Fetch a secret. Values come back encrypted.
    ///
    /// # Errors
    ///
    /// Any client error; a missing secret is `ClientError::Status` with 404.
    pub async fn pull(&self, id: &str) -> Result<Secret> {
        debug!(secret = id, "pulling secret");
        let url = self.secret_url(id)?;
        self.client
            .send_json::<(), Secret>(Method::GET, url.as_str(), None)
            .await
    }

    /// Push `secret` encrypted under `key`.
    ///
    /// The local version is bumped before sending, and `secret` itself
    /// keeps its plaintext values. Returns the secret as the server
    /// stored it.
    ///
    /// # Errors
    ///
    /// Encryption errors, or any client error.
    pub async fn push(&self, secret: &mut Secret, key: &OrgKey) -> Result<Secret> {
        secret.increment_version();
        secret.touch();

        let sealed = secret.encrypted(key)?;
        let values = sealed
            .data()
            .entries()
            .into_iter()
            .map(|(key, payload)| SecretValue {
                exposable: payload.is_exposable(),
                value: payload.into_value(),
                key,
            })
            .collect();

        let body = PushRequest {
            env_id: sealed.env_id(),
            version: sealed.version(),
            values,
        };
        debug!(secret = %sealed, values = sealed.data().len(), "pushing secret");

        let url = self.secret_url(sealed.id())?;
        self.client
            .send_json(Method::PUT, url.as_str(), Some(&body))
            .await
    }

    /// List secrets in an environment.
    ///
    /// # Errors
    ///
    /// Any client or GraphQL error.
    pub async fn list(&self, env_id: &str) -> Result<Vec<SecretSummary>> {
        let data: SecretsData = self
            .graphql
            .query(LIST_SECRETS, ListVariables { env_id })
            .await?;
        Ok(data.secrets)
    }

    fn secret_url(&self, id: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidValue {
                field: "api_url",
                reason: "cannot be used as a base URL".to_string(),
            })?
            .pop_if_empty()
            .push("secrets")
            .push(id);
        Ok(url)
    }
}

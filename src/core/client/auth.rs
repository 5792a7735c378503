//! Token refresh.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::build_client;
use crate::core::config::Settings;
use crate::core::store::User;
use crate::error::{ClientError, Result};

/// A refreshed token pair.
#[derive(Clone, Deserialize)]
pub struct Refreshed {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

impl std::fmt::Debug for Refreshed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refreshed")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Exchanges a refresh token for a new session.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn refresh_token(&self, refresh_token: &str) -> Result<Refreshed>;
}

/// Refresh against `{auth_url}/token/refresh`.
pub struct HttpAuthenticator {
    http: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

impl HttpAuthenticator {
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the HTTP client cannot be built.
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            http: build_client(settings)?,
            url: settings.refresh_url(),
        })
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn refresh_token(&self, refresh_token: &str) -> Result<Refreshed> {
        debug!(url = %self.url, "requesting token refresh");

        let response = self
            .http
            .post(&self.url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ClientError::Unauthenticated.into());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(response.json::<Refreshed>().await?)
    }
}

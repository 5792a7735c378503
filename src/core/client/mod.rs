//! Authenticated API client.
//!
//! [`ResilientClient`] wraps a [`Transport`] and attaches the stored access
//! token to every request. When the server answers `401`, the client
//! refreshes the session through an [`Authenticator`], writes the new
//! session to the [`CredentialStore`], and resends the same request once.
//! A second rejection is final.
//!
//! Refreshes are serialized per client. A task that waited on another
//! task's refresh reuses the stored token instead of refreshing again.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::config::Settings;
use crate::core::store::{AccountSession, CredentialStore};
use crate::error::{ClientError, Error, Result, StoreError};

mod auth;
mod graphql;
mod http;
mod secrets;

pub use auth::{Authenticator, HttpAuthenticator, Refreshed};
pub use graphql::GraphQlClient;
pub use http::HttpTransport;
pub use reqwest::Method;
pub use secrets::{SecretSummary, SecretValue, SecretsApi};

/// One initial send plus one retry after a refresh.
const MAX_ATTEMPTS: usize = 2;

const CONTENT_TYPE_JSON: &str = "application/json";

/// An outbound request with a buffered body.
///
/// The body is captured once so it can be resent after a rejected attempt.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Bytes,
    pub content_type: Option<&'static str>,
    pub bearer: Option<String>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: Bytes::new(),
            content_type: None,
            bearer: None,
        }
    }

    /// Set a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let encoded = serde_json::to_vec(body)
            .map_err(|e| ClientError::Transport(format!("failed to encode request: {}", e)))?;
        self.body = Bytes::from(encoded);
        self.content_type = Some(CONTENT_TYPE_JSON);
        Ok(self)
    }

    fn with_bearer(&self, token: Option<&str>) -> Self {
        let mut request = self.clone();
        request.bearer = token.map(str::to_string);
        request
    }
}

/// A received response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::MalformedResponse` if the body does not parse.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()).into())
    }

    /// Turn a non-2xx response into `ClientError::Status`.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Status {
                status: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            }
            .into())
        }
    }
}

/// Request/response transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return whatever status the server answered.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` on network failure only; HTTP error
    /// statuses are successful sends.
    async fn send(&self, request: &Request) -> Result<Response>;
}

/// Transport wrapper with transparent token refresh.
pub struct ResilientClient {
    transport: Arc<dyn Transport>,
    auth: Arc<dyn Authenticator>,
    store: Arc<dyn CredentialStore>,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl ResilientClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        auth: Arc<dyn Authenticator>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            transport,
            auth,
            store,
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Client over HTTP for the endpoints in `settings`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the HTTP client cannot be built.
    pub fn from_settings(settings: &Settings, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let transport = HttpTransport::new(settings)?;
        let auth = HttpAuthenticator::new(settings)?;
        Ok(Self::new(Arc::new(transport), Arc::new(auth), store))
    }

    /// Send `request` with the stored bearer token.
    ///
    /// Non-2xx responses other than `401` and `403` are returned as-is.
    ///
    /// # Errors
    ///
    /// - `ClientError::Unauthenticated` if there is no session, or the retry
    ///   after a refresh was rejected too
    /// - `ClientError::RefreshFailed` if the refresh call failed
    /// - `ClientError::PermissionDenied` on `403`
    /// - `ClientError::Transport` on network failure
    pub async fn send(&self, request: Request) -> Result<Response> {
        let mut token = self.stored_token()?;

        for attempt in 1..=MAX_ATTEMPTS {
            let outbound = request.with_bearer(token.as_deref());
            debug!(
                method = %outbound.method,
                url = %outbound.url,
                attempt,
                "sending request"
            );
            let response = self.transport.send(&outbound).await?;

            match response.status {
                401 => {
                    let Some(rejected) = token.take() else {
                        debug!("rejected without a session");
                        return Err(ClientError::Unauthenticated.into());
                    };
                    if attempt == MAX_ATTEMPTS {
                        warn!("request rejected after token refresh");
                        return Err(ClientError::Unauthenticated.into());
                    }
                    token = Some(self.refresh(&rejected).await?);
                }
                403 => return Err(ClientError::PermissionDenied.into()),
                status => {
                    debug!(status, "response received");
                    return Ok(response);
                }
            }
        }

        Err(ClientError::Unauthenticated.into())
    }

    /// Send a JSON request and parse a JSON response.
    ///
    /// # Errors
    ///
    /// As [`send`](Self::send), plus `ClientError::Status` for other
    /// non-2xx responses and `ClientError::MalformedResponse` if the body
    /// does not parse as `T`.
    pub async fn send_json<B, T>(&self, method: Method, url: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = Request::new(method, url);
        if let Some(body) = body {
            request = request.json(body)?;
        }
        self.send(request).await?.error_for_status()?.json()
    }

    fn stored_token(&self) -> Result<Option<String>> {
        match self.store.session() {
            Ok(session) => Ok(Some(session.access_token)),
            Err(Error::Store(StoreError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Refresh the session whose access token was `rejected` and return the
    /// token to retry with.
    async fn refresh(&self, rejected: &str) -> Result<String> {
        let _guard = self.refresh_lock.lock().await;

        let session = match self.store.session() {
            Ok(session) => session,
            Err(Error::Store(StoreError::NotFound(_))) => {
                return Err(ClientError::Unauthenticated.into())
            }
            Err(e) => return Err(e),
        };
        if session.access_token != rejected {
            debug!("session already refreshed, reusing stored token");
            return Ok(session.access_token);
        }

        debug!(user = %session.user.id, "refreshing session");
        let refreshed = self
            .auth
            .refresh_token(&session.refresh_token)
            .await
            .map_err(|e| ClientError::RefreshFailed {
                source: Box::new(e),
            })?;

        let updated = AccountSession {
            access_token: refreshed.access_token,
            refresh_token: refreshed.refresh_token,
            user: refreshed.user,
            encrypted_org_key: session.encrypted_org_key,
        };
        self.store.save(&updated.clone().into())?;
        info!(user = %updated.user.id, "session refreshed");

        Ok(updated.access_token)
    }
}

//! HTTP transport over reqwest.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use super::{Request, Response, Transport};
use crate::core::config::Settings;
use crate::error::{ClientError, Result};

pub(crate) fn build_client(settings: &Settings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(settings.timeout())
        .user_agent(settings.user_agent.clone())
        .build()
        .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {}", e)).into())
}

/// Sends requests with a shared reqwest client.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the HTTP client cannot be built.
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            http: build_client(settings)?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> Result<Response> {
        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .body(request.body.clone());

        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(token) = &request.bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(Response { status, body })
    }
}

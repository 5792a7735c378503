//! GraphQL over the resilient client.
//!
//! Queries and mutations go out as `{query, variables}` and come back as
//! `{data, errors}`. Authentication and refresh behave exactly as for
//! plain JSON requests.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Method, ResilientClient};
use crate::error::{ClientError, Result};

#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

/// Typed GraphQL client.
#[derive(Clone)]
pub struct GraphQlClient {
    client: Arc<ResilientClient>,
    url: String,
}

impl GraphQlClient {
    pub fn new(client: Arc<ResilientClient>, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Run a query or mutation and decode `data` as `T`.
    ///
    /// Errors returned alongside data are logged and the data is used.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::GraphQl` if the server answered with errors
    /// and no data, `ClientError::MalformedResponse` if it answered with
    /// neither, plus any error from
    /// [`ResilientClient::send_json`](super::ResilientClient::send_json).
    pub async fn query<V, T>(&self, query: &str, variables: V) -> Result<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let request = GraphQlRequest { query, variables };
        let response: GraphQlResponse<T> = self
            .client
            .send_json(Method::POST, &self.url, Some(&request))
            .await?;

        let messages = response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        match response.data {
            Some(data) => {
                if !messages.is_empty() {
                    warn!(errors = %messages, "graphql response carried errors");
                }
                Ok(data)
            }
            None if !messages.is_empty() => Err(ClientError::GraphQl(messages).into()),
            None => Err(ClientError::MalformedResponse(
                "graphql response has neither data nor errors".to_string(),
            )
            .into()),
        }
    }
}

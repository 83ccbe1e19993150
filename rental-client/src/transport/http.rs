//! HTTP transport backed by reqwest.

use super::{Transport, TransportError};
use crate::config::ApiConfig;
use crate::session::SessionStore;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Header carrying the session token on authenticated requests.
pub const TOKEN_HEADER: &str = "X-Token";

/// reqwest-based [`Transport`].
///
/// Reads the current token from the session store on every request, so a
/// login or logout takes effect for the very next call.
pub struct HttpTransport {
    base_url: String,
    client: Client,
    session: Arc<dyn SessionStore>,
}

impl HttpTransport {
    /// Create a transport for `base_url` with a per-request timeout.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            session,
        })
    }

    /// Create a transport from the `[api]` config section.
    pub fn from_config(
        config: &ApiConfig,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, TransportError> {
        Self::new(&config.base_url, config.timeout(), session)
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, TransportError> {
        let request = match self.session.token().await {
            Ok(Some(token)) => request.header(TOKEN_HEADER, token),
            Ok(None) => request,
            Err(e) => {
                tracing::warn!("Could not read session token: {}", e);
                request
            }
        };

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_string()
            } else {
                body
            };
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn read_json(response: Response) -> Result<Value, TransportError> {
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        tracing::debug!("GET {}", path);
        let response = self.execute(self.client.get(self.url_for(path))).await?;
        Self::read_json(response).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, TransportError> {
        tracing::debug!("POST {}", path);
        let mut request = self.client.post(self.url_for(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = self.execute(request).await?;
        Self::read_json(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), TransportError> {
        tracing::debug!("DELETE {}", path);
        self.execute(self.client.delete(self.url_for(path))).await?;
        Ok(())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_decode() {
        TransportError::Decode(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}

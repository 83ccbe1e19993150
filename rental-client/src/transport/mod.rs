//! Transport abstraction for the rental API.
//!
//! This module provides a pluggable transport layer that abstracts
//! the underlying HTTP client (reqwest, mock for testing).
//!
//! # Design
//!
//! The transport trait is async and resource-oriented:
//! - `get()` reads a resource and returns its decoded JSON payload
//! - `post()` sends an optional JSON body and returns the decoded reply
//! - `delete()` removes a resource, success/failure only
//!
//! Paths are relative (`offers/42/nearby`); the base URL, headers and the
//! session token are the implementation's business. Typed decoding happens
//! in [`fetch`] and [`send`], so every implementation only deals in
//! [`serde_json::Value`].
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new();
//! transport.set_response(Method::Get, "offers", json!([]));
//! let offers: Vec<Offer> = fetch(&transport, &ApiRoute::Offers).await?;
//! ```

mod http;
mod mock;
mod routes;

pub use http::{HttpTransport, TOKEN_HEADER};
pub use mock::{MockTransport, RecordedRequest};
pub use routes::ApiRoute;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Server unreachable or connection dropped.
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Server answered with a non-2xx status.
    #[error("http status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Request body could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Response payload did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl TransportError {
    /// Check if the server rejected the request for lack of a session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TransportError::Status { status: 401, .. })
    }
}

/// HTTP verb used by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read.
    Get,
    /// Create / act.
    Post,
    /// Remove.
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// Transport trait for talking to the rental API.
///
/// Implementations handle the underlying connection mechanism
/// (reqwest, mock, etc). They must be safe to share between concurrently
/// running orchestrators.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Read a resource.
    async fn get(&self, path: &str) -> Result<Value, TransportError>;

    /// Post to a resource with an optional JSON body.
    ///
    /// An empty reply decodes to [`Value::Null`].
    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, TransportError>;

    /// Delete a resource.
    async fn delete(&self, path: &str) -> Result<(), TransportError>;
}

/// GET a route and decode the payload into `T`.
pub async fn fetch<T>(transport: &dyn Transport, route: &ApiRoute) -> Result<T, TransportError>
where
    T: DeserializeOwned,
{
    let value = transport.get(&route.to_string()).await?;
    decode(route, value)
}

/// POST `body` to a route and decode the reply into `T`.
pub async fn send<B, T>(
    transport: &dyn Transport,
    route: &ApiRoute,
    body: &B,
) -> Result<T, TransportError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let body = serde_json::to_value(body).map_err(|e| TransportError::Encode(e.to_string()))?;
    let value = transport.post(&route.to_string(), Some(body)).await?;
    decode(route, value)
}

fn decode<T: DeserializeOwned>(route: &ApiRoute, value: Value) -> Result<T, TransportError> {
    serde_json::from_value(value)
        .map_err(|e| TransportError::Decode(format!("{}: {}", route, e)))
}

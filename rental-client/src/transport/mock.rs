//! Mock transport for testing.
//!
//! Allows scripting responses per route and capturing sent requests for verification.

use super::{Method, Transport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

type RouteKey = (Method, String);
type Outcome = Result<Value, TransportError>;

/// A request captured by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// HTTP verb.
    pub method: Method,
    /// Relative path.
    pub path: String,
    /// JSON body, for POST.
    pub body: Option<Value>,
}

/// Mock transport for testing.
///
/// Every call is recorded. The reply for a `(method, path)` pair comes from,
/// in order: the one-shot queue, the sticky response, then a default
/// (`null` for DELETE, 404 otherwise). Clones share state.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    requests: Vec<RecordedRequest>,
    queued: HashMap<RouteKey, VecDeque<(Outcome, Duration)>>,
    sticky: HashMap<RouteKey, Outcome>,
    delays: HashMap<RouteKey, Duration>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Answer every `(method, path)` request with `value` until changed.
    pub fn set_response(&self, method: Method, path: &str, value: Value) {
        let mut inner = self.lock();
        inner.sticky.insert((method, path.to_string()), Ok(value));
    }

    /// Fail every `(method, path)` request with `error` until changed.
    pub fn fail_always(&self, method: Method, path: &str, error: TransportError) {
        let mut inner = self.lock();
        inner.sticky.insert((method, path.to_string()), Err(error));
    }

    /// Queue a one-shot reply, used before the sticky response.
    pub fn queue_response(&self, method: Method, path: &str, value: Value) {
        self.queue(method, path, Ok(value), Duration::ZERO);
    }

    /// Queue a one-shot reply that arrives after `delay`.
    pub fn queue_delayed_response(&self, method: Method, path: &str, value: Value, delay: Duration) {
        self.queue(method, path, Ok(value), delay);
    }

    /// Cause the next `(method, path)` request to fail with the given error.
    pub fn fail_next(&self, method: Method, path: &str, error: TransportError) {
        self.queue(method, path, Err(error), Duration::ZERO);
    }

    /// Delay every sticky reply for `(method, path)`.
    pub fn set_delay(&self, method: Method, path: &str, delay: Duration) {
        let mut inner = self.lock();
        inner.delays.insert((method, path.to_string()), delay);
    }

    fn queue(&self, method: Method, path: &str, outcome: Outcome, delay: Duration) {
        let mut inner = self.lock();
        inner
            .queued
            .entry((method, path.to_string()))
            .or_default()
            .push_back((outcome, delay));
    }

    /// Get all requests that were sent, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Get the last request that was sent.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.lock().requests.last().cloned()
    }

    /// Number of requests sent to `(method, path)`.
    pub fn request_count(&self, method: Method, path: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Clear all state (requests, queues, responses).
    pub fn reset(&self) {
        let mut inner = self.lock();
        *inner = MockTransportInner::default();
    }

    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Outcome {
        let (outcome, delay) = {
            let mut inner = self.lock();
            inner.requests.push(RecordedRequest {
                method,
                path: path.to_string(),
                body,
            });

            let key = (method, path.to_string());
            let queued = inner.queued.get_mut(&key).and_then(|q| q.pop_front());
            match queued {
                Some(entry) => entry,
                None => {
                    let delay = inner.delays.get(&key).copied().unwrap_or_default();
                    let outcome = match inner.sticky.get(&key) {
                        Some(outcome) => outcome.clone(),
                        None if method == Method::Delete => Ok(Value::Null),
                        None => Err(TransportError::Status {
                            status: 404,
                            message: format!("no mock response for {} {}", method, path),
                        }),
                    };
                    (outcome, delay)
                }
            }
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        self.call(Method::Get, path, None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, TransportError> {
        self.call(Method::Post, path, body).await
    }

    async fn delete(&self, path: &str) -> Result<(), TransportError> {
        self.call(Method::Delete, path, None).await.map(|_| ())
    }
}

//! Deferred clearing of the transient error message.
//!
//! Each scheduled clear is an independent tokio task: scheduling twice means
//! two clears, and whichever `SetError` lands last before a clear fires is
//! the one it wipes. Clears are at-least-once, not debounced.

use rental_core::Action;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::{AbortHandle, JoinHandle};

use crate::store::Store;

/// Default delay before an error message is cleared.
pub const DEFAULT_ERROR_CLEAR_DELAY: Duration = Duration::from_millis(2000);

/// Owns the pending error clears for one store.
#[derive(Debug)]
pub struct ErrorTimer {
    store: Arc<Store>,
    delay: Duration,
    pending: Mutex<Vec<AbortHandle>>,
}

impl ErrorTimer {
    /// Create a timer that clears `store`'s error after `delay`.
    pub fn new(store: Arc<Store>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Set the error message and schedule its clear.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, like [`ErrorTimer::schedule`].
    pub fn report(&self, message: impl Into<String>) -> JoinHandle<()> {
        let message = message.into();
        tracing::debug!("Reporting error: {}", message);
        self.store.dispatch(Action::SetError(Some(message)));
        self.schedule()
    }

    /// Schedule `SetError(None)` after the delay. Does not block.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, since the clear runs as a
    /// spawned task.
    pub fn schedule(&self) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.dispatch(Action::SetError(None));
        });

        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        pending.retain(|h| !h.is_finished());
        pending.push(handle.abort_handle());
        handle
    }

    /// Number of clears not yet fired.
    pub fn pending(&self) -> usize {
        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        pending.retain(|h| !h.is_finished());
        pending.len()
    }

    /// Abort every clear that has not fired yet.
    pub fn cancel_all(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        for handle in pending.drain(..) {
            handle.abort();
        }
    }
}

//! Store - the single state container.
//!
//! Holds the current [`AppState`] snapshot behind a `watch` channel. Every
//! dispatch reduces and swaps the snapshot in one step, so a reader never
//! sees a half-applied action. Dispatched actions are also broadcast, in
//! order, to anyone who subscribed.

use rental_core::{Action, AppState};
use rental_types::Offer;
use tokio::sync::{broadcast, watch};

/// Capacity of the action broadcast; slow subscribers see `Lagged`.
const ACTION_CHANNEL_CAPACITY: usize = 256;

/// State container.
#[derive(Debug)]
pub struct Store {
    state: watch::Sender<AppState>,
    actions: broadcast::Sender<Action>,
}

impl Store {
    /// Create a store holding `initial`.
    pub fn new(initial: AppState) -> Self {
        let (state, _) = watch::channel(initial);
        let (actions, _) = broadcast::channel(ACTION_CHANNEL_CAPACITY);
        Self { state, actions }
    }

    /// Apply one action.
    pub fn dispatch(&self, action: Action) {
        tracing::debug!(action = action.kind(), "dispatch");
        self.apply(vec![action]);
    }

    /// Apply several actions as a single snapshot swap.
    ///
    /// Subscribers of [`Store::subscribe`] observe only the final state;
    /// action subscribers still receive each action in order.
    pub fn dispatch_batch(&self, actions: Vec<Action>) {
        if actions.is_empty() {
            return;
        }
        tracing::debug!(
            actions = ?actions.iter().map(Action::kind).collect::<Vec<_>>(),
            "dispatch batch"
        );
        self.apply(actions);
    }

    fn apply(&self, actions: Vec<Action>) {
        // Broadcast while the watch lock is held so announce order matches
        // apply order across threads.
        self.state.send_modify(|state| {
            let mut next = std::mem::take(state);
            for action in actions {
                // No subscribers is fine
                let _ = self.actions.send(action.clone());
                next = next.on_action(action);
            }
            *state = next;
        });
    }

    /// Clone of the current snapshot.
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Read the current snapshot without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Offers of the selected city, in current display order.
    pub fn visible_offers(&self) -> Vec<Offer> {
        self.with_state(AppState::visible_offers)
    }

    /// Watch snapshots (latest value only).
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    /// Receive every action dispatched from now on, in dispatch order.
    pub fn subscribe_actions(&self) -> broadcast::Receiver<Action> {
        self.actions.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

/// Drain everything currently buffered on an action subscription.
pub fn drain_actions(receiver: &mut broadcast::Receiver<Action>) -> Vec<Action> {
    let mut drained = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(action) => drained.push(action),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!("Action subscriber lagged, {} actions skipped", skipped);
            }
            Err(_) => break,
        }
    }
    drained
}

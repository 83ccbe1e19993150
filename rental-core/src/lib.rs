//! # sixcities-core
//!
//! Pure logic for the six-cities client (no I/O, instant tests).
//!
//! This crate implements the application state, the action vocabulary and
//! the reducer, plus the filter/sort engine that derives the displayed offer
//! list. Nothing here touches the network, the clock or the disk.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (HTTP calls, token persistence, timers) is performed by
//! `sixcities-client`, which dispatches the actions defined here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod offers;
pub mod state;

pub use offers::{filter_offers, group_by_city, sort_offers, SortKey, UnknownSortKey};
pub use state::{reduce, Action, AppState, AuthorizationStatus};

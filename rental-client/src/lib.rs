//! # sixcities-client
//!
//! Client-side state sync for the six-cities rental API.
//!
//! This is the library front-ends use to drive the catalog, offer detail,
//! reviews, favorites and the user session.
//!
//! ## Features
//!
//! - **Single Store**: One [`Store`] holds the [`AppState`] snapshot; every
//!   dispatch swaps it atomically
//! - **Orchestrators**: Async operations in [`actions`] call the API and
//!   dispatch actions in a fixed order
//! - **Transport Abstraction**: Pluggable transport layer (reqwest, mock)
//! - **Pure Reducer**: State transitions live in sixcities-core
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sixcities_client::{actions, ActionContext, HttpTransport, MemorySessionStore, Store};
//!
//! let session = Arc::new(MemorySessionStore::new());
//! let transport = HttpTransport::new("http://localhost:3000/six-cities", timeout, session.clone())?;
//! let ctx = ActionContext::new(Arc::new(Store::default()), Arc::new(transport), session);
//!
//! actions::check_auth(&ctx).await;
//! actions::fetch_offers(&ctx).await?;
//! let visible = ctx.store().visible_offers();
//! ```
//!
//! [`AppState`]: rental_core::AppState

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actions;
pub mod config;
pub mod error_timer;
pub mod session;
pub mod store;
pub mod transport;

pub use actions::{ActionContext, ActionError, Command, FollowUps};
pub use config::{ApiConfig, ClientConfig, ConfigError, SessionConfig, UiConfig};
pub use error_timer::{ErrorTimer, DEFAULT_ERROR_CLEAR_DELAY};
pub use session::{FileSessionStore, MemorySessionStore, SessionError, SessionStore};
pub use store::{drain_actions, Store};
pub use transport::{
    fetch, send, ApiRoute, HttpTransport, Method, MockTransport, RecordedRequest, Transport,
    TransportError, TOKEN_HEADER,
};

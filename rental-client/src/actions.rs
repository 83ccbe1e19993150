//! Action orchestrators.
//!
//! Each orchestrator performs zero or more transport calls and then
//! dispatches actions into the [`Store`]. Dependencies arrive through an
//! explicit [`ActionContext`]; nothing here reaches for global state.
//!
//! # Ordering
//!
//! Within one orchestrator, dispatches happen in the order written below.
//! Across orchestrators nothing is ordered: two concurrent fetches both
//! complete, and whichever finishes last wins the field they share.
//!
//! # Failures
//!
//! [`check_auth`] never fails; a missing session is a normal outcome. All
//! other orchestrators return the transport failure to the caller after
//! restoring any loading flag they set.

use rental_core::{Action, AuthorizationStatus, SortKey};
use rental_types::{
    AuthData, CityName, Comment, FavoriteStatus, NewComment, Offer, OfferDetail, OfferId,
    UserSession,
};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::error_timer::{ErrorTimer, DEFAULT_ERROR_CLEAR_DELAY};
use crate::session::{SessionError, SessionStore};
use crate::store::Store;
use crate::transport::{fetch, send, ApiRoute, Transport, TransportError};

/// Orchestrator errors.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Session store error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// A spawned follow-up task panicked or was aborted.
    #[error("follow-up task {0} did not complete")]
    Aborted(&'static str),
}

/// Everything an orchestrator needs: the store it dispatches into, the
/// transport it calls and the session store it persists tokens in.
#[derive(Clone)]
pub struct ActionContext {
    store: Arc<Store>,
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    errors: Arc<ErrorTimer>,
}

impl ActionContext {
    /// Create a context with the default error clear delay.
    pub fn new(
        store: Arc<Store>,
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        let errors = Arc::new(ErrorTimer::new(
            Arc::clone(&store),
            DEFAULT_ERROR_CLEAR_DELAY,
        ));
        Self {
            store,
            transport,
            session,
            errors,
        }
    }

    /// Set the error clear delay.
    pub fn with_error_clear_delay(mut self, delay: Duration) -> Self {
        self.errors = Arc::new(ErrorTimer::new(Arc::clone(&self.store), delay));
        self
    }

    /// The state container.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The transport.
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// The session store.
    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// The error clear timer.
    pub fn errors(&self) -> &ErrorTimer {
        &self.errors
    }
}

/// Orchestrators started in the background by another orchestrator.
///
/// Dropping this detaches the tasks; they still run to completion.
#[derive(Debug, Default)]
pub struct FollowUps {
    tasks: Vec<(&'static str, JoinHandle<Result<(), ActionError>>)>,
}

impl FollowUps {
    /// No follow-ups.
    pub fn none() -> Self {
        Self::default()
    }

    fn spawn<F>(mut self, name: &'static str, task: F) -> Self
    where
        F: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let result = task.await;
            if let Err(e) = &result {
                tracing::warn!("Follow-up {} failed: {}", name, e);
            }
            result
        });
        self.tasks.push((name, handle));
        self
    }

    /// Names of the started follow-ups, in start order.
    pub fn names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|(name, _)| *name).collect()
    }

    /// Check if nothing was started.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every follow-up; returns the first failure, if any.
    pub async fn join(self) -> Result<(), ActionError> {
        let mut first_error = None;
        for (name, handle) in self.tasks {
            let result = match handle.await {
                Ok(result) => result,
                Err(_) => Err(ActionError::Aborted(name)),
            };
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Load the full catalog.
///
/// `SetOffersLoading(true)` → GET `offers` → `SetOffersLoading(false)` →
/// `LoadOffers`. The loading flag is reset on failure too; the catalog is
/// left untouched.
pub async fn fetch_offers(ctx: &ActionContext) -> Result<(), ActionError> {
    let store = ctx.store();
    store.dispatch(Action::SetOffersLoading(true));
    let result = fetch::<Vec<Offer>>(ctx.transport(), &ApiRoute::Offers).await;
    store.dispatch(Action::SetOffersLoading(false));

    let offers = result?;
    tracing::debug!("Loaded {} offers", offers.len());
    store.dispatch(Action::LoadOffers(offers));
    Ok(())
}

/// Load the user's favorites and return them for chaining.
pub async fn fetch_favorite_offers(ctx: &ActionContext) -> Result<Vec<Offer>, ActionError> {
    let favorites = fetch::<Vec<Offer>>(ctx.transport(), &ApiRoute::Favorites).await?;
    ctx.store()
        .dispatch(Action::LoadFavoriteOffers(favorites.clone()));
    Ok(favorites)
}

/// Ask the API whether the stored token is still a live session.
///
/// Never fails: any error, including a 401, resolves to
/// `NotAuthenticated`. Returns the resulting status.
pub async fn check_auth(ctx: &ActionContext) -> AuthorizationStatus {
    let store = ctx.store();
    match fetch::<UserSession>(ctx.transport(), &ApiRoute::Login).await {
        Ok(user) => {
            store.dispatch_batch(signed_in(user));
            AuthorizationStatus::Authenticated
        }
        Err(e) => {
            tracing::debug!("No active session: {}", e);
            store.dispatch(Action::RequireAuthorization(
                AuthorizationStatus::NotAuthenticated,
            ));
            AuthorizationStatus::NotAuthenticated
        }
    }
}

/// Status and user land in one snapshot so `user_data` is never set while
/// another status is visible.
fn signed_in(user: UserSession) -> Vec<Action> {
    vec![
        Action::RequireAuthorization(AuthorizationStatus::Authenticated),
        Action::LoadUserData(user),
    ]
}

/// Authenticate, persist the token, then refresh favorites and the catalog
/// in the background.
pub async fn login(ctx: &ActionContext, credentials: &AuthData) -> Result<FollowUps, ActionError> {
    let user: UserSession = send(ctx.transport(), &ApiRoute::Login, credentials).await?;
    ctx.session().save(&user.token).await?;

    tracing::info!("Logged in as {}", user.email);
    ctx.store().dispatch_batch(signed_in(user));

    let favorites_ctx = ctx.clone();
    let offers_ctx = ctx.clone();
    Ok(FollowUps::none()
        .spawn("fetch_favorite_offers", async move {
            fetch_favorite_offers(&favorites_ctx).await.map(|_| ())
        })
        .spawn("fetch_offers", async move {
            fetch_offers(&offers_ctx).await
        }))
}

/// End the session.
///
/// A failed DELETE is returned as-is; the token and the auth status are
/// then left as they were. Once the DELETE succeeds the status always moves
/// to `NotAuthenticated`, even when dropping the token then fails.
pub async fn logout(ctx: &ActionContext) -> Result<(), ActionError> {
    ctx.transport()
        .delete(&ApiRoute::Logout.to_string())
        .await?;
    // The server session is gone; the store follows even if the token file
    // could not be removed.
    let dropped = ctx.session().drop_token().await;
    ctx.store().dispatch(Action::RequireAuthorization(
        AuthorizationStatus::NotAuthenticated,
    ));
    dropped?;
    tracing::info!("Logged out");
    Ok(())
}

/// Load an offer with its nearby offers and reviews.
///
/// The three reads run concurrently; their results land as one batch
/// (`LoadOffer`, `LoadNearbyOffers`, `LoadComments`,
/// `SetOffersLoading(false)`), so the detail view is never half-filled.
/// If any read fails, nothing is loaded and the loading flag is reset.
pub async fn fetch_offer_detail(ctx: &ActionContext, id: &OfferId) -> Result<(), ActionError> {
    let store = ctx.store();
    let transport = ctx.transport();
    store.dispatch(Action::SetOffersLoading(true));

    let offer_route = ApiRoute::Offer(id.clone());
    let nearby_route = ApiRoute::NearbyOffers(id.clone());
    let comments_route = ApiRoute::Comments(id.clone());
    let result = tokio::try_join!(
        fetch::<OfferDetail>(transport, &offer_route),
        fetch::<Vec<Offer>>(transport, &nearby_route),
        fetch::<Vec<Comment>>(transport, &comments_route),
    );

    match result {
        Ok((detail, nearby, comments)) => {
            store.dispatch_batch(vec![
                Action::LoadOffer(detail),
                Action::LoadNearbyOffers(nearby),
                Action::LoadComments(comments),
                Action::SetOffersLoading(false),
            ]);
            Ok(())
        }
        Err(e) => {
            store.dispatch(Action::SetOffersLoading(false));
            Err(e.into())
        }
    }
}

/// Publish a review and reload the review list.
///
/// If the POST fails, no reload happens.
pub async fn post_comment(
    ctx: &ActionContext,
    id: &OfferId,
    comment: &NewComment,
) -> Result<(), ActionError> {
    let route = ApiRoute::Comments(id.clone());
    let _: Value = send(ctx.transport(), &route, comment).await?;
    let comments = fetch::<Vec<Comment>>(ctx.transport(), &route).await?;
    ctx.store().dispatch(Action::LoadComments(comments));
    Ok(())
}

/// Set an offer's favorite flag on the server, then refresh favorites and
/// schedule an error clear.
///
/// Only `favorite_offers` is refreshed; the flags inside `offers`,
/// `current_offer` and `nearby_offers` stay as fetched until their own next
/// load. If the POST fails, nothing is triggered.
pub async fn change_favorite(
    ctx: &ActionContext,
    id: &OfferId,
    status: FavoriteStatus,
) -> Result<FollowUps, ActionError> {
    let route = ApiRoute::FavoriteStatus(id.clone(), status);
    ctx.transport().post(&route.to_string(), None).await?;

    let favorites_ctx = ctx.clone();
    let follow_ups = FollowUps::none().spawn("fetch_favorite_offers", async move {
        fetch_favorite_offers(&favorites_ctx).await.map(|_| ())
    });
    clear_error_after_delay(ctx);
    Ok(follow_ups)
}

/// Schedule `SetError(None)` after the configured delay. Does not block.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime.
pub fn clear_error_after_delay(ctx: &ActionContext) -> JoinHandle<()> {
    ctx.errors().schedule()
}

/// Show a transient error message and schedule its clear.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime.
pub fn set_error(ctx: &ActionContext, message: impl Into<String>) -> JoinHandle<()> {
    ctx.errors().report(message)
}

/// Triggers exposed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Check the stored session.
    CheckAuth,
    /// Load the catalog.
    FetchOffers,
    /// Load favorites.
    FetchFavoriteOffers,
    /// Open an offer.
    FetchOfferDetail(OfferId),
    /// Sign in.
    Login(AuthData),
    /// Sign out.
    Logout,
    /// Publish a review.
    PostComment {
        /// Reviewed offer.
        id: OfferId,
        /// Review body.
        comment: NewComment,
    },
    /// Toggle a favorite.
    ChangeFavorite {
        /// Target offer.
        id: OfferId,
        /// Desired state.
        status: FavoriteStatus,
    },
    /// Select a city.
    ChangeCity(CityName),
    /// Reorder the catalog.
    SetSorting(SortKey),
}

impl Command {
    /// Run the command against `ctx`.
    ///
    /// Returns any background follow-ups the command started.
    pub async fn run(self, ctx: &ActionContext) -> Result<FollowUps, ActionError> {
        match self {
            Command::CheckAuth => {
                check_auth(ctx).await;
            }
            Command::FetchOffers => fetch_offers(ctx).await?,
            Command::FetchFavoriteOffers => {
                fetch_favorite_offers(ctx).await?;
            }
            Command::FetchOfferDetail(id) => fetch_offer_detail(ctx, &id).await?,
            Command::Login(credentials) => return login(ctx, &credentials).await,
            Command::Logout => logout(ctx).await?,
            Command::PostComment { id, comment } => post_comment(ctx, &id, &comment).await?,
            Command::ChangeFavorite { id, status } => {
                return change_favorite(ctx, &id, status).await
            }
            Command::ChangeCity(city) => ctx.store().dispatch(Action::ChangeCity(city)),
            Command::SetSorting(key) => ctx.store().dispatch(Action::SetSorting(key)),
        }
        Ok(FollowUps::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use crate::store::drain_actions;
    use crate::transport::{Method, MockTransport};
    use rental_core::AppState;
    use serde_json::json;

    // ===========================================
    // Fixtures
    // ===========================================

    fn offer_json(id: &str, city: &str, price: u32) -> Value {
        json!({
            "id": id,
            "title": format!("Offer {}", id),
            "type": "apartment",
            "price": price,
            "city": {
                "name": city,
                "location": { "latitude": 48.85, "longitude": 2.35, "zoom": 10 }
            },
            "location": { "latitude": 48.86, "longitude": 2.34, "zoom": 16 },
            "isFavorite": false,
            "isPremium": false,
            "rating": 4.5,
            "previewImage": "img/1.png"
        })
    }

    fn detail_json(id: &str) -> Value {
        let mut value = offer_json(id, "Paris", 200);
        value["description"] = json!("Quiet place");
        value["bedrooms"] = json!(2);
        value["goods"] = json!(["Wi-Fi"]);
        value["host"] = json!({ "name": "Angelina", "avatarUrl": "a.png", "isPro": true });
        value["images"] = json!([]);
        value["maxAdults"] = json!(3);
        value
    }

    fn comment_json(id: &str, text: &str) -> Value {
        json!({
            "id": id,
            "date": "2024-05-01T10:00:00.000Z",
            "user": { "name": "Oliver", "avatarUrl": "o.png", "isPro": false },
            "comment": text,
            "rating": 4
        })
    }

    fn user_json(token: &str) -> Value {
        json!({
            "name": "Oliver",
            "avatarUrl": "o.png",
            "isPro": false,
            "email": "a@b.com",
            "token": token
        })
    }

    struct Harness {
        ctx: ActionContext,
        transport: MockTransport,
        session: MemorySessionStore,
    }

    impl Harness {
        fn new() -> Self {
            let transport = MockTransport::new();
            let session = MemorySessionStore::new();
            let ctx = ActionContext::new(
                Arc::new(Store::new(AppState::new())),
                Arc::new(transport.clone()),
                Arc::new(session.clone()),
            );
            Self {
                ctx,
                transport,
                session,
            }
        }

        fn state(&self) -> AppState {
            self.ctx.store().state()
        }
    }

    fn network_down() -> TransportError {
        TransportError::Network("connection refused".into())
    }

    // ===========================================
    // FetchOffers Tests
    // ===========================================

    #[tokio::test]
    async fn fetch_offers_dispatches_in_order() {
        let h = Harness::new();
        h.transport.set_response(
            Method::Get,
            "offers",
            json!([offer_json("1", "Paris", 100), offer_json("2", "Amsterdam", 80)]),
        );
        let mut rx = h.ctx.store().subscribe_actions();

        fetch_offers(&h.ctx).await.unwrap();

        let kinds: Vec<&str> = drain_actions(&mut rx).iter().map(Action::kind).collect();
        assert_eq!(
            kinds,
            vec!["set_offers_loading", "set_offers_loading", "load_offers"]
        );
        let state = h.state();
        assert!(!state.is_offers_data_loading);
        assert_eq!(state.offers.len(), 2);
    }

    #[tokio::test]
    async fn fetch_offers_failure_resets_loading_and_keeps_catalog() {
        let h = Harness::new();
        h.transport.set_response(Method::Get, "offers", json!([offer_json("1", "Paris", 100)]));
        fetch_offers(&h.ctx).await.unwrap();

        h.transport.fail_next(Method::Get, "offers", network_down());
        let mut rx = h.ctx.store().subscribe_actions();
        let result = fetch_offers(&h.ctx).await;

        assert!(matches!(result, Err(ActionError::Transport(_))));
        let state = h.state();
        assert!(!state.is_offers_data_loading);
        assert_eq!(state.offers.len(), 1, "catalog must not be partially replaced");
        assert!(!drain_actions(&mut rx)
            .iter()
            .any(|a| matches!(a, Action::LoadOffers(_))));
    }

    #[tokio::test]
    async fn fetch_offers_malformed_payload_is_a_transport_failure() {
        let h = Harness::new();
        h.transport
            .set_response(Method::Get, "offers", json!({ "not": "a list" }));

        let result = fetch_offers(&h.ctx).await;
        assert!(matches!(
            result,
            Err(ActionError::Transport(TransportError::Decode(_)))
        ));
        assert!(!h.state().is_offers_data_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_fetches_last_complete_wins() {
        let h = Harness::new();
        // First call is slow and returns the older catalog
        h.transport.queue_delayed_response(
            Method::Get,
            "offers",
            json!([offer_json("old", "Paris", 1)]),
            Duration::from_millis(300),
        );
        h.transport.queue_delayed_response(
            Method::Get,
            "offers",
            json!([offer_json("new", "Paris", 2)]),
            Duration::from_millis(100),
        );

        let (first, second) = tokio::join!(fetch_offers(&h.ctx), fetch_offers(&h.ctx));
        first.unwrap();
        second.unwrap();

        let state = h.state();
        assert_eq!(state.offers[0].id.as_str(), "old");
        assert!(!state.is_offers_data_loading);
    }

    // ===========================================
    // FetchFavoriteOffers Tests
    // ===========================================

    #[tokio::test]
    async fn fetch_favorites_loads_and_returns() {
        let h = Harness::new();
        h.transport
            .set_response(Method::Get, "favorite", json!([offer_json("5", "Hamburg", 90)]));

        let favorites = fetch_favorite_offers(&h.ctx).await.unwrap();

        assert_eq!(favorites.len(), 1);
        assert_eq!(h.state().favorite_offers, favorites);
    }

    // ===========================================
    // CheckAuth Tests
    // ===========================================

    #[tokio::test]
    async fn check_auth_success_loads_user() {
        let h = Harness::new();
        h.transport.set_response(Method::Get, "login", user_json("T"));
        let mut rx = h.ctx.store().subscribe_actions();

        let status = check_auth(&h.ctx).await;

        assert_eq!(status, AuthorizationStatus::Authenticated);
        let actions = drain_actions(&mut rx);
        assert_eq!(
            actions[0],
            Action::RequireAuthorization(AuthorizationStatus::Authenticated)
        );
        assert!(matches!(actions[1], Action::LoadUserData(_)));
        assert_eq!(
            h.state().user_data.map(|u| u.email),
            Some("a@b.com".to_string())
        );
    }

    #[tokio::test]
    async fn check_auth_publishes_status_and_user_together() {
        let h = Harness::new();
        h.transport.set_response(Method::Get, "login", user_json("T"));
        let mut watcher = h.ctx.store().subscribe();
        watcher.borrow_and_update();

        check_auth(&h.ctx).await;

        assert!(watcher.has_changed().unwrap());
        let seen = watcher.borrow_and_update().clone();
        assert_eq!(seen.authorization_status, AuthorizationStatus::Authenticated);
        assert!(seen.user_data.is_some());
        assert!(!watcher.has_changed().unwrap());
    }

    #[tokio::test]
    async fn sign_out_after_check_auth_clears_user() {
        let h = Harness::new();
        h.transport.set_response(Method::Get, "login", user_json("T"));
        check_auth(&h.ctx).await;

        logout(&h.ctx).await.unwrap();

        let state = h.state();
        assert_eq!(
            state.authorization_status,
            AuthorizationStatus::NotAuthenticated
        );
        assert!(state.user_data.is_none());
    }

    #[tokio::test]
    async fn check_auth_failure_degrades_to_not_authenticated() {
        let h = Harness::new();
        h.transport.fail_next(
            Method::Get,
            "login",
            TransportError::Status {
                status: 401,
                message: "Unauthorized".into(),
            },
        );

        let status = check_auth(&h.ctx).await;

        assert_eq!(status, AuthorizationStatus::NotAuthenticated);
        let state = h.state();
        assert_eq!(
            state.authorization_status,
            AuthorizationStatus::NotAuthenticated
        );
        assert!(state.user_data.is_none());
    }

    #[tokio::test]
    async fn check_auth_network_failure_is_swallowed() {
        let h = Harness::new();
        h.transport.fail_next(Method::Get, "login", network_down());

        assert_eq!(
            check_auth(&h.ctx).await,
            AuthorizationStatus::NotAuthenticated
        );
    }

    // ===========================================
    // Login / Logout Tests
    // ===========================================

    #[tokio::test]
    async fn login_persists_token_and_triggers_follow_ups_once() {
        let h = Harness::new();
        h.transport.set_response(Method::Post, "login", user_json("T"));
        h.transport.set_response(Method::Get, "favorite", json!([]));
        h.transport
            .set_response(Method::Get, "offers", json!([offer_json("1", "Paris", 100)]));

        let follow_ups = login(&h.ctx, &AuthData::new("a@b.com", "x")).await.unwrap();

        assert_eq!(h.session.token().await.unwrap().as_deref(), Some("T"));
        let state = h.state();
        assert_eq!(
            state.authorization_status,
            AuthorizationStatus::Authenticated
        );
        assert_eq!(state.user_data.as_ref().map(|u| u.token.as_str()), Some("T"));
        assert_eq!(follow_ups.names(), vec!["fetch_favorite_offers", "fetch_offers"]);

        follow_ups.join().await.unwrap();

        assert_eq!(h.transport.request_count(Method::Get, "favorite"), 1);
        assert_eq!(h.transport.request_count(Method::Get, "offers"), 1);
        assert_eq!(h.state().offers.len(), 1);

        let body = h.transport.requests()[0].body.clone();
        assert_eq!(body, Some(json!({ "email": "a@b.com", "password": "x" })));
    }

    #[tokio::test]
    async fn login_follow_ups_run_when_detached() {
        let h = Harness::new();
        h.transport.set_response(Method::Post, "login", user_json("T"));
        h.transport.set_response(Method::Get, "favorite", json!([]));
        h.transport.set_response(Method::Get, "offers", json!([]));
        let mut watcher = h.ctx.store().subscribe();

        drop(login(&h.ctx, &AuthData::new("a@b.com", "x")).await.unwrap());

        // Wait until the background catalog fetch has landed
        watcher
            .wait_for(|s| !s.is_offers_data_loading && h.transport.request_count(Method::Get, "offers") == 1)
            .await
            .unwrap();
        assert_eq!(h.transport.request_count(Method::Get, "offers"), 1);
    }

    #[tokio::test]
    async fn login_publishes_status_and_user_together() {
        let h = Harness::new();
        h.transport.set_response(Method::Post, "login", user_json("T"));
        h.transport.set_response(Method::Get, "favorite", json!([]));
        h.transport.set_response(Method::Get, "offers", json!([]));
        let mut watcher = h.ctx.store().subscribe();
        watcher.borrow_and_update();

        let follow_ups = login(&h.ctx, &AuthData::new("a@b.com", "x")).await.unwrap();

        // Follow-ups have not run yet on this single-threaded runtime
        assert!(watcher.has_changed().unwrap());
        let seen = watcher.borrow_and_update().clone();
        assert_eq!(seen.authorization_status, AuthorizationStatus::Authenticated);
        assert_eq!(seen.user_data.map(|u| u.token), Some("T".to_string()));

        follow_ups.join().await.unwrap();
    }

    #[tokio::test]
    async fn login_failure_changes_nothing() {
        let h = Harness::new();
        h.transport.fail_next(
            Method::Post,
            "login",
            TransportError::Status {
                status: 400,
                message: "bad credentials".into(),
            },
        );

        let result = login(&h.ctx, &AuthData::new("a@b.com", "x")).await;

        assert!(result.is_err());
        assert_eq!(h.session.token().await.unwrap(), None);
        assert_eq!(h.state().authorization_status, AuthorizationStatus::Unknown);
        assert_eq!(h.transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn logout_drops_token_and_session() {
        let h = Harness::new();
        h.session.save("T").await.unwrap();
        h.ctx.store().dispatch(Action::RequireAuthorization(
            AuthorizationStatus::Authenticated,
        ));

        logout(&h.ctx).await.unwrap();

        assert_eq!(h.transport.request_count(Method::Delete, "logout"), 1);
        assert_eq!(h.session.token().await.unwrap(), None);
        assert_eq!(
            h.state().authorization_status,
            AuthorizationStatus::NotAuthenticated
        );
    }

    #[tokio::test]
    async fn logout_failure_propagates_and_keeps_session() {
        let h = Harness::new();
        h.session.save("T").await.unwrap();
        h.ctx.store().dispatch(Action::RequireAuthorization(
            AuthorizationStatus::Authenticated,
        ));
        h.transport.fail_next(Method::Delete, "logout", network_down());

        let result = logout(&h.ctx).await;

        assert!(matches!(result, Err(ActionError::Transport(_))));
        assert_eq!(h.session.token().await.unwrap().as_deref(), Some("T"));
        assert_eq!(
            h.state().authorization_status,
            AuthorizationStatus::Authenticated
        );
    }

    struct StuckTokenSession;

    #[async_trait::async_trait]
    impl SessionStore for StuckTokenSession {
        async fn token(&self) -> Result<Option<String>, SessionError> {
            Ok(Some("T".into()))
        }

        async fn save(&self, _token: &str) -> Result<(), SessionError> {
            Ok(())
        }

        async fn drop_token(&self) -> Result<(), SessionError> {
            Err(SessionError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only data dir",
            )))
        }
    }

    #[tokio::test]
    async fn logout_token_drop_failure_still_signs_out() {
        let transport = MockTransport::new();
        let ctx = ActionContext::new(
            Arc::new(Store::new(AppState::new())),
            Arc::new(transport.clone()),
            Arc::new(StuckTokenSession),
        );
        ctx.store().dispatch(Action::RequireAuthorization(
            AuthorizationStatus::Authenticated,
        ));

        let result = logout(&ctx).await;

        assert!(matches!(result, Err(ActionError::Session(_))));
        assert_eq!(transport.request_count(Method::Delete, "logout"), 1);
        assert_eq!(
            ctx.store().state().authorization_status,
            AuthorizationStatus::NotAuthenticated
        );
    }

    // ===========================================
    // FetchOfferDetail Tests
    // ===========================================

    fn script_detail(transport: &MockTransport, id: &str) {
        transport.set_response(Method::Get, &format!("offers/{}", id), detail_json(id));
        transport.set_response(
            Method::Get,
            &format!("offers/{}/nearby", id),
            json!([offer_json("n1", "Paris", 90), offer_json("n2", "Paris", 95)]),
        );
        transport.set_response(
            Method::Get,
            &format!("comments/{}", id),
            json!([comment_json("c1", "Great")]),
        );
    }

    #[tokio::test]
    async fn fetch_offer_detail_loads_as_one_batch() {
        let h = Harness::new();
        script_detail(&h.transport, "42");
        let mut rx = h.ctx.store().subscribe_actions();

        fetch_offer_detail(&h.ctx, &OfferId::new("42")).await.unwrap();

        let kinds: Vec<&str> = drain_actions(&mut rx).iter().map(Action::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "set_offers_loading",
                "load_offer",
                "load_nearby_offers",
                "load_comments",
                "set_offers_loading",
            ]
        );
        let state = h.state();
        assert_eq!(state.current_offer.map(|d| d.id), Some(OfferId::new("42")));
        assert_eq!(state.nearby_offers.len(), 2);
        assert_eq!(state.comments.len(), 1);
        assert!(!state.is_offers_data_loading);
    }

    #[tokio::test]
    async fn fetch_offer_detail_never_exposes_partial_detail() {
        let h = Harness::new();
        script_detail(&h.transport, "42");
        let mut watcher = h.ctx.store().subscribe();
        watcher.borrow_and_update();

        fetch_offer_detail(&h.ctx, &OfferId::new("42")).await.unwrap();

        // Only the start flag and the final batch were published
        let seen = watcher.borrow_and_update().clone();
        assert!(seen.current_offer.is_some());
        assert_eq!(seen.nearby_offers.len(), 2);
        assert!(!seen.is_offers_data_loading);
    }

    #[tokio::test]
    async fn fetch_offer_detail_failure_loads_nothing() {
        let h = Harness::new();
        script_detail(&h.transport, "42");
        h.transport
            .fail_next(Method::Get, "comments/42", network_down());

        let result = fetch_offer_detail(&h.ctx, &OfferId::new("42")).await;

        assert!(result.is_err());
        let state = h.state();
        assert!(state.current_offer.is_none());
        assert!(state.nearby_offers.is_empty());
        assert!(!state.is_offers_data_loading);
    }

    #[tokio::test]
    async fn fetch_offer_detail_unknown_id_is_not_found() {
        let h = Harness::new();
        let result = fetch_offer_detail(&h.ctx, &OfferId::new("missing")).await;
        assert!(matches!(
            result,
            Err(ActionError::Transport(TransportError::Status { status: 404, .. }))
        ));
        assert!(!h.state().is_offers_data_loading);
    }

    // ===========================================
    // PostComment Tests
    // ===========================================

    #[tokio::test]
    async fn post_comment_then_refetches_list() {
        let h = Harness::new();
        h.transport
            .set_response(Method::Post, "comments/7", comment_json("c9", "Lovely"));
        h.transport.set_response(
            Method::Get,
            "comments/7",
            json!([comment_json("c1", "Nice"), comment_json("c9", "Lovely")]),
        );

        let comment = NewComment::new("Lovely", 5).unwrap();
        post_comment(&h.ctx, &OfferId::new("7"), &comment).await.unwrap();

        let requests = h.transport.requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(
            requests[0].body,
            Some(json!({ "comment": "Lovely", "rating": 5 }))
        );
        assert_eq!(requests[1].method, Method::Get);
        assert_eq!(h.state().comments.len(), 2);
    }

    #[tokio::test]
    async fn post_comment_failure_skips_refetch() {
        let h = Harness::new();
        h.transport.fail_next(
            Method::Post,
            "comments/7",
            TransportError::Status {
                status: 400,
                message: "too short".into(),
            },
        );

        let comment = NewComment::new("Meh", 2).unwrap();
        let result = post_comment(&h.ctx, &OfferId::new("7"), &comment).await;

        assert!(result.is_err());
        assert_eq!(h.transport.request_count(Method::Get, "comments/7"), 0);
    }

    // ===========================================
    // ChangeFavorite Tests
    // ===========================================

    #[tokio::test]
    async fn change_favorite_posts_once_and_refetches_favorites_once() {
        let h = Harness::new();
        h.transport
            .set_response(Method::Post, "favorite/42/1", offer_json("42", "Paris", 100));
        h.transport
            .set_response(Method::Get, "favorite", json!([offer_json("42", "Paris", 100)]));

        let follow_ups = change_favorite(&h.ctx, &OfferId::new("42"), FavoriteStatus::Add)
            .await
            .unwrap();
        follow_ups.join().await.unwrap();

        assert_eq!(h.transport.request_count(Method::Post, "favorite/42/1"), 1);
        assert_eq!(h.transport.request_count(Method::Get, "favorite"), 1);
        assert_eq!(h.state().favorite_offers.len(), 1);
        assert_eq!(h.ctx.errors().pending(), 1);
    }

    #[tokio::test]
    async fn change_favorite_failure_triggers_nothing() {
        let h = Harness::new();
        h.transport.fail_next(
            Method::Post,
            "favorite/42/1",
            TransportError::Status {
                status: 401,
                message: "Unauthorized".into(),
            },
        );

        let result = change_favorite(&h.ctx, &OfferId::new("42"), FavoriteStatus::Add).await;

        assert!(result.is_err());
        assert_eq!(h.transport.request_count(Method::Post, "favorite/42/1"), 1);
        assert_eq!(h.transport.request_count(Method::Get, "favorite"), 0);
        assert_eq!(h.ctx.errors().pending(), 0);
    }

    #[tokio::test]
    async fn change_favorite_leaves_catalog_flags_alone() {
        let h = Harness::new();
        h.transport
            .set_response(Method::Get, "offers", json!([offer_json("42", "Paris", 100)]));
        fetch_offers(&h.ctx).await.unwrap();
        h.transport
            .set_response(Method::Post, "favorite/42/1", json!(null));
        h.transport.set_response(Method::Get, "favorite", json!([]));

        change_favorite(&h.ctx, &OfferId::new("42"), FavoriteStatus::Add)
            .await
            .unwrap()
            .join()
            .await
            .unwrap();

        assert!(!h.state().offers[0].is_favorite);
    }

    // ===========================================
    // Error Clear Tests
    // ===========================================

    #[tokio::test(start_paused = true)]
    async fn set_error_clears_after_two_seconds() {
        let h = Harness::new();
        let handle = set_error(&h.ctx, "x");
        assert_eq!(h.state().error.as_deref(), Some("x"));

        tokio::time::sleep(Duration::from_millis(2000)).await;
        handle.await.unwrap();
        assert_eq!(h.state().error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_error_delay_is_honored() {
        let h = Harness::new();
        let ctx = h.ctx.clone().with_error_clear_delay(Duration::from_millis(50));
        ctx.store().dispatch(Action::SetError(Some("x".into())));

        let start = tokio::time::Instant::now();
        clear_error_after_delay(&ctx).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(50));
        assert_eq!(h.state().error, None);
    }

    // ===========================================
    // Command Tests
    // ===========================================

    #[tokio::test]
    async fn view_commands_dispatch_directly() {
        let h = Harness::new();
        h.transport.set_response(
            Method::Get,
            "offers",
            json!([offer_json("1", "Paris", 300), offer_json("2", "Paris", 100)]),
        );

        Command::FetchOffers.run(&h.ctx).await.unwrap();
        Command::ChangeCity(CityName::Paris).run(&h.ctx).await.unwrap();
        Command::SetSorting(SortKey::PriceLowToHigh)
            .run(&h.ctx)
            .await
            .unwrap();

        let prices: Vec<u32> = h.state().offers.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![100, 300]);
        assert!(h.transport.requests().len() == 1);
    }

    #[tokio::test]
    async fn check_auth_command_never_fails() {
        let h = Harness::new();
        h.transport.fail_next(Method::Get, "login", network_down());

        let follow_ups = Command::CheckAuth.run(&h.ctx).await.unwrap();
        assert!(follow_ups.is_empty());
    }

    #[tokio::test]
    async fn login_command_returns_follow_ups() {
        let h = Harness::new();
        h.transport.set_response(Method::Post, "login", user_json("T"));
        h.transport.set_response(Method::Get, "favorite", json!([]));
        h.transport.set_response(Method::Get, "offers", json!([]));

        let follow_ups = Command::Login(AuthData::new("a@b.com", "x"))
            .run(&h.ctx)
            .await
            .unwrap();
        assert_eq!(follow_ups.names().len(), 2);
        follow_ups.join().await.unwrap();
    }
}

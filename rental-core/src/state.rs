//! Application state and its reducer.
//!
//! [`AppState`] is a plain snapshot. [`AppState::on_action`] consumes it
//! together with an [`Action`] and returns the next snapshot. No I/O, no
//! clocks: the client crate decides *when* actions happen, this module only
//! decides *what* they do.

use rental_types::{CityName, Comment, Offer, OfferDetail, UserSession};

use crate::offers::{filter_offers, sort_offers, SortKey};

/// Whether the user has a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthorizationStatus {
    /// No session check has completed yet.
    #[default]
    Unknown,
    /// Session confirmed by the API.
    Authenticated,
    /// No session, or the check failed.
    NotAuthenticated,
}

/// Snapshot of everything the presentation layer reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Selected city filter.
    pub city_name: CityName,
    /// Full catalog from the last successful fetch, in display order.
    pub offers: Vec<Offer>,
    /// True between a fetch start and its matching end.
    pub is_offers_data_loading: bool,
    /// Session status.
    pub authorization_status: AuthorizationStatus,
    /// Present iff `authorization_status` is `Authenticated`.
    pub user_data: Option<UserSession>,
    /// Offer opened in the detail view.
    pub current_offer: Option<OfferDetail>,
    /// Offers near `current_offer`.
    pub nearby_offers: Vec<Offer>,
    /// Reviews of `current_offer`.
    pub comments: Vec<Comment>,
    /// The user's favorites.
    pub favorite_offers: Vec<Offer>,
    /// Transient error message.
    pub error: Option<String>,
}

impl AppState {
    /// Fresh state with default city and no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state seeded with a catalog shown before the first fetch.
    pub fn with_offers(offers: Vec<Offer>) -> Self {
        Self {
            offers,
            ..Self::default()
        }
    }

    /// Apply an action and return the resulting state.
    ///
    /// This is a pure function - no side effects. Every field not named by
    /// the action is carried over untouched.
    pub fn on_action(self, action: Action) -> Self {
        match action {
            Action::ChangeCity(city_name) => Self { city_name, ..self },
            Action::SetSorting(key) => {
                let offers = sort_offers(key, &self.offers);
                Self { offers, ..self }
            }
            Action::LoadOffers(offers) => Self { offers, ..self },
            Action::SetOffersLoading(is_offers_data_loading) => Self {
                is_offers_data_loading,
                ..self
            },
            Action::RequireAuthorization(status) => {
                // Leaving Authenticated drops the profile along with it.
                let user_data = match status {
                    AuthorizationStatus::Authenticated => self.user_data,
                    _ => None,
                };
                Self {
                    authorization_status: status,
                    user_data,
                    ..self
                }
            }
            Action::LoadUserData(user) => Self {
                user_data: Some(user),
                ..self
            },
            Action::LoadOffer(detail) => Self {
                current_offer: Some(detail),
                ..self
            },
            Action::LoadNearbyOffers(nearby_offers) => Self {
                nearby_offers,
                ..self
            },
            Action::LoadComments(comments) => Self { comments, ..self },
            Action::LoadFavoriteOffers(favorite_offers) => Self {
                favorite_offers,
                ..self
            },
            Action::SetError(error) => Self { error, ..self },
        }
    }

    /// Offers of the selected city, in current display order.
    pub fn visible_offers(&self) -> Vec<Offer> {
        filter_offers(self.city_name, &self.offers)
    }

    /// Check if a session is confirmed.
    pub fn is_authenticated(&self) -> bool {
        self.authorization_status == AuthorizationStatus::Authenticated
    }
}

/// Reducer entry point: `(state, action) -> state`.
pub fn reduce(state: AppState, action: Action) -> AppState {
    state.on_action(action)
}

/// State change requests.
///
/// Closed set: adding a variant forces every match on it to be revisited.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Select a city.
    ChangeCity(CityName),
    /// Reorder the catalog.
    SetSorting(SortKey),
    /// Replace the catalog.
    LoadOffers(Vec<Offer>),
    /// Set the loading flag.
    SetOffersLoading(bool),
    /// Set the session status.
    RequireAuthorization(AuthorizationStatus),
    /// Store the signed-in user.
    LoadUserData(UserSession),
    /// Store the opened offer.
    LoadOffer(OfferDetail),
    /// Replace nearby offers.
    LoadNearbyOffers(Vec<Offer>),
    /// Replace reviews.
    LoadComments(Vec<Comment>),
    /// Replace favorites.
    LoadFavoriteOffers(Vec<Offer>),
    /// Set or clear the transient error.
    SetError(Option<String>),
}

impl Action {
    /// Short tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::ChangeCity(_) => "change_city",
            Action::SetSorting(_) => "set_sorting",
            Action::LoadOffers(_) => "load_offers",
            Action::SetOffersLoading(_) => "set_offers_loading",
            Action::RequireAuthorization(_) => "require_authorization",
            Action::LoadUserData(_) => "load_user_data",
            Action::LoadOffer(_) => "load_offer",
            Action::LoadNearbyOffers(_) => "load_nearby_offers",
            Action::LoadComments(_) => "load_comments",
            Action::LoadFavoriteOffers(_) => "load_favorite_offers",
            Action::SetError(_) => "set_error",
        }
    }
}

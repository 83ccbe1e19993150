//! Logical API paths.

use rental_types::{FavoriteStatus, OfferId};
use std::fmt;

/// A resource of the rental API, rendered as a path relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiRoute {
    /// `offers`
    Offers,
    /// `offers/{id}`
    Offer(OfferId),
    /// `offers/{id}/nearby`
    NearbyOffers(OfferId),
    /// `favorite`
    Favorites,
    /// `favorite/{id}/{status}`
    FavoriteStatus(OfferId, FavoriteStatus),
    /// `login` (GET checks the session, POST authenticates)
    Login,
    /// `logout`
    Logout,
    /// `comments/{id}` (GET lists, POST creates)
    Comments(OfferId),
}

impl fmt::Display for ApiRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiRoute::Offers => f.write_str("offers"),
            ApiRoute::Offer(id) => write!(f, "offers/{}", id),
            ApiRoute::NearbyOffers(id) => write!(f, "offers/{}/nearby", id),
            ApiRoute::Favorites => f.write_str("favorite"),
            ApiRoute::FavoriteStatus(id, status) => write!(f, "favorite/{}/{}", id, status),
            ApiRoute::Login => f.write_str("login"),
            ApiRoute::Logout => f.write_str("logout"),
            ApiRoute::Comments(id) => write!(f, "comments/{}", id),
        }
    }
}

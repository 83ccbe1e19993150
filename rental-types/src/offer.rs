//! Offer payloads: list entries and the full detail view.

use serde::{Deserialize, Serialize};

use crate::city::{City, Location};
use crate::ids::OfferId;
use crate::user::Host;

/// Offer as returned by list endpoints (`offers`, `offers/{id}/nearby`, `favorite`).
///
/// Two offers are equal when their ids are equal; the remaining fields are
/// a snapshot of the last fetch and may go stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Offer identity.
    pub id: OfferId,
    /// Listing headline.
    pub title: String,
    /// Accommodation kind (apartment, room, house, hotel).
    #[serde(rename = "type")]
    pub offer_type: String,
    /// Price per night.
    pub price: u32,
    /// City the offer belongs to.
    pub city: City,
    /// Map pin.
    pub location: Location,
    /// Whether the current user marked it as favorite.
    #[serde(default)]
    pub is_favorite: bool,
    /// Premium badge.
    #[serde(default)]
    pub is_premium: bool,
    /// Average rating, 0..=5.
    pub rating: f64,
    /// Card image URL.
    #[serde(default)]
    pub preview_image: String,
}

impl PartialEq for Offer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Offer {}

/// Full offer payload from `offers/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferDetail {
    /// Offer identity.
    pub id: OfferId,
    /// Listing headline.
    pub title: String,
    /// Accommodation kind.
    #[serde(rename = "type")]
    pub offer_type: String,
    /// Price per night.
    pub price: u32,
    /// City the offer belongs to.
    pub city: City,
    /// Map pin.
    pub location: Location,
    /// Whether the current user marked it as favorite.
    #[serde(default)]
    pub is_favorite: bool,
    /// Premium badge.
    #[serde(default)]
    pub is_premium: bool,
    /// Average rating, 0..=5.
    pub rating: f64,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Bedroom count.
    #[serde(default)]
    pub bedrooms: u32,
    /// Amenities.
    #[serde(default)]
    pub goods: Vec<String>,
    /// Host of the place.
    pub host: Host,
    /// Gallery image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Maximum number of adult guests.
    #[serde(default)]
    pub max_adults: u32,
}

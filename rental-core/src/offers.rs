//! Filter/sort engine for the offer list.
//!
//! Every function here returns a fresh `Vec`; inputs are never reordered in
//! place, so readers holding an earlier snapshot keep a stable view.

use rental_types::{CityName, Offer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sort order selected in the offer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Server order.
    #[default]
    #[serde(rename = "Popular")]
    Popular,
    /// Ascending price.
    #[serde(rename = "Price: low to high")]
    PriceLowToHigh,
    /// Descending price.
    #[serde(rename = "Price: high to low")]
    PriceHighToLow,
    /// Descending rating.
    #[serde(rename = "Top rated first")]
    TopRatedFirst,
}

impl SortKey {
    /// Every sort option, in menu order.
    pub const ALL: [SortKey; 4] = [
        SortKey::Popular,
        SortKey::PriceLowToHigh,
        SortKey::PriceHighToLow,
        SortKey::TopRatedFirst,
    ];

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Popular => "Popular",
            SortKey::PriceLowToHigh => "Price: low to high",
            SortKey::PriceHighToLow => "Price: high to low",
            SortKey::TopRatedFirst => "Top rated first",
        }
    }

    /// Lenient lookup by exact menu label.
    ///
    /// Unrecognized labels fall back to [`SortKey::Popular`], which leaves
    /// the list in server order.
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|key| key.label() == label)
            .unwrap_or_default()
    }

    fn slug(&self) -> &'static str {
        match self {
            SortKey::Popular => "popular",
            SortKey::PriceLowToHigh => "price-asc",
            SortKey::PriceHighToLow => "price-desc",
            SortKey::TopRatedFirst => "top-rated",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sort key string matched neither a label nor a slug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key: {0} (expected popular, price-asc, price-desc or top-rated)")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    /// Strict parse accepting the menu label or its slug, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| {
                key.label().eq_ignore_ascii_case(wanted) || key.slug().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

/// Offers located in `city`, in their original relative order.
pub fn filter_offers(city: CityName, offers: &[Offer]) -> Vec<Offer> {
    offers
        .iter()
        .filter(|offer| offer.city.name == city.as_str())
        .cloned()
        .collect()
}

/// Offers reordered by `key`.
///
/// Uses a stable sort: offers with equal keys keep their relative order.
/// [`SortKey::Popular`] returns the input order unchanged.
pub fn sort_offers(key: SortKey, offers: &[Offer]) -> Vec<Offer> {
    let mut sorted = offers.to_vec();
    match key {
        SortKey::Popular => {}
        SortKey::PriceLowToHigh => sorted.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceHighToLow => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::TopRatedFirst => sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
    sorted
}

/// Offers grouped by city name, groups in first-seen order.
pub fn group_by_city(offers: &[Offer]) -> Vec<(String, Vec<Offer>)> {
    let mut groups: Vec<(String, Vec<Offer>)> = Vec::new();
    for offer in offers {
        match groups.iter_mut().find(|(name, _)| *name == offer.city.name) {
            Some((_, group)) => group.push(offer.clone()),
            None => groups.push((offer.city.name.clone(), vec![offer.clone()])),
        }
    }
    groups
}

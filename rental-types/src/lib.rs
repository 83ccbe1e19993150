//! # sixcities-types
//!
//! Domain and wire types for the six-cities rental API.
//!
//! This crate provides the foundational types used across all six-cities crates:
//! - [`Offer`], [`OfferDetail`] - Catalog entries and the full detail view
//! - [`Comment`], [`NewComment`] - Reviews
//! - [`UserSession`], [`AuthData`] - Session and credentials
//! - [`OfferId`], [`CityName`], [`FavoriteStatus`] - Identity and selectors
//! - [`ParseError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod city;
mod comment;
mod error;
mod ids;
mod offer;
mod user;

pub use city::{City, CityName, Location};
pub use comment::{Comment, NewComment};
pub use error::ParseError;
pub use ids::{FavoriteStatus, OfferId};
pub use offer::{Offer, OfferDetail};
pub use user::{AuthData, Host, UserSession};

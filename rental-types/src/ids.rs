//! Identity types for offers and favorite toggles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Identifier of a rental offer.
///
/// Opaque to the client: the API hands out ids and expects them back verbatim.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(String);

impl OfferId {
    /// Wrap a raw id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OfferId({})", self.0)
    }
}

impl From<&str> for OfferId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OfferId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Target favorite state for an offer.
///
/// Rendered as `0` / `1` in the `favorite/{id}/{status}` path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteStatus {
    /// Remove the offer from favorites.
    Remove = 0,
    /// Add the offer to favorites.
    Add = 1,
}

impl FavoriteStatus {
    /// Numeric wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Status that flips the given favorite flag.
    pub fn toggle(is_favorite: bool) -> Self {
        if is_favorite {
            Self::Remove
        } else {
            Self::Add
        }
    }
}

impl fmt::Display for FavoriteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl TryFrom<u8> for FavoriteStatus {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Remove),
            1 => Ok(Self::Add),
            other => Err(ParseError::InvalidFavoriteStatus(other.to_string())),
        }
    }
}

impl FromStr for FavoriteStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidFavoriteStatus(s.to_string()))?;
        Self::try_from(value)
    }
}

//! Error types for sixcities-types.

use thiserror::Error;

/// Errors raised while parsing user-supplied values into domain types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// City name is not one of the supported cities.
    #[error("unknown city: {0}")]
    UnknownCity(String),

    /// Favorite status is not `0` or `1`.
    #[error("invalid favorite status: {0}")]
    InvalidFavoriteStatus(String),

    /// Comment rating outside 1..=5.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    /// Comment text is empty.
    #[error("comment text must not be empty")]
    EmptyComment,
}

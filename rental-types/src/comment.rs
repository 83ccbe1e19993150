//! Reviews attached to an offer.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::user::Host;

/// Published review from `comments/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Review identity.
    pub id: String,
    /// ISO-8601 publication date, kept as sent.
    pub date: String,
    /// Author profile.
    pub user: Host,
    /// Review text.
    pub comment: String,
    /// Star rating.
    pub rating: f64,
}

/// Body of a `POST comments/{id}` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    /// Review text.
    pub comment: String,
    /// Star rating, 1..=5.
    pub rating: u8,
}

impl NewComment {
    /// Lowest accepted rating.
    pub const MIN_RATING: u8 = 1;
    /// Highest accepted rating.
    pub const MAX_RATING: u8 = 5;

    /// Validate and build a new review.
    pub fn new(comment: impl Into<String>, rating: u8) -> Result<Self, ParseError> {
        let comment = comment.into();
        if comment.trim().is_empty() {
            return Err(ParseError::EmptyComment);
        }
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&rating) {
            return Err(ParseError::InvalidRating(rating));
        }
        Ok(Self { comment, rating })
    }
}

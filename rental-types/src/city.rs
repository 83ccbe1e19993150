//! Cities served by the catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Map position used for a city or an offer pin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Map zoom level.
    pub zoom: u8,
}

/// City as embedded in offer payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Display name, matched against [`CityName::as_str`] when filtering.
    pub name: String,
    /// Map center of the city.
    pub location: Location,
}

/// City selector for the offer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CityName {
    /// Paris (initial selection).
    #[default]
    Paris,
    /// Cologne.
    Cologne,
    /// Brussels.
    Brussels,
    /// Amsterdam.
    Amsterdam,
    /// Hamburg.
    Hamburg,
    /// Dusseldorf.
    Dusseldorf,
}

impl CityName {
    /// Every supported city, in tab order.
    pub const ALL: [CityName; 6] = [
        CityName::Paris,
        CityName::Cologne,
        CityName::Brussels,
        CityName::Amsterdam,
        CityName::Hamburg,
        CityName::Dusseldorf,
    ];

    /// Name as it appears in offer payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            CityName::Paris => "Paris",
            CityName::Cologne => "Cologne",
            CityName::Brussels => "Brussels",
            CityName::Amsterdam => "Amsterdam",
            CityName::Hamburg => "Hamburg",
            CityName::Dusseldorf => "Dusseldorf",
        }
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CityName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CityName::ALL
            .into_iter()
            .find(|city| city.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseError::UnknownCity(s.to_string()))
    }
}

//! Toy concert booking store.
//!
//! A fixed in-memory list of bookable concerts. Booking only validates that
//! the concert exists; availability is never tracked or mutated.

use crate::error::{LeseError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cities with known concert venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Zurich,
    Basel,
    Toronto,
    NewYork,
}

/// All locations, in declaration order. Used to build tool schemas.
pub const ALL_LOCATIONS: [Location; 4] = [
    Location::Zurich,
    Location::Basel,
    Location::Toronto,
    Location::NewYork,
];

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Zurich => "Zurich",
            Location::Basel => "Basel",
            Location::Toronto => "Toronto",
            Location::NewYork => "NewYork",
        }
    }
}

impl std::str::FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Zurich" => Ok(Location::Zurich),
            "Basel" => Ok(Location::Basel),
            "Toronto" => Ok(Location::Toronto),
            "NewYork" => Ok(Location::NewYork),
            _ => Err(format!("Unknown location: {}", s)),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bookable concert.
#[derive(Debug, Clone, Serialize)]
pub struct Concert {
    pub id: u32,
    pub date: NaiveDate,
    pub band: String,
    pub location: Location,
    pub price: f64,
    pub currency: String,
}

/// In-memory concert store with a fixed seed set.
pub struct ConcertApi {
    concerts: Vec<Concert>,
}

impl ConcertApi {
    /// Create a store with the seed concerts.
    pub fn new() -> Self {
        Self {
            concerts: seed_concerts(),
        }
    }

    /// Search by band name (case-insensitive exact match) and location
    /// (exact match). Read-only; identical queries return identical sets.
    pub fn search(&self, band: &str, location: Location) -> Vec<Concert> {
        self.concerts
            .iter()
            .filter(|c| c.band.eq_ignore_ascii_case(band) && c.location == location)
            .cloned()
            .collect()
    }

    /// Book a ticket by concert id.
    ///
    /// The toy store never tracks availability, so success is only an
    /// acknowledgement that the concert exists.
    pub fn book(&self, id: u32) -> Result<()> {
        if self.concerts.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(LeseError::NotFound(format!("No concert with id {}", id)))
        }
    }
}

impl Default for ConcertApi {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_concerts() -> Vec<Concert> {
    fn concert(
        id: u32,
        date: (i32, u32, u32),
        band: &str,
        location: Location,
        price: f64,
        currency: &str,
    ) -> Concert {
        Concert {
            id,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid seed date"),
            band: band.to_string(),
            location,
            price,
            currency: currency.to_string(),
        }
    }

    vec![
        concert(1, (2024, 6, 11), "Iron Maiden", Location::Zurich, 150.0, "CHF"),
        concert(2, (2024, 6, 12), "Iron Maiden", Location::Zurich, 135.0, "CHF"),
        concert(3, (2024, 8, 15), "Dropkick Murphys", Location::Toronto, 145.0, "CAD"),
        concert(4, (2025, 1, 11), "Green Day", Location::NewYork, 200.0, "USD"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_matches_band_and_location() {
        let api = ConcertApi::new();
        let matches = api.search("Iron Maiden", Location::Zurich);
        let ids: Vec<u32> = matches.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_band() {
        let api = ConcertApi::new();
        assert_eq!(api.search("iron maiden", Location::Zurich).len(), 2);
        assert_eq!(api.search("IRON MAIDEN", Location::Zurich).len(), 2);
    }

    #[test]
    fn test_search_is_idempotent() {
        let api = ConcertApi::new();
        let first: Vec<u32> = api.search("Green Day", Location::NewYork).iter().map(|c| c.id).collect();
        let second: Vec<u32> = api.search("Green Day", Location::NewYork).iter().map(|c| c.id).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![4]);
    }

    #[test]
    fn test_search_no_matches_is_empty() {
        let api = ConcertApi::new();
        assert!(api.search("Iron Maiden", Location::Toronto).is_empty());
    }

    #[test]
    fn test_book_existing() {
        let api = ConcertApi::new();
        assert!(api.book(3).is_ok());
    }

    #[test]
    fn test_book_missing_leaves_store_unchanged() {
        let api = ConcertApi::new();
        let before = api.search("Iron Maiden", Location::Zurich).len();

        let result = api.book(999);
        assert!(matches!(result, Err(LeseError::NotFound(_))));

        let after = api.search("Iron Maiden", Location::Zurich).len();
        assert_eq!(before, after);
    }

    #[test]
    fn test_location_round_trip() {
        for location in ALL_LOCATIONS {
            let parsed: Location = location.as_str().parse().unwrap();
            assert_eq!(parsed, location);
        }
        assert!("Oslo".parse::<Location>().is_err());
    }
}

//! Location records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::geometry;

/// Identifier of a location: its index in the catalog.
pub type LocationId = usize;

/// Popularity attributes used by the scorers.
///
/// Field names on the wire follow the scraped data sets the catalog is
/// loaded from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Popularity {
    #[serde(rename = "instagram_visitorsNumber", default)]
    pub instagram_visitors: f64,
    #[serde(rename = "tripAdvisor_rating", default)]
    pub tripadvisor_rating: f64,
    #[serde(rename = "tripAdvisor_reviewsNumber", default)]
    pub tripadvisor_reviews: f64,
    #[serde(rename = "foursquare_rating", default)]
    pub foursquare_rating: f64,
    #[serde(rename = "foursquare_ratingVotes", default)]
    pub foursquare_rating_votes: f64,
    #[serde(rename = "officialGuide", default)]
    pub official_guide: f64,
}

/// A candidate stop.
///
/// Positions are planar (`x`, `y`, in metres) for travel computations;
/// `lat`/`lng` are carried for callers that render routes. Opening hours are
/// keyed by day (`"0"`..`"6"` in the bundled data sets) and hold
/// `[open, close]` in HHMM clock notation.
///
/// # Examples
///
/// ```
/// use u_orienteering::model::Location;
///
/// let museum = Location::new(3, 120.0, 50.0)
///     .with_duration(90)
///     .with_visitors(1200.0)
///     .with_opening_hours("1", 1000, 1800);
/// assert_eq!(museum.opening_hours("1"), Some((1000, 1800)));
/// assert_eq!(museum.opening_hours("0"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub id: LocationId,
    #[serde(default)]
    pub title: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    /// Visit duration in minutes.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub open_hours: BTreeMap<String, [u32; 2]>,
    #[serde(flatten)]
    pub popularity: Popularity,
}

impl Location {
    /// Creates a location at a planar position with no duration or value.
    pub fn new(id: LocationId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            ..Self::default()
        }
    }

    /// Sets the visit duration in minutes.
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = minutes;
        self
    }

    /// Sets the instagram visitor count.
    pub fn with_visitors(mut self, visitors: f64) -> Self {
        self.popularity.instagram_visitors = visitors;
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Adds an opening window for a day key.
    pub fn with_opening_hours(mut self, day: impl Into<String>, open: u32, close: u32) -> Self {
        self.open_hours.insert(day.into(), [open, close]);
        self
    }

    /// Sets all popularity attributes.
    pub fn with_popularity(mut self, popularity: Popularity) -> Self {
        self.popularity = popularity;
        self
    }

    /// Opening window `(open, close)` in HHMM for a day, if any.
    pub fn opening_hours(&self, day: &str) -> Option<(u32, u32)> {
        self.open_hours.get(day).map(|w| (w[0], w[1]))
    }

    /// Euclidean distance to another location.
    pub fn distance_to(&self, other: &Location) -> f64 {
        geometry::euclidean(self, other)
    }

    /// Walking time to another location in whole minutes.
    pub fn walking_time_to(&self, other: &Location) -> u32 {
        geometry::walking_time(self, other)
    }
}

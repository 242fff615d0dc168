//! Domain model: locations, routes, candidate sets, and planar geometry.

pub mod geometry;
mod location;
mod route;

pub use location::{Location, LocationId, Popularity};
pub use route::{CandidateSet, Route};

use std::sync::Arc;

use crate::error::{Error, Result};

/// Finds a location by id, trusting `id == index` first.
pub(crate) fn lookup(locations: &[Arc<Location>], id: LocationId) -> Result<Arc<Location>> {
    locations
        .get(id)
        .filter(|l| l.id == id)
        .or_else(|| locations.iter().find(|l| l.id == id))
        .cloned()
        .ok_or(Error::UnknownLocation(id))
}

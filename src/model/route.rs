//! Routes and candidate sets.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Location, LocationId};

/// Locations currently eligible for insertion, keyed by id.
///
/// Ordered iteration keeps every engine deterministic for a fixed seed.
pub type CandidateSet = BTreeMap<LocationId, Arc<Location>>;

/// An ordered path of stops.
///
/// Holds the visiting order plus the id → location map of the stops on it.
/// A route never contains the same id twice.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_orienteering::model::{Location, Route};
///
/// let start = Arc::new(Location::new(0, 0.0, 0.0));
/// let end = Arc::new(Location::new(4, 400.0, 0.0));
/// let mut route = Route::anchored(start, end);
/// route.insert(1, Arc::new(Location::new(2, 200.0, 0.0)));
/// assert_eq!(route.order(), &[0, 2, 4]);
/// assert_eq!(route.interior(0, 4).map(|l| l.id).collect::<Vec<_>>(), vec![2]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    order: Vec<LocationId>,
    stops: BTreeMap<LocationId, Arc<Location>>,
}

impl Route {
    /// Creates an empty route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the two-stop route `start → end`.
    pub fn anchored(start: Arc<Location>, end: Arc<Location>) -> Self {
        let mut route = Self::new();
        route.push(start);
        route.push(end);
        route
    }

    /// Builds a route from stops in visiting order.
    pub fn from_stops(stops: impl IntoIterator<Item = Arc<Location>>) -> Self {
        let mut route = Self::new();
        for stop in stops {
            route.push(stop);
        }
        route
    }

    /// Appends a stop.
    ///
    /// Callers keep ids unique; a repeated id is reported by
    /// [`has_repeats`](Self::has_repeats).
    pub fn push(&mut self, location: Arc<Location>) {
        self.order.push(location.id);
        self.stops.insert(location.id, location);
    }

    /// Inserts a stop at `index` in the visiting order.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, location: Arc<Location>) {
        self.order.insert(index, location.id);
        self.stops.insert(location.id, location);
    }

    /// Copy of this route with `location` appended.
    pub fn with_appended(&self, location: Arc<Location>) -> Self {
        let mut route = self.clone();
        route.push(location);
        route
    }

    /// Copy of this route with `location` inserted at `index`.
    pub fn with_inserted(&self, index: usize, location: Arc<Location>) -> Self {
        let mut route = self.clone();
        route.insert(index, location);
        route
    }

    /// Visiting order as ids.
    pub fn order(&self) -> &[LocationId] {
        &self.order
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the route has no stops.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if some id appears more than once in the order.
    pub fn has_repeats(&self) -> bool {
        self.order.len() != self.stops.len()
    }

    /// Returns `true` if `id` is on the route.
    pub fn contains(&self, id: LocationId) -> bool {
        self.stops.contains_key(&id)
    }

    /// The stop with the given id.
    pub fn get(&self, id: LocationId) -> Option<&Arc<Location>> {
        self.stops.get(&id)
    }

    /// Position of `id` in the visiting order.
    pub fn position(&self, id: LocationId) -> Option<usize> {
        self.order.iter().position(|&o| o == id)
    }

    /// First stop.
    pub fn first(&self) -> Option<&Arc<Location>> {
        self.order.first().and_then(|id| self.stops.get(id))
    }

    /// Last stop.
    pub fn last(&self) -> Option<&Arc<Location>> {
        self.order.last().and_then(|id| self.stops.get(id))
    }

    /// Stops in visiting order.
    pub fn stops(&self) -> impl Iterator<Item = &Arc<Location>> + '_ {
        self.order.iter().filter_map(move |id| self.stops.get(id))
    }

    /// Stops in visiting order, skipping the two anchor ids.
    ///
    /// Lets feasibility and scoring code treat a route with or without its
    /// anchors the same way.
    pub fn interior(
        &self,
        start: LocationId,
        end: LocationId,
    ) -> impl Iterator<Item = &Arc<Location>> + '_ {
        self.stops().filter(move |l| l.id != start && l.id != end)
    }

    /// Consecutive `(from, to)` id pairs.
    pub fn edges(&self) -> impl Iterator<Item = (LocationId, LocationId)> + '_ {
        self.order.windows(2).map(|w| (w[0], w[1]))
    }
}

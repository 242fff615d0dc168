//! Strategy traits consumed by the route-construction engines.
//!
//! The three traits split one routing problem into the parts an engine does
//! not own: where candidates come from ([`CandidateProvider`]), which routes
//! are allowed ([`FeasibilityChecker`]), and how much a stop is worth
//! ([`Scorer`]).
//!
//! Checkers and scorers are plain state values. Lifecycle operations
//! (`initialize`, `refresh`, `reconfigure`) return a new value instead of
//! mutating in place, so a colony worker can refresh its own copy while
//! other workers keep reading theirs.

use std::borrow::Cow;
use std::sync::Arc;

use crate::config::SolverConfig;
use crate::error::Result;
use crate::model::{CandidateSet, Location, LocationId, Route};

/// Start and end of the segment a checker or scorer is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchors {
    pub start: LocationId,
    pub end: LocationId,
}

impl Anchors {
    pub fn new(start: LocationId, end: LocationId) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `id` is one of the two anchors.
    pub fn contains(&self, id: LocationId) -> bool {
        id == self.start || id == self.end
    }
}

/// Source of locations.
///
/// # Thread Safety
///
/// Providers are shared read-only with the engines and must be
/// `Send + Sync`.
pub trait CandidateProvider: Send + Sync {
    /// Prepares the location set from configuration.
    fn initialize(&mut self, config: &SolverConfig) -> Result<()>;

    /// Every known location, indexed by id.
    fn all_locations(&self) -> &[Arc<Location>];

    /// Locations eligible for the current segment.
    ///
    /// The default keeps every location the checker admits in isolation.
    fn current_candidates<C: FeasibilityChecker>(&self, checker: &C) -> CandidateSet {
        self.all_locations()
            .iter()
            .filter(|l| checker.single_point_admissible(l))
            .map(|l| (l.id, Arc::clone(l)))
            .collect()
    }
}

/// Feasibility rules for routes of one segment.
///
/// A route passed to [`boundary`](FeasibilityChecker::boundary) may or may
/// not include the anchors; implementations always evaluate the path
/// `start → interior → end`.
pub trait FeasibilityChecker: Clone + Send + Sync {
    /// Returns a checker prepared against the full location set.
    fn initialize(&self, locations: &[Arc<Location>]) -> Result<Self>;

    /// Segment anchors this checker evaluates against.
    fn anchors(&self) -> Anchors;

    /// Returns `true` if the route is allowed.
    fn boundary(&self, route: &Route) -> bool;

    /// Narrows the candidate set for extending `route`.
    ///
    /// The default keeps every candidate.
    fn reduce_candidates<'a>(
        &self,
        _route: &Route,
        candidates: &'a CandidateSet,
    ) -> Cow<'a, CandidateSet> {
        Cow::Borrowed(candidates)
    }

    /// Whether a location may be visited at all in this segment.
    fn single_point_admissible(&self, location: &Location) -> bool;

    /// Returns a checker re-targeted at new anchors.
    ///
    /// The default returns an unchanged copy.
    fn reconfigure(&self, _anchors: Anchors, _locations: &[Arc<Location>]) -> Result<Self> {
        Ok(self.clone())
    }
}

/// Valuation of stops and routes. Higher is better.
pub trait Scorer: Clone + Send + Sync {
    /// Returns a scorer prepared against the full location set.
    fn initialize(&self, _locations: &[Arc<Location>]) -> Result<Self> {
        Ok(self.clone())
    }

    /// Marginal value of visiting `location` on `route`.
    ///
    /// `location` may or may not already be on the route.
    fn single_insertion_value(&self, route: &Route, location: &Location) -> f64;

    /// Total value of a route.
    ///
    /// The default sums the single values of every stop.
    fn route_value(&self, route: &Route) -> f64 {
        route
            .stops()
            .map(|l| self.single_insertion_value(route, l))
            .sum()
    }

    /// Returns a scorer updated for the route and candidates about to be
    /// evaluated (e.g. renormalized maxima).
    fn refresh(&self, _route: &Route, _candidates: &CandidateSet) -> Self {
        self.clone()
    }

    /// Returns a scorer re-targeted at new anchors.
    fn reconfigure(&self, _anchors: Anchors, _locations: &[Arc<Location>]) -> Result<Self> {
        Ok(self.clone())
    }
}

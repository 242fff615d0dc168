//! Classic orienteering budget.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::{path_time, Terminals};
use crate::error::Result;
use crate::model::{CandidateSet, Location, LocationId, Route};
use crate::strategy::{Anchors, FeasibilityChecker};

/// Accepts a route when its total path time fits a budget in minutes.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_orienteering::model::{Location, Route};
/// use u_orienteering::strategy::{Anchors, FeasibilityChecker};
/// use u_orienteering::variants::BudgetChecker;
///
/// let locations: Vec<_> = [0.0, 700.0, 1400.0]
///     .iter()
///     .enumerate()
///     .map(|(i, &x)| Arc::new(Location::new(i, x, 0.0)))
///     .collect();
/// let checker = BudgetChecker::new(Anchors::new(0, 2), 20)
///     .initialize(&locations)
///     .unwrap();
/// let route = Route::from_stops([Arc::clone(&locations[1])]);
/// assert_eq!(checker.route_time(&route), 20);
/// assert!(checker.boundary(&route));
/// ```
#[derive(Debug, Clone)]
pub struct BudgetChecker {
    anchors: Anchors,
    limit: u32,
    forbidden: BTreeSet<LocationId>,
    pruning: bool,
    terminals: Option<Terminals>,
}

impl BudgetChecker {
    /// Creates a checker for `anchors` with a budget of `limit` minutes.
    pub fn new(anchors: Anchors, limit: u32) -> Self {
        Self {
            anchors,
            limit,
            forbidden: BTreeSet::new(),
            pruning: true,
            terminals: None,
        }
    }

    /// Adds locations that may never be visited.
    pub fn with_forbidden(mut self, ids: impl IntoIterator<Item = LocationId>) -> Self {
        self.forbidden.extend(ids);
        self
    }

    /// Enables or disables candidate pruning in `reduce_candidates`.
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn forbidden(&self) -> &BTreeSet<LocationId> {
        &self.forbidden
    }

    /// Path time of `start → interior → end`.
    ///
    /// Before initialization the anchors are unknown and only the route's
    /// own stops are measured.
    pub fn route_time(&self, route: &Route) -> u32 {
        path_time(&self.travelled(route, None))
    }

    /// Stops travelled when `extra` is appended to `route`.
    pub(crate) fn travelled<'a>(
        &'a self,
        route: &'a Route,
        extra: Option<&'a Location>,
    ) -> Vec<&'a Location> {
        match &self.terminals {
            Some(t) => t.path(route, extra),
            None => route
                .stops()
                .map(|l| l.as_ref())
                .chain(extra)
                .collect(),
        }
    }

    pub(crate) fn is_excluded(&self, id: LocationId) -> bool {
        self.anchors.contains(id) || self.forbidden.contains(&id)
    }

    pub(crate) fn fits(&self, minutes: u32) -> bool {
        minutes <= self.limit
    }
}

impl FeasibilityChecker for BudgetChecker {
    fn initialize(&self, locations: &[Arc<Location>]) -> Result<Self> {
        Ok(Self {
            terminals: Some(Terminals::resolve(self.anchors, locations)?),
            ..self.clone()
        })
    }

    fn anchors(&self) -> Anchors {
        self.anchors
    }

    fn boundary(&self, route: &Route) -> bool {
        self.fits(self.route_time(route))
    }

    fn reduce_candidates<'a>(
        &self,
        route: &Route,
        candidates: &'a CandidateSet,
    ) -> Cow<'a, CandidateSet> {
        if !self.pruning {
            return Cow::Borrowed(candidates);
        }
        Cow::Owned(
            candidates
                .iter()
                .filter(|&(&id, loc)| {
                    !route.contains(id)
                        && self.fits(path_time(&self.travelled(route, Some(loc.as_ref()))))
                })
                .map(|(&id, loc)| (id, Arc::clone(loc)))
                .collect(),
        )
    }

    fn single_point_admissible(&self, location: &Location) -> bool {
        !self.is_excluded(location.id)
            && self.fits(path_time(&self.travelled(&Route::new(), Some(location))))
    }

    fn reconfigure(&self, anchors: Anchors, locations: &[Arc<Location>]) -> Result<Self> {
        Ok(Self {
            anchors,
            terminals: Some(Terminals::resolve(anchors, locations)?),
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Locations 700 m apart along the x axis (10 minutes between neighbours).
    fn line(n: usize) -> Vec<Arc<Location>> {
        (0..n)
            .map(|i| Arc::new(Location::new(i, i as f64 * 700.0, 0.0).with_duration(5)))
            .collect()
    }

    #[test]
    fn test_route_time_with_and_without_anchors() {
        let locs = line(4);
        let checker = BudgetChecker::new(Anchors::new(0, 3), 100)
            .initialize(&locs)
            .unwrap();
        let interior = Route::from_stops([Arc::clone(&locs[1]), Arc::clone(&locs[2])]);
        let anchored = Route::from_stops(locs.iter().cloned());
        // 4 durations of 5 plus 3 walks of 10
        assert_eq!(checker.route_time(&interior), 50);
        assert_eq!(checker.route_time(&anchored), 50);
        // 2100 m is 31 minutes
        assert_eq!(checker.route_time(&Route::new()), 5 + 31 + 5);
    }

    #[test]
    fn test_boundary_at_limit() {
        let locs = line(4);
        let route = Route::from_stops([Arc::clone(&locs[1])]);
        let exact = BudgetChecker::new(Anchors::new(0, 3), 45)
            .initialize(&locs)
            .unwrap();
        assert_eq!(exact.route_time(&route), 45);
        assert!(exact.boundary(&route));
        let tight = BudgetChecker::new(Anchors::new(0, 3), 44)
            .initialize(&locs)
            .unwrap();
        assert!(!tight.boundary(&route));
    }

    #[test]
    fn test_single_point_rules() {
        let locs = line(6);
        let open = BudgetChecker::new(Anchors::new(0, 2), 40)
            .initialize(&locs)
            .unwrap();
        // 0 → 1 → 2: durations 15, walks 10 + 10
        assert!(open.single_point_admissible(&locs[1]));
        // 0 → 3 → 2: durations 15, walks 31 + 10
        assert!(!open.single_point_admissible(&locs[3]));
        assert!(!open.single_point_admissible(&locs[0]));
        assert!(!open.single_point_admissible(&locs[2]));

        let closed = open.with_forbidden([1]);
        assert!(!closed.single_point_admissible(&locs[1]));
    }

    #[test]
    fn test_reduce_prunes_unreachable() {
        let locs = line(5);
        let checker = BudgetChecker::new(Anchors::new(0, 1), 40)
            .initialize(&locs)
            .unwrap();
        let candidates: CandidateSet = locs[2..].iter().map(|l| (l.id, Arc::clone(l))).collect();
        let reduced = checker.reduce_candidates(&Route::new(), &candidates);
        // 0 → 2 → 1: 15 + 20 + 10 = 45 > 40
        assert!(reduced.is_empty());

        let loose = checker.clone().with_pruning(false);
        assert_eq!(loose.reduce_candidates(&Route::new(), &candidates).len(), 3);
    }

    #[test]
    fn test_reconfigure_moves_anchors() {
        let locs = line(4);
        let checker = BudgetChecker::new(Anchors::new(0, 3), 100)
            .initialize(&locs)
            .unwrap();
        let moved = checker.reconfigure(Anchors::new(1, 2), &locs).unwrap();
        assert_eq!(moved.anchors(), Anchors::new(1, 2));
        assert_eq!(moved.route_time(&Route::new()), 20);
        assert!(matches!(
            checker.reconfigure(Anchors::new(1, 9), &locs),
            Err(Error::UnknownLocation(9))
        ));
    }
}

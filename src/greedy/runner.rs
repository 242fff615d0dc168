//! Greedy insertion execution engine.
//!
//! # Algorithm
//!
//! 1. Start from the seed route (or the segment's anchor route)
//! 2. For every adjacent pair `(a, b)`:
//!    a. Re-anchor the checker at `(a, b)` and reduce the candidates
//!    b. Refresh the scorer on the reduced set
//!    c. Evaluate every unrouted candidate inserted between `a` and `b`
//! 3. Commit the best strictly positive insertion that keeps the route
//!    feasible, then repeat
//! 4. Stop when no interval offers one

use std::sync::Arc;

use log::{debug, info};

use crate::construction::{RouteConstruction, RouteResult, Segment};
use crate::error::{Error, Result};
use crate::model::{Location, Route};
use crate::strategy::{Anchors, FeasibilityChecker, Scorer};

/// Result of a greedy run.
#[derive(Debug, Clone)]
pub struct GreedyResult {
    /// Final route, anchors included.
    pub route: Route,
    /// `route_value` of the final route.
    pub score: f64,
    /// Number of committed insertions.
    pub insertions: usize,
    /// Number of candidate evaluations.
    pub evaluations: usize,
}

impl From<GreedyResult> for RouteResult {
    fn from(result: GreedyResult) -> Self {
        RouteResult {
            route: result.route,
            score: result.score,
        }
    }
}

/// Best insertion found in one pass.
struct Insertion {
    position: usize,
    location: Arc<Location>,
    value: f64,
}

/// Greedy insertion runner.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_orienteering::construction::Segment;
/// use u_orienteering::greedy::GreedyInsertion;
/// use u_orienteering::model::{CandidateSet, Location};
/// use u_orienteering::strategy::{Anchors, FeasibilityChecker};
/// use u_orienteering::variants::{BudgetChecker, PopularityScorer};
///
/// let locations: Vec<_> = (0..4)
///     .map(|i| Arc::new(Location::new(i, i as f64 * 700.0, 0.0).with_visitors(10.0)))
///     .collect();
/// let checker = BudgetChecker::new(Anchors::new(0, 3), 60)
///     .initialize(&locations)
///     .unwrap();
/// let candidates: CandidateSet = locations[1..3]
///     .iter()
///     .map(|l| (l.id, Arc::clone(l)))
///     .collect();
/// let segment = Segment::new(&locations, &candidates, &checker, &PopularityScorer);
///
/// let result = GreedyInsertion::new().run(&segment).unwrap();
/// assert_eq!(result.route.len(), 4);
/// assert_eq!(result.insertions, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyInsertion {
    initial: Option<Route>,
}

impl GreedyInsertion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the next run with `route`.
    ///
    /// The seed must hold at least two stops and is consumed by the run.
    pub fn set_initial_route(&mut self, route: Route) -> &mut Self {
        self.initial = Some(route);
        self
    }

    /// Builder form of [`set_initial_route`](Self::set_initial_route).
    pub fn with_initial_route(mut self, route: Route) -> Self {
        self.initial = Some(route);
        self
    }

    /// Pending seed route, if any.
    pub fn initial_route(&self) -> Option<&Route> {
        self.initial.as_ref()
    }

    /// Runs greedy insertion over `segment`.
    pub fn run<C, S>(&mut self, segment: &Segment<'_, C, S>) -> Result<GreedyResult>
    where
        C: FeasibilityChecker,
        S: Scorer,
    {
        let mut route = match self.initial.take() {
            Some(seed) => seed,
            None => segment.anchor_route()?,
        };
        if route.len() < 2 {
            return Err(Error::invalid_route(format!(
                "seed route needs at least two stops, got {}",
                route.len()
            )));
        }
        if route.has_repeats() {
            return Err(Error::invalid_route(format!(
                "seed route repeats a stop: {:?}",
                route.order()
            )));
        }
        if !segment.checker.boundary(&route) {
            return Err(Error::InfeasibleSeed(route.order().to_vec()));
        }

        info!(
            "greedy insertion: {} candidates, seed {:?}",
            segment.candidates.len(),
            route.order()
        );

        let mut insertions = 0;
        let mut evaluations = 0;
        while let Some(best) = best_insertion(segment, &route, &mut evaluations)? {
            debug!(
                "insert {} at {} (value {:.4})",
                best.location.id, best.position, best.value
            );
            route.insert(best.position, best.location);
            insertions += 1;
        }

        let score = segment.scorer.route_value(&route);
        info!(
            "greedy insertion finished: {} insertions, {} evaluations, score {:.4}",
            insertions, evaluations, score
        );

        Ok(GreedyResult {
            route,
            score,
            insertions,
            evaluations,
        })
    }
}

/// Best feasible insertion over every interval of `route`.
fn best_insertion<C, S>(
    segment: &Segment<'_, C, S>,
    route: &Route,
    evaluations: &mut usize,
) -> Result<Option<Insertion>>
where
    C: FeasibilityChecker,
    S: Scorer,
{
    let mut best: Option<Insertion> = None;
    let stops: Vec<&Arc<Location>> = route.stops().collect();

    for (i, pair) in stops.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        let local = segment
            .checker
            .reconfigure(Anchors::new(a.id, b.id), segment.locations)?;
        let interval = Route::anchored(Arc::clone(a), Arc::clone(b));
        let reduced = local.reduce_candidates(&interval, segment.candidates);
        let scorer = segment.scorer.refresh(route, &reduced);

        for candidate in reduced.values().filter(|c| !route.contains(c.id)) {
            *evaluations += 1;
            let trial = route.with_inserted(i + 1, Arc::clone(candidate));
            let value = scorer.single_insertion_value(&trial, candidate);
            let improves = value > 0.0 && best.as_ref().map_or(true, |b| value > b.value);
            if improves && segment.checker.boundary(&trial) {
                best = Some(Insertion {
                    position: i + 1,
                    location: Arc::clone(candidate),
                    value,
                });
            }
        }
    }

    Ok(best)
}

impl RouteConstruction for GreedyInsertion {
    fn build_route<C: FeasibilityChecker, S: Scorer>(
        &mut self,
        segment: &Segment<'_, C, S>,
    ) -> Result<RouteResult> {
        self.run(segment).map(RouteResult::from)
    }
}

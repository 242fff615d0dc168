//! Orchestrator.
//!
//! [`Solver`] owns the candidate provider, the feasibility checker, the
//! scorer and the selected engine, and drives one or more segment
//! constructions.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, info};

use crate::config::SolverConfig;
use crate::construction::{Algorithm, RouteConstruction, RouteResult, Segment};
use crate::error::{Error, Result};
use crate::model::{LocationId, Route};
use crate::strategy::{Anchors, CandidateProvider, FeasibilityChecker, Scorer};

/// Route planner over one provider, checker and scorer.
///
/// # Examples
///
/// ```
/// use u_orienteering::model::Location;
/// use u_orienteering::strategy::{Anchors, LocationCatalog};
/// use u_orienteering::variants::{BudgetChecker, PopularityScorer};
/// use u_orienteering::{Solver, SolverConfig};
///
/// let catalog = LocationCatalog::from_locations(
///     (0..5).map(|i| Location::new(i, i as f64 * 700.0, 0.0).with_visitors(1.0)),
/// );
/// let mut solver = Solver::initialize(
///     SolverConfig::greedy(),
///     catalog,
///     BudgetChecker::new(Anchors::new(0, 4), 120),
///     PopularityScorer,
/// )
/// .unwrap();
///
/// let result = solver.compute_segment().unwrap();
/// assert_eq!(result.route.len(), 5);
/// assert_eq!(result.score, 5.0);
/// ```
#[derive(Debug)]
pub struct Solver<P, C, S> {
    config: SolverConfig,
    provider: P,
    checker: C,
    scorer: S,
    algorithm: Algorithm,
}

impl<P, C, S> Solver<P, C, S>
where
    P: CandidateProvider,
    C: FeasibilityChecker,
    S: Scorer,
{
    /// Validates the configuration and prepares every strategy.
    ///
    /// Order: provider, algorithm, scorer, checker. The first error aborts
    /// initialization.
    pub fn initialize(config: SolverConfig, mut provider: P, checker: C, scorer: S) -> Result<Self> {
        config.validate()?;
        provider.initialize(&config)?;
        let algorithm = Algorithm::from_config(&config)?;
        let scorer = scorer.initialize(provider.all_locations())?;
        let checker = checker.initialize(provider.all_locations())?;

        info!(
            "solver ready: {} locations, {:?} engine",
            provider.all_locations().len(),
            algorithm.kind()
        );

        Ok(Self {
            config,
            provider,
            checker,
            scorer,
            algorithm,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn checker(&self) -> &C {
        &self.checker
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Replaces the checker used by later computations.
    pub fn set_checker(&mut self, checker: C) {
        self.checker = checker;
    }

    /// Replaces the scorer used by later computations.
    pub fn set_scorer(&mut self, scorer: S) {
        self.scorer = scorer;
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Mutable engine access, e.g. to seed the greedy engine.
    pub fn algorithm_mut(&mut self) -> &mut Algorithm {
        &mut self.algorithm
    }

    /// Builds one route between the checker's anchors.
    pub fn compute_segment(&mut self) -> Result<RouteResult> {
        let locations = self.provider.all_locations();
        let checker = self.checker.initialize(locations)?;
        let scorer = self.scorer.initialize(locations)?;
        self.compute(&checker, &scorer, &BTreeSet::new())
    }

    /// Builds a route through `waypoints` in order, one segment per
    /// consecutive pair.
    ///
    /// Interior stops used by one segment are unavailable to later ones, and
    /// no waypoint is used as an interior stop. Shared waypoints appear once
    /// in the returned route, which is scored end to end.
    pub fn solve_through(&mut self, waypoints: &[LocationId]) -> Result<RouteResult> {
        if waypoints.len() < 2 {
            return Err(Error::invalid_route(format!(
                "need at least two waypoints, got {}",
                waypoints.len()
            )));
        }
        let mut excluded: BTreeSet<LocationId> = waypoints.iter().copied().collect();
        if excluded.len() != waypoints.len() {
            return Err(Error::invalid_route(format!(
                "waypoints repeat a location: {waypoints:?}"
            )));
        }

        let locations = self.provider.all_locations();
        let checker = self.checker.initialize(locations)?;
        let scorer = self.scorer.initialize(locations)?;

        let mut route = Route::new();
        for pair in waypoints.windows(2) {
            let anchors = Anchors::new(pair[0], pair[1]);
            let locations = self.provider.all_locations();
            let local_checker = checker.reconfigure(anchors, locations)?;
            let local_scorer = scorer.reconfigure(anchors, locations)?;

            let segment = self.compute(&local_checker, &local_scorer, &excluded)?;
            debug!(
                "segment {} -> {}: {:?} (score {:.4})",
                anchors.start,
                anchors.end,
                segment.order(),
                segment.score
            );

            for stop in segment.route.stops() {
                if !route.contains(stop.id) {
                    route.push(Arc::clone(stop));
                }
                excluded.insert(stop.id);
            }
        }

        let first = waypoints[0];
        let last = waypoints[waypoints.len() - 1];
        let score = scorer
            .reconfigure(Anchors::new(first, last), self.provider.all_locations())?
            .route_value(&route);
        info!(
            "route through {} waypoints: {} stops, score {:.4}",
            waypoints.len(),
            route.len(),
            score
        );

        Ok(RouteResult { route, score })
    }

    fn compute(
        &mut self,
        checker: &C,
        scorer: &S,
        excluded: &BTreeSet<LocationId>,
    ) -> Result<RouteResult> {
        let mut candidates = self.provider.current_candidates(checker);
        candidates.retain(|id, _| !excluded.contains(id));
        let segment = Segment::new(self.provider.all_locations(), &candidates, checker, scorer);
        self.algorithm.build_route(&segment)
    }
}

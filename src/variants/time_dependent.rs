//! Orienteering with time-dependent travel.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::{hhmm_to_minutes, BudgetChecker};
use crate::error::Result;
use crate::model::{geometry, CandidateSet, Location, LocationId, Route};
use crate::strategy::{Anchors, FeasibilityChecker};

const HOURS: usize = 24;

/// Relative spread of travel times around the walking time.
const SPEED_SPREAD: f64 = 0.05;

/// Budget checker whose travel times depend on the hour of arrival.
///
/// Every location gets 24 standard-normal factors, one per clock hour,
/// sampled at initialization from a seeded stream. Walking `w` minutes into
/// location `j` while the clock reads hour `h` takes
/// `w + trunc(0.05 · w · f[j][h])` minutes, or `w` when that is not
/// positive.
#[derive(Debug, Clone)]
pub struct TimeDependentChecker {
    budget: BudgetChecker,
    start_time: u32,
    seed: u64,
    factors: Arc<HashMap<LocationId, [f64; HOURS]>>,
}

impl TimeDependentChecker {
    /// `start_time` is in HHMM notation.
    pub fn new(anchors: Anchors, limit: u32, start_time: u32, seed: u64) -> Self {
        Self {
            budget: BudgetChecker::new(anchors, limit),
            start_time,
            seed,
            factors: Arc::new(HashMap::new()),
        }
    }

    /// Speed factor of `id` at clock hour `hour` (0 before initialization).
    pub fn factor(&self, id: LocationId, hour: usize) -> f64 {
        self.factors.get(&id).map_or(0.0, |f| f[hour % HOURS])
    }

    /// Travel time from `from` into `to` departing at `clock` minutes after
    /// midnight.
    pub fn travel_time(&self, from: &Location, to: &Location, clock: u32) -> u32 {
        let w = geometry::walking_time(from, to);
        let hour = (clock / 60) as usize % HOURS;
        let adjusted = w as f64 + (SPEED_SPREAD * w as f64 * self.factor(to.id, hour)).trunc();
        if adjusted <= 0.0 {
            w
        } else {
            adjusted as u32
        }
    }

    /// Time-dependent path time of `start → interior → end`.
    pub fn route_time(&self, route: &Route) -> u32 {
        self.timed(&self.budget.travelled(route, None))
    }

    fn timed(&self, path: &[&Location]) -> u32 {
        let origin = hhmm_to_minutes(self.start_time);
        let mut elapsed = 0u32;
        for (i, loc) in path.iter().enumerate() {
            if i > 0 {
                elapsed = elapsed.saturating_add(self.travel_time(
                    path[i - 1],
                    loc,
                    origin.saturating_add(elapsed),
                ));
            }
            elapsed = elapsed.saturating_add(loc.duration);
        }
        elapsed
    }
}

impl FeasibilityChecker for TimeDependentChecker {
    fn initialize(&self, locations: &[Arc<Location>]) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let factors = locations
            .iter()
            .map(|loc| {
                let mut row = [0.0; HOURS];
                for f in row.iter_mut() {
                    *f = rng.sample(StandardNormal);
                }
                (loc.id, row)
            })
            .collect();
        Ok(Self {
            budget: self.budget.initialize(locations)?,
            factors: Arc::new(factors),
            ..self.clone()
        })
    }

    fn anchors(&self) -> Anchors {
        self.budget.anchors()
    }

    fn boundary(&self, route: &Route) -> bool {
        self.budget.fits(self.route_time(route))
    }

    fn reduce_candidates<'a>(
        &self,
        route: &Route,
        candidates: &'a CandidateSet,
    ) -> Cow<'a, CandidateSet> {
        Cow::Owned(
            candidates
                .iter()
                .filter(|&(&id, loc)| {
                    !route.contains(id)
                        && self
                            .budget
                            .fits(self.timed(&self.budget.travelled(route, Some(loc.as_ref()))))
                })
                .map(|(&id, loc)| (id, Arc::clone(loc)))
                .collect(),
        )
    }

    fn single_point_admissible(&self, location: &Location) -> bool {
        !self.budget.is_excluded(location.id)
            && self
                .budget
                .fits(self.timed(&self.budget.travelled(&Route::new(), Some(location))))
    }

    fn reconfigure(&self, anchors: Anchors, locations: &[Arc<Location>]) -> Result<Self> {
        Ok(Self {
            budget: self.budget.reconfigure(anchors, locations)?,
            ..self.clone()
        })
    }
}

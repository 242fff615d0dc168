//! Single-agent route construction.

use std::cmp::Ordering;
use std::sync::Arc;

use rand::Rng;

use super::config::ColonyConfig;
use super::trail::{TrailDeposit, TrailTable};
use crate::config::InfeasiblePolicy;
use crate::construction::Segment;
use crate::model::{Location, Route};
use crate::strategy::{FeasibilityChecker, Scorer};

/// What one agent reports at the end of a cycle.
#[derive(Debug, Clone)]
pub(crate) struct AgentOutcome {
    /// Anchored route `start → interior → end`.
    pub route: Route,
    pub score: f64,
    pub deposits: Vec<TrailDeposit>,
}

/// Fitness-proportionate pick over `weights`.
///
/// Draws uniformly in `[0, sum)` and returns the first index whose
/// cumulative weight reaches the draw. Non-finite and non-positive weights
/// are never picked. Returns `None` when nothing can be picked.
pub(crate) fn spin<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let usable = |w: f64| w.is_finite() && w > 0.0;
    let total: f64 = weights.iter().copied().filter(|&w| usable(w)).sum();
    if !(total.is_finite() && total > 0.0) {
        return None;
    }
    let draw = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last = None;
    for (i, &w) in weights.iter().enumerate() {
        if !usable(w) {
            continue;
        }
        cumulative += w;
        last = Some(i);
        if cumulative >= draw {
            return Some(i);
        }
    }
    // rounding can leave the final sum a hair below the draw
    last
}

/// Builds one agent's route.
///
/// The partial route holds interior stops only; `anchor_route` supplies
/// the ends for the reported route.
pub(crate) fn construct<C, S, R>(
    segment: &Segment<'_, C, S>,
    anchor_route: &Route,
    trail: &TrailTable,
    config: &ColonyConfig,
    population: usize,
    rng: &mut R,
) -> AgentOutcome
where
    C: FeasibilityChecker,
    S: Scorer,
    R: Rng,
{
    let anchors = segment.anchors();
    let mut partial = Route::new();

    loop {
        let reduced = segment.checker.reduce_candidates(&partial, segment.candidates);
        let scorer = segment.scorer.refresh(&partial, &reduced);
        let previous = partial.last().map(|l| l.id);

        let mut wheel: Vec<(f64, Arc<Location>)> = reduced
            .values()
            .filter(|c| !partial.contains(c.id) && !anchors.contains(c.id))
            .filter_map(|c| {
                let trail_term = match previous {
                    Some(from) => trail.strength(from, c.id),
                    None => trail.baseline(),
                };
                let desirability = trail_term.powf(config.pheromone_control)
                    * scorer
                        .single_insertion_value(&partial, c)
                        .powf(config.attractiveness_control);
                (desirability.is_finite() && desirability > 0.0)
                    .then(|| (desirability, Arc::clone(c)))
            })
            .collect();

        if let Some(k) = config.candidate_limit {
            wheel.sort_by(|a, b| {
                b.0.partial_cmp(&a.0)
                    .unwrap_or(Ordering::Equal)
                    .then(a.1.id.cmp(&b.1.id))
            });
            wheel.truncate(k);
        }

        let mut extended = None;
        while !wheel.is_empty() {
            let weights: Vec<f64> = wheel.iter().map(|(d, _)| *d).collect();
            let Some(idx) = spin(&weights, rng) else {
                break;
            };
            let trial = partial.with_appended(Arc::clone(&wheel[idx].1));
            if segment.checker.boundary(&trial) {
                extended = Some(trial);
                break;
            }
            match config.on_infeasible {
                InfeasiblePolicy::Terminate => break,
                InfeasiblePolicy::RetryNext => {
                    wheel.remove(idx);
                }
            }
        }

        match extended {
            Some(route) => partial = route,
            None => break,
        }
    }

    let mut route = anchor_route.clone();
    for (i, stop) in partial.stops().enumerate() {
        route.insert(i + 1, Arc::clone(stop));
    }
    let score = segment.scorer.route_value(&route);
    let amount = score / population as f64;
    let deposits = partial
        .edges()
        .map(|(from, to)| TrailDeposit { from, to, amount })
        .collect();

    AgentOutcome {
        route,
        score,
        deposits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CandidateSet;
    use crate::strategy::Anchors;
    use crate::testing::{candidates_of, line_city, UnitScorer};
    use crate::variants::BudgetChecker;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spin_empty_and_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(spin(&[], &mut rng), None);
        assert_eq!(spin(&[0.0, 0.0], &mut rng), None);
        assert_eq!(spin(&[-1.0, f64::NAN], &mut rng), None);
    }

    #[test]
    fn test_spin_single_positive() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            assert_eq!(spin(&[0.0, 3.0, -2.0], &mut rng), Some(1));
        }
    }

    #[test]
    fn test_spin_is_proportional() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut counts = [0usize; 2];
        for _ in 0..4000 {
            counts[spin(&[1.0, 3.0], &mut rng).unwrap()] += 1;
        }
        let share = counts[1] as f64 / 4000.0;
        assert!((share - 0.75).abs() < 0.05, "share {share}");
    }

    proptest! {
        #[test]
        fn prop_spin_never_picks_non_positive(
            weights in prop::collection::vec(-2.0f64..5.0, 1..20),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            match spin(&weights, &mut rng) {
                Some(i) => prop_assert!(weights[i] > 0.0),
                None => prop_assert!(weights.iter().all(|&w| w <= 0.0)),
            }
        }
    }

    #[test]
    fn test_agent_visits_everything_with_loose_budget() {
        let locs = line_city(5, 0);
        let checker = BudgetChecker::new(Anchors::new(0, 4), 1_000)
            .initialize(&locs)
            .unwrap();
        let candidates = candidates_of(&locs, &checker);
        let segment = Segment::new(&locs, &candidates, &checker, &UnitScorer);
        let anchor_route = segment.anchor_route().unwrap();
        let trail = TrailTable::new(0.5);
        let config = ColonyConfig::default();
        let mut rng = StdRng::seed_from_u64(5);

        let outcome = construct(&segment, &anchor_route, &trail, &config, 3, &mut rng);
        assert_eq!(outcome.route.len(), 5);
        assert_eq!(outcome.route.first().unwrap().id, 0);
        assert_eq!(outcome.route.last().unwrap().id, 4);
        assert_eq!(outcome.score, 5.0);
        // three interior stops, two interior edges
        assert_eq!(outcome.deposits.len(), 2);
        assert!(outcome.deposits.iter().all(|d| (d.amount - 5.0 / 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_agent_stops_on_empty_candidates() {
        let locs = line_city(3, 0);
        let checker = BudgetChecker::new(Anchors::new(0, 2), 1_000)
            .initialize(&locs)
            .unwrap();
        let candidates = CandidateSet::new();
        let segment = Segment::new(&locs, &candidates, &checker, &UnitScorer);
        let anchor_route = segment.anchor_route().unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        let outcome = construct(
            &segment,
            &anchor_route,
            &TrailTable::new(0.5),
            &ColonyConfig::default(),
            1,
            &mut rng,
        );
        assert_eq!(outcome.route.order(), &[0, 2]);
        assert!(outcome.deposits.is_empty());
    }

    #[test]
    fn test_candidate_limit_keeps_best_and_lowest_id() {
        let locs = line_city(6, 0);
        let checker = BudgetChecker::new(Anchors::new(0, 5), 1_000)
            .initialize(&locs)
            .unwrap();
        let candidates = candidates_of(&locs, &checker);
        let segment = Segment::new(&locs, &candidates, &checker, &UnitScorer);
        let anchor_route = segment.anchor_route().unwrap();
        let config = ColonyConfig::default().with_candidate_limit(1);
        let mut rng = StdRng::seed_from_u64(7);
        // uniform desirability: the single-slot wheel always holds the lowest id
        let outcome = construct(&segment, &anchor_route, &TrailTable::new(0.5), &config, 1, &mut rng);
        assert_eq!(outcome.route.order(), &[0, 1, 2, 3, 4, 5]);
    }
}

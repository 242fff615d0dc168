//! Fixtures shared by unit tests.

use std::sync::Arc;

use crate::model::{CandidateSet, Location, Route};
use crate::strategy::{FeasibilityChecker, Scorer};

/// `n` locations on the x axis, 700 m (ten walking minutes) apart.
///
/// Visitor counts cycle through 10..=50 so value-driven tests have
/// something to prefer.
pub(crate) fn line_city(n: usize, duration: u32) -> Vec<Arc<Location>> {
    (0..n)
        .map(|i| {
            Arc::new(
                Location::new(i, i as f64 * 700.0, 0.0)
                    .with_duration(duration)
                    .with_visitors(((i * 3) % 5 + 1) as f64 * 10.0),
            )
        })
        .collect()
}

/// Every location the checker admits on its own.
pub(crate) fn candidates_of<C: FeasibilityChecker>(
    locations: &[Arc<Location>],
    checker: &C,
) -> CandidateSet {
    locations
        .iter()
        .filter(|l| checker.single_point_admissible(l))
        .map(|l| (l.id, Arc::clone(l)))
        .collect()
}

/// Every stop is worth one.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct UnitScorer;

impl Scorer for UnitScorer {
    fn single_insertion_value(&self, _route: &Route, _location: &Location) -> f64 {
        1.0
    }
}

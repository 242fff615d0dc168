//! Concrete feasibility checkers and scorers.
//!
//! # Checkers
//!
//! - [`BudgetChecker`]: total path time within a budget (OP)
//! - [`TimeWindowChecker`]: budget plus opening hours (OPTW)
//! - [`TimeDependentChecker`]: budget with hour-dependent travel (TDOP)
//! - [`CompulsoryStopsChecker`]: per-interval budgets between compulsory
//!   stops (OPCV), plus [`split_into_days`]
//!
//! # Scorers
//!
//! - [`PopularityScorer`]: instagram visitor count
//! - [`ProfileScorer`]: normalized multi-attribute value with a detour term
//!
//! All checkers measure the path `start → interior → end`: the visit
//! duration of every stop on it plus the walking time between consecutive
//! stops.

mod budget;
mod compulsory;
mod scoring;
mod time_dependent;
mod time_window;

pub use budget::BudgetChecker;
pub use compulsory::{split_into_days, CompulsoryStopsChecker};
pub use scoring::{PopularityScorer, ProfileScorer};
pub use time_dependent::TimeDependentChecker;
pub use time_window::{hhmm_to_minutes, is_open, TimeWindowChecker};

use std::sync::Arc;

use crate::error::Result;
use crate::model::{geometry, lookup, Location, Route};
use crate::strategy::Anchors;

/// Anchor locations resolved against a location set.
#[derive(Debug, Clone)]
pub(crate) struct Terminals {
    pub start: Arc<Location>,
    pub end: Arc<Location>,
}

impl Terminals {
    pub fn resolve(anchors: Anchors, locations: &[Arc<Location>]) -> Result<Self> {
        Ok(Self {
            start: lookup(locations, anchors.start)?,
            end: lookup(locations, anchors.end)?,
        })
    }

    /// `start → interior → extra → end`.
    pub fn path<'a>(&'a self, route: &'a Route, extra: Option<&'a Location>) -> Vec<&'a Location> {
        let mut path = Vec::with_capacity(route.len() + 3);
        path.push(self.start.as_ref());
        path.extend(
            route
                .interior(self.start.id, self.end.id)
                .map(|l| l.as_ref()),
        );
        path.extend(extra);
        path.push(self.end.as_ref());
        path
    }
}

/// Visit durations plus walking times along `path`.
pub(crate) fn path_time(path: &[&Location]) -> u32 {
    let walking = path
        .windows(2)
        .fold(0u32, |acc, w| acc.saturating_add(geometry::walking_time(w[0], w[1])));
    path.iter()
        .fold(walking, |acc, l| acc.saturating_add(l.duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_time() {
        let a = Location::new(0, 0.0, 0.0).with_duration(10);
        let b = Location::new(1, 700.0, 0.0).with_duration(5);
        let c = Location::new(2, 700.0, 700.0);
        // durations 15, walks 10 + 10
        assert_eq!(path_time(&[&a, &b, &c]), 35);
        assert_eq!(path_time(&[&a]), 10);
        assert_eq!(path_time(&[]), 0);
    }

    #[test]
    fn test_path_skips_anchors_on_route() {
        let locations: Vec<_> = (0..4)
            .map(|i| Arc::new(Location::new(i, i as f64, 0.0)))
            .collect();
        let terminals = Terminals::resolve(Anchors::new(0, 3), &locations).unwrap();
        let route = Route::from_stops([
            Arc::clone(&locations[0]),
            Arc::clone(&locations[2]),
            Arc::clone(&locations[3]),
        ]);
        let ids: Vec<_> = terminals
            .path(&route, Some(locations[1].as_ref()))
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![0, 2, 1, 3]);
    }
}

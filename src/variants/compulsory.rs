//! Orienteering with compulsory stops.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::Arc;

use log::warn;

use super::{path_time, Terminals};
use crate::error::{Error, Result};
use crate::model::{geometry, lookup, CandidateSet, Location, LocationId, Route};
use crate::strategy::{Anchors, FeasibilityChecker};

/// Checker for routes that must pass through an ordered list of compulsory
/// stops.
///
/// The route budget is split into one budget per interval between
/// consecutive compulsory stops. Each interval receives its minimum (walking
/// time between its ends plus their visit durations) and a share of the
/// remaining reserve proportional to the number of locations near the
/// interval. The start's duration counts only in the first interval, since
/// later intervals start where the previous one ended.
///
/// A location is near an interval when it lies within the interval's
/// end-to-end distance of either end. Candidates outside both circles are
/// rejected.
///
/// [`reconfigure`](FeasibilityChecker::reconfigure) with the ends of an
/// interval selects that interval. Any other anchor pair keeps the current
/// interval and only moves the anchors.
#[derive(Debug, Clone)]
pub struct CompulsoryStopsChecker {
    stops: Vec<LocationId>,
    route_limit: u32,
    forbidden: BTreeSet<LocationId>,
    interval: usize,
    interval_limits: Vec<u32>,
    anchors: Anchors,
    terminals: Option<Terminals>,
    circle: Option<(Terminals, f64)>,
}

impl CompulsoryStopsChecker {
    /// Creates a checker for `stops` sharing a budget of `route_limit`
    /// minutes.
    pub fn new(stops: Vec<LocationId>, route_limit: u32) -> Result<Self> {
        if stops.len() < 2 {
            return Err(Error::invalid_route(format!(
                "need at least two compulsory stops, got {}",
                stops.len()
            )));
        }
        let anchors = Anchors::new(stops[0], stops[1]);
        Ok(Self {
            stops,
            route_limit,
            forbidden: BTreeSet::new(),
            interval: 0,
            interval_limits: Vec::new(),
            anchors,
            terminals: None,
            circle: None,
        })
    }

    pub fn with_forbidden(mut self, ids: impl IntoIterator<Item = LocationId>) -> Self {
        self.forbidden.extend(ids);
        self
    }

    pub fn stops(&self) -> &[LocationId] {
        &self.stops
    }

    /// Index of the current interval.
    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Budget of every interval, computed at initialization.
    pub fn interval_limits(&self) -> &[u32] {
        &self.interval_limits
    }

    /// Budget of the current interval.
    pub fn current_limit(&self) -> u32 {
        self.interval_limits
            .get(self.interval)
            .copied()
            .unwrap_or(self.route_limit)
    }

    /// Path time of `start → interior → end` within the current interval.
    pub fn route_time(&self, route: &Route) -> u32 {
        self.path_time_with(route, None)
    }

    fn path_time_with(&self, route: &Route, extra: Option<&Location>) -> u32 {
        let Some(terminals) = &self.terminals else {
            return path_time(&route.stops().map(|l| l.as_ref()).chain(extra).collect::<Vec<_>>());
        };
        let total = path_time(&terminals.path(route, extra));
        if self.interval > 0 {
            total.saturating_sub(terminals.start.duration)
        } else {
            total
        }
    }

    fn is_excluded(&self, id: LocationId) -> bool {
        self.stops.contains(&id) || self.forbidden.contains(&id)
    }

    fn in_circle(&self, location: &Location) -> bool {
        match &self.circle {
            Some((ends, radius)) => geometry::near_either(location, &ends.start, &ends.end, *radius),
            None => true,
        }
    }

    fn select(&self, interval: usize, anchors: Anchors, locations: &[Arc<Location>]) -> Result<Self> {
        let ends = Terminals::resolve(
            Anchors::new(self.stops[interval], self.stops[interval + 1]),
            locations,
        )?;
        let radius = geometry::euclidean(&ends.start, &ends.end);
        Ok(Self {
            interval,
            anchors,
            terminals: Some(Terminals::resolve(anchors, locations)?),
            circle: Some((ends, radius)),
            ..self.clone()
        })
    }
}

/// Splits the route budget over the intervals between consecutive stops.
fn interval_limits(
    stops: &[LocationId],
    route_limit: u32,
    locations: &[Arc<Location>],
) -> Result<Vec<u32>> {
    let mut minimums = Vec::with_capacity(stops.len().saturating_sub(1));
    let mut near_counts = Vec::with_capacity(minimums.capacity());

    for (i, pair) in stops.windows(2).enumerate() {
        let start = lookup(locations, pair[0])?;
        let end = lookup(locations, pair[1])?;
        let radius = geometry::euclidean(&start, &end);

        let near = locations
            .iter()
            .filter(|l| !stops.contains(&l.id))
            .filter(|l| geometry::near_either(l, &start, &end, radius))
            .count();
        near_counts.push(near);

        let mut minimum = geometry::walking_time(&start, &end) + end.duration;
        if i == 0 {
            minimum += start.duration;
        }
        minimums.push(minimum);
    }

    let mut reserve = i64::from(route_limit) - minimums.iter().map(|&m| i64::from(m)).sum::<i64>();
    if reserve < 0 {
        warn!(
            "compulsory stops need {} more minutes than the {} minute budget",
            -reserve, route_limit
        );
        reserve = 0;
    }
    let total_near: usize = near_counts.iter().sum();
    let intervals = minimums.len();

    Ok(minimums
        .iter()
        .zip(&near_counts)
        .map(|(&minimum, &near)| {
            let share = if total_near == 0 {
                reserve as f64 / intervals as f64
            } else {
                reserve as f64 * near as f64 / total_near as f64
            };
            minimum + share as u32
        })
        .collect())
}

/// Cuts an ordered list of compulsory stops into days.
///
/// Stops are taken in order; a day closes when adding the next stop would
/// push the day's path time (durations plus walking) over `day_limit`, and
/// that stop opens the following day. A single stop that exceeds the limit
/// on its own still forms a day.
pub fn split_into_days(
    stops: &[LocationId],
    locations: &[Arc<Location>],
    day_limit: u32,
) -> Result<Vec<Vec<LocationId>>> {
    let mut days = Vec::new();
    let mut current: Vec<Arc<Location>> = Vec::new();

    for &id in stops {
        current.push(lookup(locations, id)?);
        let path: Vec<&Location> = current.iter().map(|l| l.as_ref()).collect();
        if current.len() > 1 && path_time(&path) > day_limit {
            if let Some(next) = current.pop() {
                days.push(current.iter().map(|l| l.id).collect());
                current = vec![next];
            }
        }
    }
    if !current.is_empty() {
        days.push(current.iter().map(|l| l.id).collect());
    }
    Ok(days)
}

impl FeasibilityChecker for CompulsoryStopsChecker {
    fn initialize(&self, locations: &[Arc<Location>]) -> Result<Self> {
        let prepared = Self {
            interval_limits: interval_limits(&self.stops, self.route_limit, locations)?,
            ..self.clone()
        };
        prepared.select(0, Anchors::new(self.stops[0], self.stops[1]), locations)
    }

    fn anchors(&self) -> Anchors {
        self.anchors
    }

    fn boundary(&self, route: &Route) -> bool {
        let interior_allowed = route
            .interior(self.anchors.start, self.anchors.end)
            .all(|l| !self.is_excluded(l.id));
        interior_allowed && self.route_time(route) <= self.current_limit()
    }

    fn reduce_candidates<'a>(
        &self,
        route: &Route,
        candidates: &'a CandidateSet,
    ) -> Cow<'a, CandidateSet> {
        let limit = self.current_limit();
        Cow::Owned(
            candidates
                .iter()
                .filter(|&(&id, loc)| {
                    !route.contains(id)
                        && !self.is_excluded(id)
                        && self.path_time_with(route, Some(loc.as_ref())) <= limit
                })
                .map(|(&id, loc)| (id, Arc::clone(loc)))
                .collect(),
        )
    }

    fn single_point_admissible(&self, location: &Location) -> bool {
        !self.is_excluded(location.id)
            && self.in_circle(location)
            && self.path_time_with(&Route::new(), Some(location)) <= self.current_limit()
    }

    fn reconfigure(&self, anchors: Anchors, locations: &[Arc<Location>]) -> Result<Self> {
        let matching = self
            .stops
            .windows(2)
            .position(|pair| pair[0] == anchors.start && pair[1] == anchors.end);
        match matching {
            Some(interval) => self.select(interval, anchors, locations),
            None => Ok(Self {
                anchors,
                terminals: Some(Terminals::resolve(anchors, locations)?),
                ..self.clone()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compulsory stops 0, 1, 2 along the x axis, 1400 m apart, with one
    /// optional location near each interval and one far away.
    fn city() -> Vec<Arc<Location>> {
        vec![
            Arc::new(Location::new(0, 0.0, 0.0).with_duration(10)),
            Arc::new(Location::new(1, 1400.0, 0.0).with_duration(10)),
            Arc::new(Location::new(2, 2800.0, 0.0).with_duration(10)),
            Arc::new(Location::new(3, 700.0, 300.0).with_duration(5)),
            Arc::new(Location::new(4, 2100.0, 300.0).with_duration(5)),
            Arc::new(Location::new(5, 1400.0, 5000.0).with_duration(5)),
        ]
    }

    #[test]
    fn test_needs_two_stops() {
        assert!(matches!(
            CompulsoryStopsChecker::new(vec![3], 100),
            Err(Error::InvalidRoute(_))
        ));
    }

    #[test]
    fn test_interval_limits_share_reserve() {
        let locs = city();
        // minimums: 20 + 10 + 10 = 40 and 20 + 10 = 30; reserve 30
        // near counts: interval 0 sees 3 and 4, interval 1 sees 3 and 4
        let limits = interval_limits(&[0, 1, 2], 100, &locs).unwrap();
        assert_eq!(limits, vec![55, 45]);
    }

    #[test]
    fn test_negative_reserve_adds_nothing() {
        let locs = city();
        let limits = interval_limits(&[0, 1, 2], 50, &locs).unwrap();
        assert_eq!(limits, vec![40, 30]);
    }

    #[test]
    fn test_start_duration_only_in_first_interval() {
        let locs = city();
        let checker = CompulsoryStopsChecker::new(vec![0, 1, 2], 100)
            .unwrap()
            .initialize(&locs)
            .unwrap();
        assert_eq!(checker.route_time(&Route::new()), 40);

        let second = checker.reconfigure(Anchors::new(1, 2), &locs).unwrap();
        assert_eq!(second.interval(), 1);
        assert_eq!(second.current_limit(), 45);
        assert_eq!(second.route_time(&Route::new()), 30);
    }

    #[test]
    fn test_single_point_rules() {
        let locs = city();
        let checker = CompulsoryStopsChecker::new(vec![0, 1, 2], 200)
            .unwrap()
            .with_forbidden([4])
            .initialize(&locs)
            .unwrap();
        assert!(checker.single_point_admissible(&locs[3]));
        assert!(!checker.single_point_admissible(&locs[4]));
        assert!(!checker.single_point_admissible(&locs[5]));
        assert!(!checker.single_point_admissible(&locs[2]));
    }

    #[test]
    fn test_boundary_rejects_compulsory_interior() {
        let locs = city();
        let checker = CompulsoryStopsChecker::new(vec![0, 1, 2], 500)
            .unwrap()
            .initialize(&locs)
            .unwrap();
        let route = Route::from_stops([Arc::clone(&locs[0]), Arc::clone(&locs[2]), Arc::clone(&locs[1])]);
        assert!(!checker.boundary(&route));
        let route = Route::from_stops([Arc::clone(&locs[0]), Arc::clone(&locs[3]), Arc::clone(&locs[1])]);
        assert!(checker.boundary(&route));
    }

    #[test]
    fn test_reconfigure_other_pair_keeps_interval() {
        let locs = city();
        let checker = CompulsoryStopsChecker::new(vec![0, 1, 2], 100)
            .unwrap()
            .initialize(&locs)
            .unwrap()
            .reconfigure(Anchors::new(1, 2), &locs)
            .unwrap();
        let moved = checker.reconfigure(Anchors::new(1, 4), &locs).unwrap();
        assert_eq!(moved.interval(), 1);
        assert_eq!(moved.anchors(), Anchors::new(1, 4));
    }

    #[test]
    fn test_split_into_days() {
        let locs = city();
        // 0 → 1: 10 + 20 + 10 = 40; adding 2 gives 70
        let days = split_into_days(&[0, 1, 2], &locs, 60).unwrap();
        assert_eq!(days, vec![vec![0, 1], vec![2]]);
        let days = split_into_days(&[0, 1, 2], &locs, 70).unwrap();
        assert_eq!(days, vec![vec![0, 1, 2]]);
        let days = split_into_days(&[0, 1, 2], &locs, 10).unwrap();
        assert_eq!(days, vec![vec![0], vec![1], vec![2]]);
        assert!(split_into_days(&[], &locs, 10).unwrap().is_empty());
    }
}

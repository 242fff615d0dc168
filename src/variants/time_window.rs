//! Orienteering with time windows.

use std::borrow::Cow;
use std::sync::Arc;

use super::{path_time, BudgetChecker};
use crate::error::Result;
use crate::model::{geometry, CandidateSet, Location, LocationId, Route};
use crate::strategy::{Anchors, FeasibilityChecker};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Converts HHMM clock notation to minutes after midnight.
pub fn hhmm_to_minutes(hhmm: u32) -> u32 {
    hhmm / 100 * 60 + hhmm % 100
}

/// Whether `location` is open on `day` for the whole stay
/// `[arrive, depart]` (minutes after midnight).
///
/// A location without any opening hours is always open. One that lists
/// hours but none for `day` is closed. A window whose close precedes its
/// open runs past midnight.
pub fn is_open(location: &Location, day: &str, arrive: u32, depart: u32) -> bool {
    if location.open_hours.is_empty() {
        return true;
    }
    let Some((open, close)) = location.opening_hours(day) else {
        return false;
    };
    let (open, close) = (hhmm_to_minutes(open), hhmm_to_minutes(close));
    if close >= open {
        open <= arrive && depart <= close
    } else {
        (open <= arrive && depart <= close + MINUTES_PER_DAY) || depart <= close
    }
}

/// Budget checker that also requires every visited stop to be open.
///
/// The clock starts at `start_time` at the start anchor. Each interior stop
/// and the end anchor must be open from arrival until departure; arriving
/// early is infeasible since the route never waits.
#[derive(Debug, Clone)]
pub struct TimeWindowChecker {
    budget: BudgetChecker,
    day: String,
    start_time: u32,
}

impl TimeWindowChecker {
    /// `start_time` is in HHMM notation.
    pub fn new(anchors: Anchors, limit: u32, day: impl Into<String>, start_time: u32) -> Self {
        Self {
            budget: BudgetChecker::new(anchors, limit),
            day: day.into(),
            start_time,
        }
    }

    pub fn with_forbidden(mut self, ids: impl IntoIterator<Item = LocationId>) -> Self {
        self.budget = self.budget.with_forbidden(ids);
        self
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn start_time(&self) -> u32 {
        self.start_time
    }

    /// Underlying budget rules.
    pub fn budget(&self) -> &BudgetChecker {
        &self.budget
    }

    fn schedule_fits(&self, path: &[&Location]) -> bool {
        let mut clock = hhmm_to_minutes(self.start_time);
        for (i, loc) in path.iter().enumerate() {
            if i > 0 {
                clock = clock.saturating_add(geometry::walking_time(path[i - 1], loc));
                if !is_open(loc, &self.day, clock, clock.saturating_add(loc.duration)) {
                    return false;
                }
            }
            clock = clock.saturating_add(loc.duration);
        }
        true
    }

    fn admits_path(&self, path: &[&Location]) -> bool {
        self.budget.fits(path_time(path)) && self.schedule_fits(path)
    }
}

impl FeasibilityChecker for TimeWindowChecker {
    fn initialize(&self, locations: &[Arc<Location>]) -> Result<Self> {
        Ok(Self {
            budget: self.budget.initialize(locations)?,
            ..self.clone()
        })
    }

    fn anchors(&self) -> Anchors {
        self.budget.anchors()
    }

    fn boundary(&self, route: &Route) -> bool {
        self.admits_path(&self.budget.travelled(route, None))
    }

    fn reduce_candidates<'a>(
        &self,
        route: &Route,
        candidates: &'a CandidateSet,
    ) -> Cow<'a, CandidateSet> {
        let reduced = self.budget.reduce_candidates(route, candidates);
        Cow::Owned(
            reduced
                .iter()
                .filter(|&(_, loc)| {
                    self.schedule_fits(&self.budget.travelled(route, Some(loc.as_ref())))
                })
                .map(|(&id, loc)| (id, Arc::clone(loc)))
                .collect(),
        )
    }

    fn single_point_admissible(&self, location: &Location) -> bool {
        !self.budget.is_excluded(location.id)
            && self.admits_path(&self.budget.travelled(&Route::new(), Some(location)))
    }

    fn reconfigure(&self, anchors: Anchors, locations: &[Arc<Location>]) -> Result<Self> {
        Ok(Self {
            budget: self.budget.reconfigure(anchors, locations)?,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hhmm_to_minutes() {
        assert_eq!(hhmm_to_minutes(0), 0);
        assert_eq!(hhmm_to_minutes(1030), 630);
        assert_eq!(hhmm_to_minutes(2359), 1439);
    }

    #[test]
    fn test_is_open_regular_window() {
        let museum = Location::new(0, 0.0, 0.0).with_opening_hours("1", 1000, 1200);
        assert!(is_open(&museum, "1", 600, 720));
        assert!(!is_open(&museum, "1", 599, 630));
        assert!(!is_open(&museum, "1", 700, 721));
        assert!(!is_open(&museum, "2", 600, 630));
    }

    #[test]
    fn test_is_open_without_hours() {
        let square = Location::new(0, 0.0, 0.0);
        assert!(is_open(&square, "6", 0, 2000));
    }

    #[test]
    fn test_is_open_overnight() {
        let bar = Location::new(0, 0.0, 0.0).with_opening_hours("5", 2200, 200);
        assert!(is_open(&bar, "5", 1380, 1410));
        assert!(is_open(&bar, "5", 60, 90));
        assert!(!is_open(&bar, "5", 180, 210));
    }

    fn city() -> Vec<Arc<Location>> {
        vec![
            Arc::new(Location::new(0, 0.0, 0.0)),
            Arc::new(
                Location::new(1, 700.0, 0.0)
                    .with_duration(30)
                    .with_opening_hours("1", 1000, 1200),
            ),
            Arc::new(Location::new(2, 1400.0, 0.0)),
        ]
    }

    #[test]
    fn test_no_waiting_for_opening() {
        let locs = city();
        let route = Route::from_stops([Arc::clone(&locs[1])]);

        // arrives 09:10, museum opens 10:00
        let early = TimeWindowChecker::new(Anchors::new(0, 2), 120, "1", 900)
            .initialize(&locs)
            .unwrap();
        assert!(!early.boundary(&route));
        assert!(!early.single_point_admissible(&locs[1]));

        // arrives 10:00, leaves 10:30
        let on_time = TimeWindowChecker::new(Anchors::new(0, 2), 120, "1", 950)
            .initialize(&locs)
            .unwrap();
        assert!(on_time.boundary(&route));
        assert!(on_time.single_point_admissible(&locs[1]));
    }

    #[test]
    fn test_closed_day() {
        let locs = city();
        let checker = TimeWindowChecker::new(Anchors::new(0, 2), 120, "2", 950)
            .initialize(&locs)
            .unwrap();
        assert!(!checker.single_point_admissible(&locs[1]));
        assert!(checker.boundary(&Route::new()));
    }

    #[test]
    fn test_reduce_drops_closed_candidates() {
        let locs = city();
        let checker = TimeWindowChecker::new(Anchors::new(0, 2), 120, "1", 900)
            .initialize(&locs)
            .unwrap();
        let candidates: CandidateSet = [(1, Arc::clone(&locs[1]))].into_iter().collect();
        assert!(checker.reduce_candidates(&Route::new(), &candidates).is_empty());
    }

    #[test]
    fn test_end_anchor_must_be_open() {
        let mut locs = city();
        locs[2] = Arc::new(Location::new(2, 1400.0, 0.0).with_opening_hours("1", 1800, 2000));
        let checker = TimeWindowChecker::new(Anchors::new(0, 2), 120, "1", 950)
            .initialize(&locs)
            .unwrap();
        assert!(!checker.boundary(&Route::new()));
    }

    #[test]
    fn test_clock_saturates_on_huge_durations() {
        let locs = vec![
            Arc::new(Location::new(0, 0.0, 0.0).with_duration(u32::MAX - 10)),
            Arc::new(Location::new(1, 1e12, 0.0).with_opening_hours("1", 1000, 1200)),
        ];
        let checker = TimeWindowChecker::new(Anchors::new(0, 1), u32::MAX, "1", 900)
            .initialize(&locs)
            .unwrap();
        assert!(!checker.boundary(&Route::new()));
    }
}

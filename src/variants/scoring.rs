//! Scorers.

use std::sync::Arc;

use super::Terminals;
use crate::error::Result;
use crate::model::{CandidateSet, Location, Route};
use crate::strategy::{Anchors, Scorer};

/// Values a stop by its instagram visitor count.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopularityScorer;

impl Scorer for PopularityScorer {
    fn single_insertion_value(&self, _route: &Route, location: &Location) -> f64 {
        location.popularity.instagram_visitors
    }
}

/// Multi-attribute popularity profile plus a detour coefficient.
///
/// ```text
/// value = official_guide
///       + foursquare_rating / 10
///       + (tripadvisor_rating / 5) · (reviews / max_reviews)
///       + visitors / max_visitors
///       + detour
/// detour = d(prev, next) / (d(prev, p) + d(p, next))
/// ```
///
/// The maxima are taken over the candidates passed to
/// [`refresh`](Scorer::refresh) (over every location after `initialize`).
/// `prev`/`next` are the route neighbours of `p`; a stop not yet on the
/// route is treated as appended after the last interior stop.
#[derive(Debug, Clone)]
pub struct ProfileScorer {
    anchors: Anchors,
    terminals: Option<Terminals>,
    max_reviews: f64,
    max_visitors: f64,
}

impl ProfileScorer {
    pub fn new(anchors: Anchors) -> Self {
        Self {
            anchors,
            terminals: None,
            max_reviews: 1.0,
            max_visitors: 1.0,
        }
    }

    /// Value of the popularity attributes alone.
    pub fn profile_value(&self, location: &Location) -> f64 {
        let p = &location.popularity;
        p.official_guide
            + p.foursquare_rating / 10.0
            + (p.tripadvisor_rating / 5.0) * (p.tripadvisor_reviews / self.max_reviews)
            + p.instagram_visitors / self.max_visitors
    }

    /// Detour coefficient of visiting `location` on `route`, in (0, 1].
    pub fn detour(&self, route: &Route, location: &Location) -> f64 {
        let Some((prev, next)) = self.neighbours(route, location) else {
            return 1.0;
        };
        let through = prev.distance_to(location) + location.distance_to(&next);
        if through == 0.0 {
            1.0
        } else {
            prev.distance_to(&next) / through
        }
    }

    fn neighbours(&self, route: &Route, location: &Location) -> Option<(Arc<Location>, Arc<Location>)> {
        let terminals = self.terminals.as_ref();
        match route.position(location.id) {
            Some(pos) => {
                let prev = match pos.checked_sub(1) {
                    Some(i) => route.get(route.order()[i]).cloned(),
                    None => terminals.map(|t| Arc::clone(&t.start)),
                }?;
                let next = match route.order().get(pos + 1) {
                    Some(&id) => route.get(id).cloned(),
                    None => terminals.map(|t| Arc::clone(&t.end)),
                }?;
                Some((prev, next))
            }
            None => {
                let terminals = terminals?;
                let prev = route
                    .interior(self.anchors.start, self.anchors.end)
                    .last()
                    .cloned()
                    .unwrap_or_else(|| Arc::clone(&terminals.start));
                Some((prev, Arc::clone(&terminals.end)))
            }
        }
    }

    fn with_maxima<'a>(&self, locations: impl Iterator<Item = &'a Location>) -> Self {
        let (reviews, visitors) = locations.fold((0.0f64, 0.0f64), |(r, v), l| {
            (
                r.max(l.popularity.tripadvisor_reviews),
                v.max(l.popularity.instagram_visitors),
            )
        });
        Self {
            max_reviews: if reviews > 0.0 { reviews } else { 1.0 },
            max_visitors: if visitors > 0.0 { visitors } else { 1.0 },
            ..self.clone()
        }
    }
}

impl Scorer for ProfileScorer {
    fn initialize(&self, locations: &[Arc<Location>]) -> Result<Self> {
        let scorer = self.with_maxima(locations.iter().map(|l| l.as_ref()));
        Ok(Self {
            terminals: Some(Terminals::resolve(self.anchors, locations)?),
            ..scorer
        })
    }

    fn single_insertion_value(&self, route: &Route, location: &Location) -> f64 {
        self.profile_value(location) + self.detour(route, location)
    }

    fn refresh(&self, _route: &Route, candidates: &CandidateSet) -> Self {
        self.with_maxima(candidates.values().map(|l| l.as_ref()))
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
    use crate::model::Popularity;

    #[test]
    fn test_popularity_value() {
        let loc = Location::new(0, 0.0, 0.0).with_visitors(420.0);
        assert_eq!(PopularityScorer.single_insertion_value(&Route::new(), &loc), 420.0);
        let route = Route::from_stops([Arc::new(loc.clone()), Arc::new(Location::new(1, 0.0, 0.0).with_visitors(8.0))]);
        assert_eq!(PopularityScorer.route_value(&route), 428.0);
    }

    fn profiled(id: usize, x: f64, y: f64) -> Location {
        Location::new(id, x, y).with_popularity(Popularity {
            instagram_visitors: 30.0,
            tripadvisor_rating: 4.0,
            tripadvisor_reviews: 50.0,
            foursquare_rating: 8.0,
            foursquare_rating_votes: 12.0,
            official_guide: 1.0,
        })
    }

    fn city() -> Vec<Arc<Location>> {
        let mut busiest = profiled(3, 0.0, 100.0);
        busiest.popularity.instagram_visitors = 60.0;
        busiest.popularity.tripadvisor_reviews = 100.0;
        vec![
            Arc::new(Location::new(0, 0.0, 0.0)),
            Arc::new(profiled(1, 50.0, 0.0)),
            Arc::new(Location::new(2, 100.0, 0.0)),
            Arc::new(busiest),
        ]
    }

    #[test]
    fn test_profile_value_normalizes_by_maxima() {
        let locs = city();
        let scorer = ProfileScorer::new(Anchors::new(0, 2)).initialize(&locs).unwrap();
        // 1 + 0.8 + 0.8 * 0.5 + 0.5
        assert!((scorer.profile_value(&locs[1]) - 2.7).abs() < 1e-12);
    }

    #[test]
    fn test_detour_on_straight_line_is_one() {
        let locs = city();
        let scorer = ProfileScorer::new(Anchors::new(0, 2)).initialize(&locs).unwrap();
        assert!((scorer.detour(&Route::new(), &locs[1]) - 1.0).abs() < 1e-12);
        assert!((scorer.single_insertion_value(&Route::new(), &locs[1]) - 3.7).abs() < 1e-12);
    }

    #[test]
    fn test_detour_penalizes_side_trip() {
        let locs = city();
        let scorer = ProfileScorer::new(Anchors::new(0, 2)).initialize(&locs).unwrap();
        // 0 → 3 → 2: 100 / (100 + 141.42...)
        let expected = 100.0 / (100.0 + 20_000f64.sqrt());
        assert!((scorer.detour(&Route::new(), &locs[3]) - expected).abs() < 1e-12);

        let route = Route::from_stops(locs.iter().take(3).cloned());
        assert!((scorer.detour(&route, &locs[1]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_refresh_uses_candidate_maxima() {
        let locs = city();
        let scorer = ProfileScorer::new(Anchors::new(0, 2)).initialize(&locs).unwrap();
        let candidates: CandidateSet = [(1, Arc::clone(&locs[1]))].into_iter().collect();
        let refreshed = scorer.refresh(&Route::new(), &candidates);
        // maxima now 50 reviews and 30 visitors
        assert!((refreshed.profile_value(&locs[1]) - 3.6).abs() < 1e-12);

        let empty = scorer.refresh(&Route::new(), &CandidateSet::new());
        assert!(empty.profile_value(&locs[1]).is_finite());
    }
}

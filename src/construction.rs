//! Route-construction contract shared by the engines.
//!
//! A [`Segment`] bundles everything one construction call reads: the full
//! location set, the admissible candidates, and the checker and scorer for
//! the segment. Engines implement [`RouteConstruction`]; [`Algorithm`]
//! selects one from configuration.

use std::sync::Arc;

use crate::colony::{ColonyConfig, ColonySearch};
use crate::config::{AlgorithmKind, SolverConfig};
use crate::error::{Error, Result};
use crate::greedy::GreedyInsertion;
use crate::model::{lookup, CandidateSet, Location, LocationId, Route};
use crate::strategy::{Anchors, FeasibilityChecker, Scorer};

/// Read-only inputs of one route-construction call.
#[derive(Debug)]
pub struct Segment<'a, C, S> {
    pub locations: &'a [Arc<Location>],
    pub candidates: &'a CandidateSet,
    pub checker: &'a C,
    pub scorer: &'a S,
}

// Manual impls: every field is a reference, so no bounds on C or S.
impl<C, S> Clone for Segment<'_, C, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, S> Copy for Segment<'_, C, S> {}

impl<'a, C: FeasibilityChecker, S: Scorer> Segment<'a, C, S> {
    pub fn new(
        locations: &'a [Arc<Location>],
        candidates: &'a CandidateSet,
        checker: &'a C,
        scorer: &'a S,
    ) -> Self {
        Self {
            locations,
            candidates,
            checker,
            scorer,
        }
    }

    /// Anchors of the segment, as configured on the checker.
    pub fn anchors(&self) -> Anchors {
        self.checker.anchors()
    }

    /// The two-stop route `start → end`.
    pub fn anchor_route(&self) -> Result<Route> {
        let anchors = self.anchors();
        if anchors.start == anchors.end {
            return Err(Error::invalid_route(format!(
                "start and end anchors are both {}",
                anchors.start
            )));
        }
        Ok(Route::anchored(
            lookup(self.locations, anchors.start)?,
            lookup(self.locations, anchors.end)?,
        ))
    }
}

/// A constructed route and its total value.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub route: Route,
    pub score: f64,
}

impl RouteResult {
    /// Visiting order as ids.
    pub fn order(&self) -> &[LocationId] {
        self.route.order()
    }
}

/// An engine that builds one route per segment.
pub trait RouteConstruction {
    /// Builds the best route the engine finds for `segment`.
    ///
    /// Running out of feasible extensions is not an error; the route built
    /// so far is returned.
    fn build_route<C: FeasibilityChecker, S: Scorer>(
        &mut self,
        segment: &Segment<'_, C, S>,
    ) -> Result<RouteResult>;
}

/// The engine selected by configuration.
#[derive(Debug, Clone)]
pub enum Algorithm {
    Colony(ColonySearch),
    Greedy(GreedyInsertion),
}

impl Algorithm {
    /// Builds the engine named by `Algorithm` (colony by default).
    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        match config.algorithm {
            AlgorithmKind::Colony => Ok(Self::Colony(ColonySearch::new(ColonyConfig::try_from(
                config,
            )?))),
            AlgorithmKind::Greedy => Ok(Self::Greedy(GreedyInsertion::new())),
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Self::Colony(_) => AlgorithmKind::Colony,
            Self::Greedy(_) => AlgorithmKind::Greedy,
        }
    }

    pub fn as_colony_mut(&mut self) -> Option<&mut ColonySearch> {
        match self {
            Self::Colony(colony) => Some(colony),
            Self::Greedy(_) => None,
        }
    }

    pub fn as_greedy_mut(&mut self) -> Option<&mut GreedyInsertion> {
        match self {
            Self::Greedy(greedy) => Some(greedy),
            Self::Colony(_) => None,
        }
    }
}

impl RouteConstruction for Algorithm {
    fn build_route<C: FeasibilityChecker, S: Scorer>(
        &mut self,
        segment: &Segment<'_, C, S>,
    ) -> Result<RouteResult> {
        match self {
            Self::Colony(colony) => colony.build_route(segment),
            Self::Greedy(greedy) => greedy.build_route(segment),
        }
    }
}

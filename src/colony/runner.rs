//! Colony search loop.
//!
//! [`ColonySearch`] runs the cycle loop:
//! seed agents → explore in parallel → aggregate → evaporate and reinforce
//! → repeat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use super::ant::{self, AgentOutcome};
use super::config::ColonyConfig;
use super::trail::TrailTable;
use crate::construction::{RouteConstruction, RouteResult, Segment};
use crate::error::{Error, Result};
use crate::model::Route;
use crate::strategy::{FeasibilityChecker, Scorer};

/// Result of a colony search.
#[derive(Debug, Clone)]
pub struct ColonyResult {
    /// The best anchored route found during the entire run.
    pub best: Route,

    /// Score of `best`.
    pub best_score: f64,

    /// Number of cycles executed.
    pub cycles: usize,

    /// Agents per cycle.
    pub population: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best score at the end of each cycle.
    pub score_history: Vec<f64>,
}

impl From<ColonyResult> for RouteResult {
    fn from(result: ColonyResult) -> Self {
        RouteResult {
            route: result.best,
            score: result.best_score,
        }
    }
}

/// Parallel stochastic route construction.
///
/// # Usage
///
/// ```ignore
/// let mut colony = ColonySearch::new(ColonyConfig::default().with_seed(42));
/// let result = colony.search(&segment)?;
/// println!("best score: {}", result.best_score);
/// ```
#[derive(Debug, Clone)]
pub struct ColonySearch {
    config: ColonyConfig,
    trail: TrailTable,
    cancel: Option<Arc<AtomicBool>>,
}

impl ColonySearch {
    pub fn new(config: ColonyConfig) -> Self {
        let trail = TrailTable::new(config.fadeness);
        Self {
            config,
            trail,
            cancel: None,
        }
    }

    /// Attaches a cancellation flag.
    ///
    /// When the flag is set, the search stops at the next cycle boundary and
    /// returns the best route found so far.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ColonyConfig {
        &mut self.config
    }

    /// Trail table as left by the last search.
    pub fn trail(&self) -> &TrailTable {
        &self.trail
    }

    /// Runs one full search over `segment`.
    ///
    /// Fails if the configuration is invalid, the anchors are unknown, the
    /// anchor-only route already violates the boundary, or the worker pool
    /// cannot be built.
    pub fn search<C, S>(&mut self, segment: &Segment<'_, C, S>) -> Result<ColonyResult>
    where
        C: FeasibilityChecker,
        S: Scorer,
    {
        self.config.validate().map_err(Error::Config)?;
        self.trail = TrailTable::new(self.config.fadeness);

        let anchor_route = segment.anchor_route()?;
        if !segment.checker.boundary(&anchor_route) {
            return Err(Error::InfeasibleSeed(anchor_route.order().to_vec()));
        }

        let population = self.config.population_size(segment.candidates.len());
        let channels = self.config.channels;
        let chunk_size = population.div_ceil(channels).max(1);
        let pool = if self.config.parallel {
            Some(ThreadPoolBuilder::new().num_threads(channels).build()?)
        } else {
            None
        };
        let mut master = StdRng::seed_from_u64(self.config.seed.unwrap_or_else(rand::random));

        let mut best = RouteResult {
            score: segment.scorer.route_value(&anchor_route),
            route: anchor_route.clone(),
        };
        let mut score_history = Vec::with_capacity(self.config.iterations);
        let mut cancelled = false;
        let started = Instant::now();

        info!(
            "colony search: {} candidates, {} agents x {} cycles on {} channels",
            segment.candidates.len(),
            population,
            self.config.iterations,
            channels
        );

        for cycle in 0..self.config.iterations {
            if let Some(ref flag) = self.cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = self.config.time_limit_ms {
                if started.elapsed().as_millis() >= u128::from(limit) {
                    debug!("time limit reached after {cycle} cycles");
                    break;
                }
            }

            let seeds: Vec<u64> = (0..population).map(|_| master.random()).collect();

            let trail = &self.trail;
            let config = &self.config;
            let run_chunk = |chunk: &[u64]| -> Vec<AgentOutcome> {
                chunk
                    .iter()
                    .map(|&seed| {
                        let mut rng = StdRng::seed_from_u64(seed);
                        ant::construct(segment, &anchor_route, trail, config, population, &mut rng)
                    })
                    .collect()
            };
            let outcomes: Vec<AgentOutcome> = match &pool {
                Some(pool) => pool.install(|| {
                    seeds
                        .par_chunks(chunk_size)
                        .map(run_chunk)
                        .collect::<Vec<_>>()
                        .into_iter()
                        .flatten()
                        .collect()
                }),
                None => seeds.chunks(chunk_size).flat_map(run_chunk).collect(),
            };

            let mut deposits = Vec::new();
            for outcome in outcomes {
                if outcome.score >= best.score {
                    best = RouteResult {
                        route: outcome.route,
                        score: outcome.score,
                    };
                }
                deposits.extend(outcome.deposits);
            }
            self.trail.advance(deposits);
            score_history.push(best.score);

            debug!(
                "cycle {}: best score {:.4}, {} trail entries",
                cycle + 1,
                best.score,
                self.trail.len()
            );
        }

        info!(
            "colony search finished: {} cycles, best score {:.4}, {} stops{}",
            score_history.len(),
            best.score,
            best.route.len(),
            if cancelled { " (cancelled)" } else { "" }
        );

        Ok(ColonyResult {
            cycles: score_history.len(),
            best: best.route,
            best_score: best.score,
            population,
            cancelled,
            score_history,
        })
    }
}

impl RouteConstruction for ColonySearch {
    fn build_route<C: FeasibilityChecker, S: Scorer>(
        &mut self,
        segment: &Segment<'_, C, S>,
    ) -> Result<RouteResult> {
        self.search(segment).map(RouteResult::from)
    }
}

// ============================================================================
// Tests
// ============================================================================

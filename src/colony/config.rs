//! Colony search configuration.
//!
//! [`ColonyConfig`] holds the parameters of one colony search: trail
//! dynamics, population, parallelism and termination.

use crate::config::{InfeasiblePolicy, SolverConfig};
use crate::error::{Error, Result};

/// Largest accepted agents-per-candidate ratio.
pub const MAX_ANTS_RATIO: f64 = 1_000.0;

/// Configuration for the colony search.
///
/// # Defaults
///
/// ```
/// use u_orienteering::colony::ColonyConfig;
///
/// let config = ColonyConfig::default();
/// assert_eq!(config.iterations, 50);
/// assert_eq!(config.channels, 4);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_orienteering::colony::ColonyConfig;
///
/// let config = ColonyConfig::default()
///     .with_fadeness(0.6)
///     .with_iterations(200)
///     .with_ants_ratio(0.5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ColonyConfig {
    /// Trail evaporation factor applied every cycle, in (0, 1).
    ///
    /// Lower values forget earlier cycles faster.
    pub fadeness: f64,

    /// Exponent on the trail term of desirability.
    pub pheromone_control: f64,

    /// Exponent on the marginal score term of desirability.
    ///
    /// Higher values make agents greedier.
    pub attractiveness_control: f64,

    /// Number of cycles.
    pub iterations: usize,

    /// Agents per cycle as a ratio of the candidate count.
    pub ants_ratio: f64,

    /// Number of concurrent workers.
    pub channels: usize,

    /// Whether agents run on a worker pool.
    ///
    /// Results are identical either way for a fixed seed.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// What an agent does when its drawn candidate breaks the boundary.
    pub on_infeasible: InfeasiblePolicy,

    /// Keeps only the `k` most desirable candidates on each wheel.
    ///
    /// Ties go to the lower id. `None` keeps every candidate.
    pub candidate_limit: Option<usize>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each cycle, so a run may exceed it by up to
    /// one cycle.
    pub time_limit_ms: Option<u64>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            fadeness: 0.7,
            pheromone_control: 1.0,
            attractiveness_control: 2.0,
            iterations: 50,
            ants_ratio: 1.0,
            channels: 4,
            parallel: true,
            seed: None,
            on_infeasible: InfeasiblePolicy::Terminate,
            candidate_limit: None,
            time_limit_ms: None,
        }
    }
}

impl ColonyConfig {
    /// Sets the evaporation factor.
    pub fn with_fadeness(mut self, fadeness: f64) -> Self {
        self.fadeness = fadeness;
        self
    }

    /// Sets the trail exponent.
    pub fn with_pheromone_control(mut self, exponent: f64) -> Self {
        self.pheromone_control = exponent;
        self
    }

    /// Sets the score exponent.
    pub fn with_attractiveness_control(mut self, exponent: f64) -> Self {
        self.attractiveness_control = exponent;
        self
    }

    /// Sets the number of cycles.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Sets the population ratio.
    pub fn with_ants_ratio(mut self, ratio: f64) -> Self {
        self.ants_ratio = ratio;
        self
    }

    /// Sets the number of workers.
    pub fn with_channels(mut self, n: usize) -> Self {
        self.channels = n;
        self
    }

    /// Enables or disables the worker pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the boundary-failure policy.
    pub fn with_on_infeasible(mut self, policy: InfeasiblePolicy) -> Self {
        self.on_infeasible = policy;
        self
    }

    /// Caps each wheel at the `k` most desirable candidates.
    pub fn with_candidate_limit(mut self, k: usize) -> Self {
        self.candidate_limit = Some(k);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Preset for quick answers: few cycles, half population.
    ///
    /// - Iterations: 20, Ants ratio: 0.5, Time limit: 5s
    pub fn fast() -> Self {
        Self {
            iterations: 20,
            ants_ratio: 0.5,
            time_limit_ms: Some(5_000),
            ..Self::default()
        }
    }

    /// Preset balancing quality and runtime.
    ///
    /// - Iterations: 50, Ants ratio: 1.0, Time limit: 30s
    pub fn balanced() -> Self {
        Self {
            iterations: 50,
            ants_ratio: 1.0,
            time_limit_ms: Some(30_000),
            ..Self::default()
        }
    }

    /// Preset for route quality: many cycles, double population.
    ///
    /// - Iterations: 150, Ants ratio: 2.0, Time limit: 60s
    pub fn quality() -> Self {
        Self {
            iterations: 150,
            ants_ratio: 2.0,
            time_limit_ms: Some(60_000),
            ..Self::default()
        }
    }

    /// Number of agents per cycle for `candidates` candidates.
    pub fn population_size(&self, candidates: usize) -> usize {
        ((candidates as f64 * self.ants_ratio).floor() as usize).max(1)
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.fadeness > 0.0 && self.fadeness < 1.0) {
            return Err(format!("fadeness must be in (0, 1), got {}", self.fadeness));
        }
        if !self.pheromone_control.is_finite() {
            return Err("pheromone_control must be finite".into());
        }
        if !self.attractiveness_control.is_finite() {
            return Err("attractiveness_control must be finite".into());
        }
        if self.iterations == 0 {
            return Err("iterations must be at least 1".into());
        }
        if !(self.ants_ratio > 0.0 && self.ants_ratio <= MAX_ANTS_RATIO) {
            return Err(format!(
                "ants_ratio must be in (0, {MAX_ANTS_RATIO}], got {}",
                self.ants_ratio
            ));
        }
        if self.channels == 0 {
            return Err("channels must be at least 1".into());
        }
        if self.candidate_limit == Some(0) {
            return Err("candidate_limit must be positive or None".into());
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        Ok(())
    }
}

impl TryFrom<&SolverConfig> for ColonyConfig {
    type Error = Error;

    fn try_from(config: &SolverConfig) -> Result<Self> {
        let colony = Self {
            fadeness: config.require_fadeness()?,
            pheromone_control: config.require_pheromone_control()?,
            attractiveness_control: config.require_attractiveness_control()?,
            iterations: config.require_iterations()?,
            ants_ratio: config.require_ants_number()?,
            channels: config.require_number_of_channels()?,
            parallel: config.parallel.unwrap_or(true),
            seed: config.seed,
            on_infeasible: config.on_infeasible,
            candidate_limit: config.candidate_limit,
            time_limit_ms: config.time_limit_ms,
        };
        colony.validate().map_err(Error::Config)?;
        Ok(colony)
    }
}

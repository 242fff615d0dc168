//! Solver configuration.
//!
//! [`SolverConfig`] mirrors the JSON configuration file read at
//! initialization. Keys use PascalCase (`Fadeness`, `Iterations`, ...).
//! Values are optional at the parsing level so that a missing key can be
//! reported by name; [`SolverConfig::validate`] decides which keys the
//! selected algorithm actually requires.
//!
//! # Examples
//!
//! ```
//! use u_orienteering::config::{AlgorithmKind, SolverConfig};
//!
//! let config = SolverConfig::from_json_str(r#"{
//!     "Fadeness": 0.7,
//!     "AttractivenessControl": 2.0,
//!     "PheromoneControl": 1.0,
//!     "Iterations": 40,
//!     "AntsNumber": 0.5,
//!     "NumberOfChannels": 4,
//!     "DataPath": "locations.json"
//! }"#).unwrap();
//! assert_eq!(config.algorithm, AlgorithmKind::Colony);
//! assert!(config.validate().is_ok());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::colony::MAX_ANTS_RATIO;
use crate::error::{Error, Result};

/// Which route-construction engine the solver drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlgorithmKind {
    /// Parallel colony search.
    #[default]
    #[serde(alias = "ACO", alias = "colony")]
    Colony,
    /// Deterministic greedy insertion.
    #[serde(alias = "RGA", alias = "greedy")]
    Greedy,
}

/// What a colony agent does when its drawn candidate breaks the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfeasiblePolicy {
    /// Stop the agent with the route built so far.
    #[default]
    Terminate,
    /// Drop the candidate from the wheel and draw again.
    RetryNext,
}

/// Parsed solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SolverConfig {
    /// Trail evaporation factor, in (0, 1).
    pub fadeness: Option<f64>,
    /// Exponent on the marginal score term of desirability.
    pub attractiveness_control: Option<f64>,
    /// Exponent on the trail term of desirability.
    pub pheromone_control: Option<f64>,
    /// Number of colony cycles.
    pub iterations: Option<usize>,
    /// Agent population as a ratio of the candidate count.
    pub ants_number: Option<f64>,
    /// Number of concurrent workers.
    pub number_of_channels: Option<usize>,
    /// Location data file.
    pub data_path: Option<PathBuf>,
    #[serde(default)]
    pub algorithm: AlgorithmKind,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub on_infeasible: InfeasiblePolicy,
    #[serde(default)]
    pub candidate_limit: Option<usize>,
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
    #[serde(default)]
    pub parallel: Option<bool>,
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`.
    #[serde(default)]
    pub log_level: Option<String>,
}

impl SolverConfig {
    /// Reads and parses a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Colony configuration with every required key set.
    pub fn colony(
        fadeness: f64,
        attractiveness_control: f64,
        pheromone_control: f64,
        iterations: usize,
        ants_number: f64,
        number_of_channels: usize,
    ) -> Self {
        Self {
            fadeness: Some(fadeness),
            attractiveness_control: Some(attractiveness_control),
            pheromone_control: Some(pheromone_control),
            iterations: Some(iterations),
            ants_number: Some(ants_number),
            number_of_channels: Some(number_of_channels),
            ..Self::default()
        }
    }

    /// Greedy configuration; the colony keys are not needed.
    pub fn greedy() -> Self {
        Self {
            algorithm: AlgorithmKind::Greedy,
            ..Self::default()
        }
    }

    /// Sets the location data file.
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Sets the run seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the boundary-failure policy of colony agents.
    pub fn with_on_infeasible(mut self, policy: InfeasiblePolicy) -> Self {
        self.on_infeasible = policy;
        self
    }

    /// Sets the log level name.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Returns `Fadeness` or a missing-key error.
    pub fn require_fadeness(&self) -> Result<f64> {
        self.fadeness.ok_or(Error::MissingKey("Fadeness"))
    }

    /// Returns `AttractivenessControl` or a missing-key error.
    pub fn require_attractiveness_control(&self) -> Result<f64> {
        self.attractiveness_control
            .ok_or(Error::MissingKey("AttractivenessControl"))
    }

    /// Returns `PheromoneControl` or a missing-key error.
    pub fn require_pheromone_control(&self) -> Result<f64> {
        self.pheromone_control
            .ok_or(Error::MissingKey("PheromoneControl"))
    }

    /// Returns `Iterations` or a missing-key error.
    pub fn require_iterations(&self) -> Result<usize> {
        self.iterations.ok_or(Error::MissingKey("Iterations"))
    }

    /// Returns `AntsNumber` or a missing-key error.
    pub fn require_ants_number(&self) -> Result<f64> {
        self.ants_number.ok_or(Error::MissingKey("AntsNumber"))
    }

    /// Returns `NumberOfChannels` or a missing-key error.
    pub fn require_number_of_channels(&self) -> Result<usize> {
        self.number_of_channels
            .ok_or(Error::MissingKey("NumberOfChannels"))
    }

    /// Returns `DataPath` or a missing-key error.
    pub fn require_data_path(&self) -> Result<&Path> {
        self.data_path
            .as_deref()
            .ok_or(Error::MissingKey("DataPath"))
    }

    /// Validates the configuration for the selected algorithm.
    ///
    /// The colony keys are required only when the colony engine is selected.
    /// Values that are present are always range-checked.
    pub fn validate(&self) -> Result<()> {
        if self.algorithm == AlgorithmKind::Colony {
            self.require_fadeness()?;
            self.require_attractiveness_control()?;
            self.require_pheromone_control()?;
            self.require_iterations()?;
            self.require_ants_number()?;
            self.require_number_of_channels()?;
        }

        if let Some(f) = self.fadeness {
            if !(f > 0.0 && f < 1.0) {
                return Err(Error::config(format!("Fadeness must be in (0, 1), got {f}")));
            }
        }
        for (key, value) in [
            ("AttractivenessControl", self.attractiveness_control),
            ("PheromoneControl", self.pheromone_control),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(Error::config(format!("{key} must be finite, got {v}")));
                }
            }
        }
        if self.iterations == Some(0) {
            return Err(Error::config("Iterations must be at least 1"));
        }
        if let Some(a) = self.ants_number {
            if !(a > 0.0 && a <= MAX_ANTS_RATIO) {
                return Err(Error::config(format!(
                    "AntsNumber must be in (0, {MAX_ANTS_RATIO}], got {a}"
                )));
            }
        }
        if self.number_of_channels == Some(0) {
            return Err(Error::config("NumberOfChannels must be at least 1"));
        }
        if self.candidate_limit == Some(0) {
            return Err(Error::config("CandidateLimit must be positive or absent"));
        }
        if self.time_limit_ms == Some(0) {
            return Err(Error::config("TimeLimitMs must be positive or absent"));
        }
        if let Some(level) = &self.log_level {
            level
                .parse::<log::LevelFilter>()
                .map_err(|_| Error::config(format!("unknown LogLevel `{level}`")))?;
        }
        Ok(())
    }
}

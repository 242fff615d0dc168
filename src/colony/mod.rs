//! Colony search.
//!
//! A population of agents builds routes stop by stop, picking the next stop
//! by roulette over `trail^α · value^β`. After each cycle the trail
//! evaporates and every agent reinforces the edges it used in proportion
//! to its route score. Agents run on a rayon pool; each one draws from its
//! own seeded generator, so a fixed seed gives the same routes for any
//! number of workers.
//!
//! # Key Types
//!
//! - [`ColonyConfig`]: trail dynamics, population, parallelism
//! - [`ColonySearch`]: the cycle loop
//! - [`TrailTable`]: learned edge strengths
//!
//! # References
//!
//! - Dorigo & Stützle (2004), "Ant Colony Optimization"
//! - Ke, Archetti & Feng (2008), "Ants can solve the team orienteering problem"

mod ant;
mod config;
mod runner;
mod trail;

pub use config::{ColonyConfig, MAX_ANTS_RATIO};
pub use runner::{ColonyResult, ColonySearch};
pub use trail::{TrailDeposit, TrailTable};

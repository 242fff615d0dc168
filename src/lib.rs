//! Orienteering route construction.
//!
//! Builds a route from a start to an end location that collects as much
//! value as possible from optional stops while the route stays feasible.
//! Two engines are provided:
//!
//! - **Colony search**: parallel stochastic construction. Agents extend
//!   routes by roulette over learned edge strengths and stop values; the
//!   edge strengths evaporate and are reinforced every cycle.
//! - **Greedy insertion**: deterministic construction that inserts the
//!   best-valued stop into the best interval until nothing more fits.
//!
//! Neither engine knows what makes a route feasible or valuable. Those
//! rules come from three strategies: a [`CandidateProvider`](strategy::CandidateProvider)
//! supplies locations, a [`FeasibilityChecker`](strategy::FeasibilityChecker)
//! accepts or rejects routes, and a [`Scorer`](strategy::Scorer) values
//! stops. The [`variants`] module carries ready-made checkers (budget, time
//! windows, time-dependent travel, compulsory stops) and scorers.
//!
//! # Architecture
//!
//! [`Solver`] owns the strategies and the selected engine, and sequences
//! segments through waypoints. Engines see one segment at a time through
//! [`Segment`](construction::Segment).

pub mod colony;
pub mod config;
pub mod construction;
pub mod error;
pub mod greedy;
pub mod logging;
pub mod model;
pub mod solver;
pub mod strategy;
pub mod variants;

#[cfg(test)]
pub(crate) mod testing;

pub use config::SolverConfig;
pub use construction::{Algorithm, RouteConstruction, RouteResult, Segment};
pub use error::{Error, Result};
pub use solver::Solver;

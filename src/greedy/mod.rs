//! Greedy insertion.
//!
//! Deterministic construction: starting from a seed route (the anchors by
//! default), repeatedly insert the single candidate with the highest
//! positive marginal value into the interval where it was evaluated, as
//! long as the full route stays feasible.

mod runner;

pub use runner::{GreedyInsertion, GreedyResult};

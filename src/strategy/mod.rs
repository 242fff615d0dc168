//! Strategy contracts between the engines and a concrete routing problem.
//!
//! # Core Traits
//!
//! - [`CandidateProvider`]: the location source
//! - [`FeasibilityChecker`]: route admissibility for one segment
//! - [`Scorer`]: marginal and total route value
//!
//! [`LocationCatalog`] is the provider backed by the `DataPath` JSON file.

mod catalog;
mod types;

pub use catalog::LocationCatalog;
pub use types::{Anchors, CandidateProvider, FeasibilityChecker, Scorer};

//! Error type shared by the whole crate.
//!
//! Only genuine failures are errors. An agent or the greedy engine running
//! out of feasible extensions is a normal outcome and yields a (possibly
//! short) route instead.

use std::path::PathBuf;

use thiserror::Error as ThisError;

use crate::model::LocationId;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("missing required configuration key `{0}`")]
    MissingKey(&'static str),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("unknown location id {0}")]
    UnknownLocation(LocationId),
    #[error("initial route {0:?} violates the feasibility boundary")]
    InfeasibleSeed(Vec<LocationId>),
    #[error("invalid route: {0}")]
    InvalidRoute(String),
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("logger init failed: {0}")]
    Logger(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_route(message: impl Into<String>) -> Self {
        Self::InvalidRoute(message.into())
    }
}

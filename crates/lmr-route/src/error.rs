use thiserror::Error;

use lmr_core::{CoreError, RouteId, StopId};
use lmr_matrix::MatrixError;

use crate::SequenceKind;

/// Errors produced by `lmr-route`.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("stop {stop}: time window starts at {start} but ends at {end}")]
    InvalidTimeWindow { stop: StopId, start: i64, end: i64 },

    #[error("route {route}: stop {stop} appears more than once")]
    DuplicateStop { route: RouteId, stop: StopId },

    #[error("route {route}: actual sequence does not match the planned stops: {reason}")]
    SequenceMismatch { route: RouteId, reason: String },

    #[error("route {0}: actual sequence has not been set")]
    ActualSequenceUnset(RouteId),

    #[error("route {route}: {sequence} sequence has zero euclidean length, circuity is undefined")]
    DegenerateRoute { route: RouteId, sequence: SequenceKind },

    #[error("route {0} has no stops")]
    EmptyRoute(RouteId),

    #[error("analysis {0:?} has no routes")]
    EmptyAnalysis(String),

    #[error("analysis {0:?} contains no packages")]
    NoPackages(String),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("route data parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RouteResult<T> = Result<T, RouteError>;

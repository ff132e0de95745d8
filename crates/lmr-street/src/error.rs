//! Street-subsystem error type.

use thiserror::Error;

use lmr_core::NodeId;
use lmr_matrix::MatrixError;

/// Errors produced by `lmr-street`.
#[derive(Debug, Error)]
pub enum StreetError {
    #[error("node {node} has no {key:?} attribute; every node must belong to a group")]
    UngroupedGraph { node: NodeId, key: String },

    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("street network has no nodes")]
    EmptyNetwork,

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

pub type StreetResult<T> = Result<T, StreetError>;

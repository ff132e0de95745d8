//! Core error type.
//!
//! Sub-crates define their own error enums; this one covers the primitives
//! and config loading that live in `lmr-core`.

use thiserror::Error;

/// The error type for `lmr-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lon}): latitude and longitude must be finite")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `lmr-core`.
pub type CoreResult<T> = Result<T, CoreError>;

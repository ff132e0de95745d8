//! `lmr-matrix` — pairwise driving distances between stops.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`matrix`] | `DistanceMatrix`, `MatrixStatistics`, `MatrixConfig`, `DuplicatePolicy` |
//! | [`loader`] | `load_matrix_csv`, `load_matrix_reader`, `load_matrix_json` |
//! | [`error`]  | `MatrixError`, `MatrixResult<T>`                           |
//!
//! # Units
//!
//! Entries are stored in **metres**, exactly as delivered by the routing
//! service that produced them.  Conversion to kilometres happens in the
//! route metric engine.
//!
//! # Missing data
//!
//! A lookup for a pair that was never loaded is an error
//! ([`MatrixError::MissingEntry`]), never `0.0`.  The matrix is not assumed to
//! be symmetric: `(a, b)` and `(b, a)` are independent entries.

pub mod error;
pub mod loader;
pub mod matrix;


pub use error::{MatrixError, MatrixResult};
pub use loader::{load_matrix_csv, load_matrix_json, load_matrix_json_reader, load_matrix_reader};
pub use matrix::{DistanceMatrix, DuplicatePolicy, MatrixConfig, MatrixStatistics};

//! Distance-matrix loaders.
//!
//! # CSV format
//!
//! One row per directed `(origin, destination)` pair.  Extra columns are
//! ignored; the three below are required.
//!
//! ```csv
//! origin_id,destination_id,distance_meters
//! AA,AB,1520.4
//! AB,AA,1611.0
//! AA,AC,2904.7
//! ```
//!
//! # JSON format
//!
//! The nested `origin → destination → metres` form:
//!
//! ```json
//! { "AA": { "AB": 1520.4, "AC": 2904.7 }, "AB": { "AA": 1611.0 } }
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::matrix::{DistanceMatrix, MatrixConfig};
use crate::{MatrixError, MatrixResult};

const REQUIRED_COLUMNS: [&str; 3] = ["origin_id", "destination_id", "distance_meters"];

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MatrixRecord {
    origin_id:       String,
    destination_id:  String,
    distance_meters: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`DistanceMatrix`] from a CSV file.
pub fn load_matrix_csv(path: &Path, config: &MatrixConfig) -> MatrixResult<DistanceMatrix> {
    let file = std::fs::File::open(path).map_err(MatrixError::Io)?;
    let matrix = load_matrix_reader(file, config)?;
    log::info!("loaded {} distance entries from {}", matrix.len(), path.display());
    Ok(matrix)
}

/// Like [`load_matrix_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`).
pub fn load_matrix_reader<R: Read>(reader: R, config: &MatrixConfig) -> MatrixResult<DistanceMatrix> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    // ── Validate header ───────────────────────────────────────────────────
    let headers = csv_reader
        .headers()
        .map_err(|e| MatrixError::DataFormat(e.to_string()))?;
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(MatrixError::DataFormat(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    // ── Parse rows ────────────────────────────────────────────────────────
    let mut matrix = DistanceMatrix::new();
    for result in csv_reader.deserialize::<MatrixRecord>() {
        let row = result.map_err(|e| MatrixError::DataFormat(e.to_string()))?;
        matrix.insert_with(&row.origin_id, &row.destination_id, row.distance_meters, config.duplicates)?;
    }

    Ok(matrix)
}

/// Load a [`DistanceMatrix`] from the nested JSON form.
pub fn load_matrix_json(path: &Path, config: &MatrixConfig) -> MatrixResult<DistanceMatrix> {
    let file = std::fs::File::open(path).map_err(MatrixError::Io)?;
    let matrix = load_matrix_json_reader(std::io::BufReader::new(file), config)?;
    log::info!("loaded {} distance entries from {}", matrix.len(), path.display());
    Ok(matrix)
}

/// Like [`load_matrix_json`] but accepts any `Read` source.
pub fn load_matrix_json_reader<R: Read>(reader: R, config: &MatrixConfig) -> MatrixResult<DistanceMatrix> {
    let nested: HashMap<String, HashMap<String, f64>> =
        serde_json::from_reader(reader).map_err(|e| MatrixError::DataFormat(e.to_string()))?;
    DistanceMatrix::from_nested(nested, config)
}

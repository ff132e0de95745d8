//! In-memory distance matrix.
//!
//! Storage is a nested `origin → destination → metres` map, mirroring the
//! shape the matrix is usually exported in by routing services.  Lookups by
//! `&str` therefore need no allocation.

use std::collections::HashMap;

use serde::Deserialize;

use crate::{MatrixError, MatrixResult};

// ── Configuration ─────────────────────────────────────────────────────────────

/// What to do when the same `(origin, destination)` pair is loaded twice.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with [`MatrixError::DataFormat`] if the two values differ.
    /// Exact repeats are accepted.
    #[default]
    Reject,
    /// Keep the value that was loaded first.
    KeepFirst,
    /// Overwrite with the value loaded last.
    KeepLast,
}

/// Loader configuration for [`DistanceMatrix`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    pub duplicates: DuplicatePolicy,
}

// ── Statistics ────────────────────────────────────────────────────────────────

/// Aggregate statistics over every loaded entry, in metres.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MatrixStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub count: usize,
}

// ── DistanceMatrix ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct DistanceMatrix {
    entries: HashMap<String, HashMap<String, f64>>,
    len: usize,
}

impl DistanceMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the nested `{origin: {destination: metres}}` form.
    pub fn from_nested<O, D>(nested: O, config: &MatrixConfig) -> MatrixResult<Self>
    where
        O: IntoIterator<Item = (String, D)>,
        D: IntoIterator<Item = (String, f64)>,
    {
        let mut matrix = Self::new();
        for (origin, row) in nested {
            for (destination, meters) in row {
                matrix.insert_with(&origin, &destination, meters, config.duplicates)?;
            }
        }
        Ok(matrix)
    }

    /// Insert one entry using [`DuplicatePolicy::Reject`].
    pub fn insert(&mut self, origin: &str, destination: &str, meters: f64) -> MatrixResult<()> {
        self.insert_with(origin, destination, meters, DuplicatePolicy::Reject)
    }

    /// Insert one entry, resolving an existing `(origin, destination)` pair
    /// according to `policy`.
    ///
    /// Negative, NaN and infinite distances are rejected.
    pub fn insert_with(
        &mut self,
        origin: &str,
        destination: &str,
        meters: f64,
        policy: DuplicatePolicy,
    ) -> MatrixResult<()> {
        if !meters.is_finite() || meters < 0.0 {
            return Err(MatrixError::DataFormat(format!(
                "distance from {origin:?} to {destination:?} must be a finite non-negative number, got {meters}"
            )));
        }

        let row = self.entries.entry(origin.to_owned()).or_default();
        match row.get_mut(destination) {
            None => {
                row.insert(destination.to_owned(), meters);
                self.len += 1;
            }
            Some(existing) => match policy {
                DuplicatePolicy::Reject if *existing != meters => {
                    return Err(MatrixError::DataFormat(format!(
                        "conflicting distances from {origin:?} to {destination:?}: {} and {meters}",
                        *existing
                    )));
                }
                DuplicatePolicy::Reject | DuplicatePolicy::KeepFirst => {
                    log::warn!("duplicate distance entry {origin:?} -> {destination:?}; keeping {}", *existing);
                }
                DuplicatePolicy::KeepLast => {
                    log::warn!("duplicate distance entry {origin:?} -> {destination:?}; replacing {} with {meters}", *existing);
                    *existing = meters;
                }
            },
        }
        Ok(())
    }

    /// Driving distance in metres from `origin` to `destination`.
    pub fn lookup(&self, origin: &str, destination: &str) -> MatrixResult<f64> {
        self.entries
            .get(origin)
            .and_then(|row| row.get(destination))
            .copied()
            .ok_or_else(|| MatrixError::MissingEntry {
                origin: origin.to_owned(),
                destination: destination.to_owned(),
            })
    }

    pub fn contains(&self, origin: &str, destination: &str) -> bool {
        self.entries.get(origin).is_some_and(|row| row.contains_key(destination))
    }

    /// Number of `(origin, destination)` entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every origin id that has at least one entry, in arbitrary order.
    pub fn origins(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.values().flat_map(|row| row.values().copied())
    }

    /// Min, max, mean and population standard deviation over all entries.
    pub fn statistics(&self) -> MatrixResult<MatrixStatistics> {
        if self.is_empty() {
            return Err(MatrixError::EmptyMatrix);
        }

        let count = self.len;
        let (mut min, mut max, mut sum) = (f64::INFINITY, f64::NEG_INFINITY, 0.0);
        for v in self.values() {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        let mean = sum / count as f64;
        let variance = self.values().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Ok(MatrixStatistics { min, max, mean, std: variance.sqrt(), count })
    }
}

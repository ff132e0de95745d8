//! The `OutputWriter` trait implemented by export backends.

use crate::{BasicStatsRow, OrientationRow, OrientationSummaryRow, OutputResult, RouteSummaryRow};

/// Sink for flattened analysis results.
pub trait OutputWriter {
    /// Write a batch of per-route summaries.
    fn write_route_summaries(&mut self, rows: &[RouteSummaryRow]) -> OutputResult<()>;

    /// Write a batch of per-group street statistics.
    fn write_basic_stats(&mut self, rows: &[BasicStatsRow]) -> OutputResult<()>;

    /// Write a batch of orientation histogram buckets.
    fn write_orientation(&mut self, rows: &[OrientationRow<'_>]) -> OutputResult<()>;

    /// Write a batch of per-group orientation descriptors.
    fn write_orientation_summary(&mut self, rows: &[OrientationSummaryRow<'_>]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

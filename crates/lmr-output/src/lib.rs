//! `lmr-output` — export writers for route and street analysis results.
//!
//! | Backend | Files created                                                     |
//! |---------|-------------------------------------------------------------------|
//! | CSV     | `route_summaries.csv`, `basic_stats.csv`, `street_orientation.csv`, `orientation_summary.csv` |
//!
//! Backends implement [`OutputWriter`] and consume the flat row types in
//! [`row`], built from analysis results with [`route_rows`],
//! [`basic_stats_rows`], [`orientation_rows`] and
//! [`orientation_summary_rows`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use lmr_output::{route_rows, CsvWriter, OutputWriter};
//!
//! let mut writer = CsvWriter::new(Path::new("./output"))?;
//! writer.write_route_summaries(&route_rows(&analysis.summarize_by_routes(None)?))?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use row::{
    basic_stats_rows, orientation_rows, orientation_summary_rows, route_rows, BasicStatsRow, OrientationRow,
    OrientationSummaryRow, RouteSummaryRow,
};
pub use writer::OutputWriter;

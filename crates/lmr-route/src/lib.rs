//! `lmr-route` — delivery routes and the metrics computed over them.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`package`]  | `Package`, `PackageStatus`, `Dimensions`, `PackageStatusCounts` |
//! | [`stop`]     | `Stop`, `LocationType`, `TimeWindow`                       |
//! | [`vehicle`]  | `Vehicle`                                                  |
//! | [`route`]    | `Route`, `RouteMetrics` (cached derived values)            |
//! | [`metrics`]  | metric engine: distances, circuity, centroid, bounding box |
//! | [`analysis`] | `Analysis`, `RouteSummary`, `OverallSummary`              |
//! | [`config`]   | `AnalysisConfig`, `SequenceKind`, `CircuityPolicy`         |
//! | [`amazon`]   | `load_amazon_routes` and reader variants                   |
//! | [`error`]    | `RouteError`, `RouteResult<T>`                             |
//!
//! # Ownership
//!
//! `Route → Stop → Package` is a plain owned tree.  An [`Analysis`] borrows
//! its routes mutably so that metric values computed during a summary are
//! cached on the routes themselves.

pub mod amazon;
pub mod analysis;
pub mod config;
pub mod error;
pub mod metrics;
pub mod package;
pub mod route;
pub mod stop;
pub mod vehicle;

#[cfg(test)]
mod tests;

pub use amazon::{apply_actual_sequences_reader, load_amazon_reader, load_amazon_routes};
pub use analysis::{Analysis, OverallSummary, RouteSummary};
pub use config::{AnalysisConfig, CircuityPolicy, SequenceKind};
pub use error::{RouteError, RouteResult};
pub use package::{Dimensions, Package, PackageStatus, PackageStatusCounts};
pub use route::{Route, RouteMetrics};
pub use stop::{LocationType, Stop, TimeWindow};
pub use vehicle::Vehicle;

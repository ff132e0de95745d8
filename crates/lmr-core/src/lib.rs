//! `lmr-core` — foundational types for the `lmr` last-mile route analyzer.
//!
//! This crate is a dependency of every other `lmr-*` crate.  It has no
//! `lmr-*` dependencies and only small external ones (`thiserror`, `serde`,
//! `serde_json`, `log`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`, `StopId`, `RouteId`, `PackageId`, `VehicleId` |
//! | [`geo`]     | `GeoPoint`, `BoundingBox`, haversine distance, bearings     |
//! | [`config`]  | `load_json_config`, `load_json_config_reader`              |
//! | [`error`]   | `CoreError`, `CoreResult`                                  |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{load_json_config, load_json_config_reader};
pub use error::{CoreError, CoreResult};
pub use geo::{great_circle_distance, BoundingBox, GeoPoint, EARTH_RADIUS_KM};
pub use ids::{EdgeId, NodeId, PackageId, RouteId, StopId, VehicleId};

//! `lmr-street` — street networks, neighbourhood groups, and their statistics.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`network`]     | `StreetNetwork` (CSR + R-tree), `StreetNetworkBuilder`    |
//! | [`polygon`]     | `GroupPolygon` (neighbourhood boundary, area)             |
//! | [`stats`]       | `BasicStats`                                              |
//! | [`orientation`] | `OrientationStats`, `OrientationConfig`                   |
//! | [`geometry`]    | `Geometry`: per-group statistics with caching             |
//! | [`router`]      | `Router` trait, `DijkstraRouter`, `network_distance_matrix` |
//! | [`error`]       | `StreetError`, `StreetResult<T>`                          |

pub mod error;
pub mod geometry;
pub mod network;
pub mod orientation;
pub mod polygon;
pub mod router;
pub mod stats;


pub use error::{StreetError, StreetResult};
pub use geometry::Geometry;
pub use network::{StreetNetwork, StreetNetworkBuilder};
pub use orientation::{OrientationConfig, OrientationStats};
pub use polygon::GroupPolygon;
pub use router::{network_distance_matrix, DijkstraRouter, Path, Router};
pub use stats::BasicStats;

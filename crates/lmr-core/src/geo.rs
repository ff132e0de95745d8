//! Geographic coordinate type and spatial utilities.
//!
//! Unlike a simulation hot path, analysis output is compared against
//! published route lengths, so everything here is `f64`.

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Mean Earth radius used by the spherical-earth approximation, kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance in kilometres between two points given in
/// decimal degrees.  No range validation is performed.
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

    // min(1.0) guards asin against rounding just above 1 for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Like [`new`](Self::new) but rejects NaN and infinite components.
    pub fn try_new(lat: f64, lon: f64) -> CoreResult<Self> {
        if lat.is_finite() && lon.is_finite() {
            Ok(Self { lat, lon })
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }

    /// Haversine great-circle distance in kilometres.
    #[inline]
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        great_circle_distance(self.lat, self.lon, other.lat, other.lon)
    }

    /// Haversine great-circle distance in metres.
    #[inline]
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        self.distance_km(other) * 1000.0
    }

    /// Initial great-circle bearing from `self` towards `other`, in degrees
    /// clockwise from north, normalised to `[0, 360)`.
    pub fn bearing_deg(self, other: GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

        let deg = y.atan2(x).to_degrees().rem_euclid(360.0);
        // rem_euclid can round a tiny negative angle up to exactly 360.0.
        if deg >= 360.0 { 0.0 } else { deg }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Axis-aligned latitude/longitude box.
///
/// A box built from a single point is degenerate (zero area) but valid.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box covering exactly one point.
    pub fn from_point(p: GeoPoint) -> Self {
        Self { min_lat: p.lat, min_lon: p.lon, max_lat: p.lat, max_lon: p.lon }
    }

    /// Smallest box covering every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = GeoPoint>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bbox = Self::from_point(iter.next()?);
        for p in iter {
            bbox.extend(p);
        }
        Some(bbox)
    }

    pub fn extend(&mut self, p: GeoPoint) {
        self.min_lat = self.min_lat.min(p.lat);
        self.min_lon = self.min_lon.min(p.lon);
        self.max_lat = self.max_lat.max(p.lat);
        self.max_lon = self.max_lon.max(p.lon);
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            min_lat: self.min_lat.min(other.min_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lat: self.max_lat.max(other.max_lat),
            max_lon: self.max_lon.max(other.max_lon),
        }
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.min_lat && p.lat <= self.max_lat && p.lon >= self.min_lon && p.lon <= self.max_lon
    }

    /// `true` when the box has zero extent along either axis.
    pub fn is_degenerate(&self) -> bool {
        self.min_lat == self.max_lat || self.min_lon == self.max_lon
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.min_lat + self.max_lat) * 0.5, (self.min_lon + self.max_lon) * 0.5)
    }
}

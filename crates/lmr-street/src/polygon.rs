//! Named neighbourhood polygons.

use geo::{ChamberlainDuquetteArea, Contains};
use serde::{Deserialize, Serialize};

use lmr_core::{BoundingBox, GeoPoint};

/// A group (neighbourhood) boundary: a closed ring of lat/lon vertices.
///
/// The ring may be given open or closed; the first vertex is repeated
/// implicitly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupPolygon {
    pub name: String,
    pub ring: Vec<GeoPoint>,
}

impl GroupPolygon {
    pub fn new(name: impl Into<String>, ring: Vec<GeoPoint>) -> Self {
        Self { name: name.into(), ring }
    }

    /// Axis-aligned rectangle between two opposite corners.
    pub fn rectangle(name: impl Into<String>, sw: GeoPoint, ne: GeoPoint) -> Self {
        let ring = vec![
            sw,
            GeoPoint::new(sw.lat, ne.lon),
            ne,
            GeoPoint::new(ne.lat, sw.lon),
        ];
        Self::new(name, ring)
    }

    /// Area on the sphere in km².  Fewer than three vertices → 0.
    pub fn area_km2(&self) -> f64 {
        if self.ring.len() < 3 {
            return 0.0;
        }
        self.to_geo().chamberlain_duquette_unsigned_area() / 1.0e6
    }

    /// `true` if `p` lies strictly inside the ring.
    pub fn contains(&self, p: GeoPoint) -> bool {
        self.ring.len() >= 3 && self.to_geo().contains(&geo::Point::new(p.lon, p.lat))
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.ring.iter().copied())
    }

    /// geo works in (x, y) = (lon, lat).
    pub(crate) fn to_geo(&self) -> geo::Polygon<f64> {
        let exterior: Vec<(f64, f64)> = self.ring.iter().map(|p| (p.lon, p.lat)).collect();
        geo::Polygon::new(geo::LineString::from(exterior), vec![])
    }
}

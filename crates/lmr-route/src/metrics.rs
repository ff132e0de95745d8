//! Metric engine: distances, circuity, centroid and bounding box of a route.
//!
//! All methods take `&mut self` because they fill the route's
//! [`RouteMetrics`](crate::RouteMetrics) cache.  A cached value is returned
//! as-is on subsequent calls, even if the matrix passed differs; call
//! [`Route::clear_metrics`] or [`Route::recompute_metrics`] after changing
//! inputs.

use lmr_core::{BoundingBox, GeoPoint};
use lmr_matrix::DistanceMatrix;

use crate::{PackageStatusCounts, Route, RouteError, RouteResult, SequenceKind, Stop};

// ── Sequence helpers ──────────────────────────────────────────────────────────

/// Sum of great-circle distances between consecutive stops, in km.
pub fn sequence_euclidean_km(stops: &[&Stop]) -> f64 {
    stops
        .windows(2)
        .map(|pair| pair[0].location().distance_km(pair[1].location()))
        .sum()
}

/// Sum of matrix distances between consecutive stops, in km.
///
/// Stops at the first pair missing from `matrix`.
pub fn sequence_driving_km(stops: &[&Stop], matrix: &DistanceMatrix) -> RouteResult<f64> {
    let mut meters = 0.0;
    for pair in stops.windows(2) {
        meters += matrix.lookup(pair[0].id().as_str(), pair[1].id().as_str())?;
    }
    Ok(meters / 1000.0)
}

// ── Route metrics ─────────────────────────────────────────────────────────────

impl Route {
    /// Great-circle length of the sequence in km.  Fewer than two stops → 0.
    pub fn euclidean_distance(&mut self, seq: SequenceKind) -> RouteResult<f64> {
        if let Some(km) = self.metrics.euclidean_km(seq) {
            return Ok(km);
        }
        let km = sequence_euclidean_km(&self.sequence(seq)?);
        *self.metrics.euclidean_slot(seq) = Some(km);
        log::debug!("route {}: {seq} euclidean distance {km:.3} km", self.id());
        Ok(km)
    }

    /// Driving length of the sequence in km, from matrix entries in metres.
    pub fn driving_distance(&mut self, seq: SequenceKind, matrix: &DistanceMatrix) -> RouteResult<f64> {
        if let Some(km) = self.metrics.driving_km(seq) {
            return Ok(km);
        }
        let km = sequence_driving_km(&self.sequence(seq)?, matrix)?;
        *self.metrics.driving_slot(seq) = Some(km);
        log::debug!("route {}: {seq} driving distance {km:.3} km", self.id());
        Ok(km)
    }

    /// Driving distance divided by euclidean distance of the same sequence.
    ///
    /// The ratio is returned unclamped; apply a
    /// [`CircuityPolicy`](crate::CircuityPolicy) when reporting it.
    pub fn circuity_factor(&mut self, seq: SequenceKind, matrix: &DistanceMatrix) -> RouteResult<f64> {
        if let Some(ratio) = self.metrics.circuity(seq) {
            return Ok(ratio);
        }
        let euclidean = self.euclidean_distance(seq)?;
        if euclidean <= 0.0 {
            return Err(RouteError::DegenerateRoute { route: self.id().clone(), sequence: seq });
        }
        let driving = self.driving_distance(seq, matrix)?;
        let ratio = driving / euclidean;
        *self.metrics.circuity_slot(seq) = Some(ratio);
        Ok(ratio)
    }

    /// Package outcomes over every stop of the route.
    pub fn package_status_counts(&mut self) -> PackageStatusCounts {
        if let Some(counts) = self.metrics.package_counts {
            return counts;
        }
        let counts: PackageStatusCounts =
            self.stops().iter().flat_map(|s| s.packages()).collect();
        self.metrics.package_counts = Some(counts);
        counts
    }

    /// Unweighted mean of the stop coordinates.
    pub fn centroid(&mut self) -> RouteResult<GeoPoint> {
        if let Some(c) = self.metrics.centroid {
            return Ok(c);
        }
        if self.is_empty() {
            return Err(RouteError::EmptyRoute(self.id().clone()));
        }
        let n = self.len() as f64;
        let (lat, lon) = self
            .stops()
            .iter()
            .fold((0.0, 0.0), |(lat, lon), s| (lat + s.location().lat, lon + s.location().lon));
        let c = GeoPoint::new(lat / n, lon / n);
        self.metrics.centroid = Some(c);
        Ok(c)
    }

    /// Smallest lat/lon box containing every stop.
    pub fn bounding_box(&mut self) -> RouteResult<BoundingBox> {
        if let Some(bbox) = self.metrics.bounding_box {
            return Ok(bbox);
        }
        let bbox = BoundingBox::from_points(self.stops().iter().map(Stop::location))
            .ok_or_else(|| RouteError::EmptyRoute(self.id().clone()))?;
        self.metrics.bounding_box = Some(bbox);
        Ok(bbox)
    }

    /// Total package volume in cm³.  Not cached.
    pub fn package_volume_cm3(&self) -> f64 {
        self.stops().iter().map(Stop::package_volume_cm3).sum()
    }

    /// Share of the vehicle's capacity taken by the route's packages.
    ///
    /// `None` without a vehicle or with a non-positive capacity.
    pub fn capacity_utilization(&self) -> Option<f64> {
        let vehicle = self.vehicle()?;
        (vehicle.capacity_cm3 > 0.0).then(|| self.package_volume_cm3() / vehicle.capacity_cm3)
    }

    /// Drop the cache and compute every metric again for `seq`.
    ///
    /// Driving distance and circuity are only computed when a matrix is
    /// given.  Centroid and bounding box are skipped for a route without
    /// stops.
    pub fn recompute_metrics(
        &mut self,
        seq: SequenceKind,
        matrix: Option<&DistanceMatrix>,
    ) -> RouteResult<()> {
        self.clear_metrics();
        self.euclidean_distance(seq)?;
        self.package_status_counts();
        if !self.is_empty() {
            self.centroid()?;
            self.bounding_box()?;
        }
        if let Some(matrix) = matrix {
            self.driving_distance(seq, matrix)?;
            self.circuity_factor(seq, matrix)?;
        }
        Ok(())
    }
}

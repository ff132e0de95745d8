//! Aggregation over a named set of routes.

use std::collections::BTreeMap;

use serde::Serialize;

use lmr_core::{BoundingBox, GeoPoint, RouteId};
use lmr_matrix::DistanceMatrix;

use crate::{AnalysisConfig, PackageStatusCounts, Route, RouteError, RouteResult, SequenceKind};

// ── Summaries ─────────────────────────────────────────────────────────────────

/// Per-route metric values produced by [`Analysis::summarize_by_routes`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteSummary {
    pub route_id:             RouteId,
    pub sequence:             SequenceKind,
    pub stop_count:           usize,
    pub packages:             PackageStatusCounts,
    pub euclidean_km:         f64,
    /// `None` when summarized without a matrix.
    pub driving_km:           Option<f64>,
    /// Circuity after the analysis' [`CircuityPolicy`](crate::CircuityPolicy).
    /// `None` without a matrix or when the route has zero euclidean length.
    pub circuity:             Option<f64>,
    pub centroid:             Option<GeoPoint>,
    pub bounding_box:         Option<BoundingBox>,
    pub package_volume_cm3:   f64,
    pub capacity_utilization: Option<f64>,
}

impl RouteSummary {
    /// Flat `(name, value)` view; absent optional values are left out.
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        let mut out = vec![
            ("stop_count", self.stop_count as f64),
            ("package_count", self.packages.total() as f64),
            ("delivered", self.packages.delivered as f64),
            ("rejected", self.packages.rejected as f64),
            ("failed", self.packages.failed as f64),
            ("euclidean_km", self.euclidean_km),
        ];
        let optional = [
            ("driving_km", self.driving_km),
            ("circuity", self.circuity),
            ("centroid_lat", self.centroid.map(|c| c.lat)),
            ("centroid_lon", self.centroid.map(|c| c.lon)),
            ("min_lat", self.bounding_box.map(|b| b.min_lat)),
            ("min_lon", self.bounding_box.map(|b| b.min_lon)),
            ("max_lat", self.bounding_box.map(|b| b.max_lat)),
            ("max_lon", self.bounding_box.map(|b| b.max_lon)),
        ];
        out.extend(optional.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))));
        out.push(("package_volume_cm3", self.package_volume_cm3));
        if let Some(u) = self.capacity_utilization {
            out.push(("capacity_utilization", u));
        }
        out
    }
}

/// Analysis-wide totals produced by [`Analysis::overall`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverallSummary {
    pub name:                 String,
    pub route_count:          usize,
    pub stop_count:           usize,
    pub packages:             PackageStatusCounts,
    pub euclidean_km:         f64,
    pub driving_km:           Option<f64>,
    pub delivered_percentage: f64,
    pub rejected_percentage:  f64,
    pub failed_percentage:    f64,
    pub bounding_box:         BoundingBox,
}

// ── Analysis ──────────────────────────────────────────────────────────────────

/// A named collection of routes measured with one [`AnalysisConfig`].
///
/// The analysis borrows its routes; metric values computed through it are
/// cached on the routes.
pub struct Analysis<'a> {
    name:   String,
    routes: Vec<&'a mut Route>,
    config: AnalysisConfig,
}

impl<'a> Analysis<'a> {
    pub fn new(name: impl Into<String>, routes: Vec<&'a mut Route>) -> Self {
        Self { name: name.into(), routes, config: AnalysisConfig::default() }
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> + '_ {
        self.routes.iter().map(|r| &**r)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn add_route(&mut self, route: &'a mut Route) {
        self.routes.push(route);
    }

    /// Summary of every route, keyed by route id.
    ///
    /// Without a matrix driving distance and circuity are `None`.  With one,
    /// a missing pair on any route fails the whole call.
    pub fn summarize_by_routes(
        &mut self,
        matrix: Option<&DistanceMatrix>,
    ) -> RouteResult<BTreeMap<RouteId, RouteSummary>> {
        let AnalysisConfig { sequence, circuity } = self.config;
        let mut out = BTreeMap::new();

        for route in self.routes.iter_mut() {
            let euclidean_km = route.euclidean_distance(sequence)?;
            let (driving_km, ratio) = match matrix {
                Some(m) => {
                    let driving = route.driving_distance(sequence, m)?;
                    let ratio = match route.circuity_factor(sequence, m) {
                        Ok(r) => Some(circuity.apply(r)),
                        Err(RouteError::DegenerateRoute { .. }) => {
                            log::warn!("route {}: zero euclidean length, no circuity", route.id());
                            None
                        }
                        Err(e) => return Err(e),
                    };
                    (Some(driving), ratio)
                }
                None => (None, None),
            };
            let (centroid, bounding_box) = if route.is_empty() {
                (None, None)
            } else {
                (Some(route.centroid()?), Some(route.bounding_box()?))
            };

            let summary = RouteSummary {
                route_id: route.id().clone(),
                sequence,
                stop_count: route.len(),
                packages: route.package_status_counts(),
                euclidean_km,
                driving_km,
                circuity: ratio,
                centroid,
                bounding_box,
                package_volume_cm3: route.package_volume_cm3(),
                capacity_utilization: route.capacity_utilization(),
            };
            out.insert(summary.route_id.clone(), summary);
        }

        log::debug!("analysis {:?}: summarized {} route(s)", self.name, out.len());
        Ok(out)
    }

    /// Union of the bounding boxes of all non-empty routes.
    pub fn overall_bounding_box(&mut self) -> RouteResult<BoundingBox> {
        let mut acc: Option<BoundingBox> = None;
        for route in self.routes.iter_mut().filter(|r| !r.is_empty()) {
            let bbox = route.bounding_box()?;
            acc = Some(match acc {
                Some(a) => a.union(bbox),
                None => bbox,
            });
        }
        acc.ok_or_else(|| RouteError::EmptyAnalysis(self.name.clone()))
    }

    /// Package outcomes summed over every route.
    pub fn package_status_counts(&mut self) -> PackageStatusCounts {
        let mut total = PackageStatusCounts::default();
        for route in self.routes.iter_mut() {
            total += route.package_status_counts();
        }
        total
    }

    pub fn delivered_percentage(&mut self) -> RouteResult<f64> {
        self.percentage(|c| c.delivered)
    }

    pub fn rejected_percentage(&mut self) -> RouteResult<f64> {
        self.percentage(|c| c.rejected)
    }

    pub fn failed_percentage(&mut self) -> RouteResult<f64> {
        self.percentage(|c| c.failed)
    }

    fn percentage(&mut self, pick: impl Fn(&PackageStatusCounts) -> usize) -> RouteResult<f64> {
        let counts = self.package_status_counts();
        match counts.total() {
            0 => Err(RouteError::NoPackages(self.name.clone())),
            total => Ok(pick(&counts) as f64 / total as f64 * 100.0),
        }
    }

    /// Analysis-wide totals.
    pub fn overall(&mut self, matrix: Option<&DistanceMatrix>) -> RouteResult<OverallSummary> {
        let sequence = self.config.sequence;
        let bounding_box = self.overall_bounding_box()?;
        let packages = self.package_status_counts();
        let total = packages.total();
        if total == 0 {
            return Err(RouteError::NoPackages(self.name.clone()));
        }
        let pct = |n: usize| n as f64 / total as f64 * 100.0;

        let mut euclidean_km = 0.0;
        let mut driving_km = matrix.map(|_| 0.0);
        let mut stop_count = 0;
        for route in self.routes.iter_mut() {
            stop_count += route.len();
            euclidean_km += route.euclidean_distance(sequence)?;
            if let (Some(m), Some(acc)) = (matrix, driving_km.as_mut()) {
                *acc += route.driving_distance(sequence, m)?;
            }
        }

        Ok(OverallSummary {
            name: self.name.clone(),
            route_count: self.routes.len(),
            stop_count,
            packages,
            euclidean_km,
            driving_km,
            delivered_percentage: pct(packages.delivered),
            rejected_percentage: pct(packages.rejected),
            failed_percentage: pct(packages.failed),
            bounding_box,
        })
    }
}

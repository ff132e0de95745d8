//! Plain data row types written by output backends, and conversions from the
//! analysis results.

use std::collections::BTreeMap;

use lmr_core::RouteId;
use lmr_route::RouteSummary;
use lmr_street::{BasicStats, OrientationStats};

/// One route's summary.  `None` fields are written as empty cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummaryRow {
    pub route_id:             String,
    pub sequence:             &'static str,
    pub stop_count:           usize,
    pub delivered:            usize,
    pub rejected:             usize,
    pub failed:               usize,
    pub euclidean_km:         f64,
    pub driving_km:           Option<f64>,
    pub circuity:             Option<f64>,
    pub centroid_lat:         Option<f64>,
    pub centroid_lon:         Option<f64>,
    pub min_lat:              Option<f64>,
    pub min_lon:              Option<f64>,
    pub max_lat:              Option<f64>,
    pub max_lon:              Option<f64>,
    pub package_volume_cm3:   f64,
    pub capacity_utilization: Option<f64>,
}

impl From<&RouteSummary> for RouteSummaryRow {
    fn from(s: &RouteSummary) -> Self {
        Self {
            route_id:             s.route_id.to_string(),
            sequence:             s.sequence.as_str(),
            stop_count:           s.stop_count,
            delivered:            s.packages.delivered,
            rejected:             s.packages.rejected,
            failed:               s.packages.failed,
            euclidean_km:         s.euclidean_km,
            driving_km:           s.driving_km,
            circuity:             s.circuity,
            centroid_lat:         s.centroid.map(|c| c.lat),
            centroid_lon:         s.centroid.map(|c| c.lon),
            min_lat:              s.bounding_box.map(|b| b.min_lat),
            min_lon:              s.bounding_box.map(|b| b.min_lon),
            max_lat:              s.bounding_box.map(|b| b.max_lat),
            max_lon:              s.bounding_box.map(|b| b.max_lon),
            package_volume_cm3:   s.package_volume_cm3,
            capacity_utilization: s.capacity_utilization,
        }
    }
}

/// Street statistics of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicStatsRow {
    pub group: String,
    pub stats: BasicStats,
}

/// One bucket of a group's orientation histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationRow<'a> {
    pub group:       &'a str,
    pub bucket:      usize,
    /// Centre of the bucket.
    pub bearing_deg: f64,
    pub share:       f64,
}

/// Axis descriptors of one group's orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationSummaryRow<'a> {
    pub group:                   &'a str,
    pub bearing_count:           usize,
    pub dominant_bearing_deg:    f64,
    pub dominant_share:          f64,
    pub second_bearing_deg:      Option<f64>,
    pub second_share:            Option<f64>,
    pub mean_deviation:          f64,
    pub quadratic_sum_deviation: f64,
    pub mean:                    f64,
    pub std:                     f64,
    pub skew:                    Option<f64>,
    pub kurt:                    Option<f64>,
    pub entropy:                 f64,
}

pub fn route_rows(summaries: &BTreeMap<RouteId, RouteSummary>) -> Vec<RouteSummaryRow> {
    summaries.values().map(RouteSummaryRow::from).collect()
}

pub fn basic_stats_rows(stats: &BTreeMap<String, BasicStats>) -> Vec<BasicStatsRow> {
    stats
        .iter()
        .map(|(group, s)| BasicStatsRow { group: group.clone(), stats: s.clone() })
        .collect()
}

/// Histogram buckets of every group that has an orientation.
pub fn orientation_rows(stats: &BTreeMap<String, Option<OrientationStats>>) -> Vec<OrientationRow<'_>> {
    stats
        .iter()
        .filter_map(|(group, o)| o.as_ref().map(|o| (group, o)))
        .flat_map(|(group, o)| {
            o.histogram.iter().enumerate().map(move |(bucket, &share)| OrientationRow {
                group: group.as_str(),
                bucket,
                bearing_deg: bucket as f64 * o.bin_width_deg,
                share,
            })
        })
        .collect()
}

/// One descriptor row per group that has an orientation.
pub fn orientation_summary_rows(
    stats: &BTreeMap<String, Option<OrientationStats>>,
) -> Vec<OrientationSummaryRow<'_>> {
    stats
        .iter()
        .filter_map(|(group, o)| o.as_ref().map(|o| (group, o)))
        .map(|(group, o)| OrientationSummaryRow {
            group:                   group.as_str(),
            bearing_count:           o.bearing_count,
            dominant_bearing_deg:    o.dominant_bearing_deg,
            dominant_share:          o.dominant_share,
            second_bearing_deg:      o.second_bearing_deg,
            second_share:            o.second_share,
            mean_deviation:          o.mean_deviation,
            quadratic_sum_deviation: o.quadratic_sum_deviation,
            mean:                    o.mean,
            std:                     o.std,
            skew:                    o.skew,
            kurt:                    o.kurt,
            entropy:                 o.entropy,
        })
        .collect()
}

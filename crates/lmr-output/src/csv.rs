//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `route_summaries.csv`
//! - `basic_stats.csv`
//! - `street_orientation.csv` (long format: one row per group and bucket)
//! - `orientation_summary.csv` (one row per group)

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{BasicStatsRow, OrientationRow, OrientationSummaryRow, OutputResult, RouteSummaryRow};

const ROUTE_HEADER: [&str; 17] = [
    "route_id",
    "sequence",
    "stop_count",
    "delivered",
    "rejected",
    "failed",
    "euclidean_km",
    "driving_km",
    "circuity",
    "centroid_lat",
    "centroid_lon",
    "min_lat",
    "min_lon",
    "max_lat",
    "max_lon",
    "package_volume_cm3",
    "capacity_utilization",
];

const STATS_HEADER: [&str; 18] = [
    "group",
    "node_count",
    "edge_count",
    "k_avg",
    "edge_length_total_m",
    "edge_length_avg_m",
    "street_segment_count",
    "street_length_total_m",
    "street_length_avg_m",
    "streets_per_node_avg",
    "intersection_count",
    "self_loop_proportion",
    "circuity_avg",
    "area_km2",
    "node_density_km2",
    "intersection_density_km2",
    "edge_density_km2",
    "street_density_m_per_km2",
];

const ORIENTATION_SUMMARY_HEADER: [&str; 13] = [
    "group",
    "bearing_count",
    "dominant_bearing_deg",
    "dominant_share",
    "second_bearing_deg",
    "second_share",
    "mean_deviation",
    "quadratic_sum_deviation",
    "mean",
    "std",
    "skew",
    "kurt",
    "entropy",
];

/// Empty cell for `None`.
fn opt(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes analysis output to four CSV files.
pub struct CsvWriter {
    routes:              Writer<File>,
    stats:               Writer<File>,
    orientation:         Writer<File>,
    orientation_summary: Writer<File>,
    finished:            bool,
}

impl CsvWriter {
    /// Create the four CSV files in `dir` (which must exist) and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut routes = Writer::from_path(dir.join("route_summaries.csv"))?;
        routes.write_record(ROUTE_HEADER)?;

        let mut stats = Writer::from_path(dir.join("basic_stats.csv"))?;
        stats.write_record(STATS_HEADER)?;

        let mut orientation = Writer::from_path(dir.join("street_orientation.csv"))?;
        orientation.write_record(["group", "bucket", "bearing_deg", "share"])?;

        let mut orientation_summary = Writer::from_path(dir.join("orientation_summary.csv"))?;
        orientation_summary.write_record(ORIENTATION_SUMMARY_HEADER)?;

        log::debug!("writing CSV output to {}", dir.display());
        Ok(Self { routes, stats, orientation, orientation_summary, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_route_summaries(&mut self, rows: &[RouteSummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.routes.write_record(&[
                row.route_id.clone(),
                row.sequence.to_owned(),
                row.stop_count.to_string(),
                row.delivered.to_string(),
                row.rejected.to_string(),
                row.failed.to_string(),
                row.euclidean_km.to_string(),
                opt(row.driving_km),
                opt(row.circuity),
                opt(row.centroid_lat),
                opt(row.centroid_lon),
                opt(row.min_lat),
                opt(row.min_lon),
                opt(row.max_lat),
                opt(row.max_lon),
                row.package_volume_cm3.to_string(),
                opt(row.capacity_utilization),
            ])?;
        }
        Ok(())
    }

    fn write_basic_stats(&mut self, rows: &[BasicStatsRow]) -> OutputResult<()> {
        for row in rows {
            let s = &row.stats;
            self.stats.write_record(&[
                row.group.clone(),
                s.node_count.to_string(),
                s.edge_count.to_string(),
                opt(s.k_avg),
                s.edge_length_total_m.to_string(),
                opt(s.edge_length_avg_m),
                s.street_segment_count.to_string(),
                s.street_length_total_m.to_string(),
                opt(s.street_length_avg_m),
                opt(s.streets_per_node_avg),
                s.intersection_count.to_string(),
                opt(s.self_loop_proportion),
                opt(s.circuity_avg),
                opt(s.area_km2),
                opt(s.node_density_km2),
                opt(s.intersection_density_km2),
                opt(s.edge_density_km2),
                opt(s.street_density_m_per_km2),
            ])?;
        }
        Ok(())
    }

    fn write_orientation(&mut self, rows: &[OrientationRow<'_>]) -> OutputResult<()> {
        for row in rows {
            self.orientation.write_record(&[
                row.group.to_owned(),
                row.bucket.to_string(),
                row.bearing_deg.to_string(),
                row.share.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_orientation_summary(&mut self, rows: &[OrientationSummaryRow<'_>]) -> OutputResult<()> {
        for row in rows {
            self.orientation_summary.write_record(&[
                row.group.to_owned(),
                row.bearing_count.to_string(),
                row.dominant_bearing_deg.to_string(),
                row.dominant_share.to_string(),
                opt(row.second_bearing_deg),
                opt(row.second_share),
                row.mean_deviation.to_string(),
                row.quadratic_sum_deviation.to_string(),
                row.mean.to_string(),
                row.std.to_string(),
                opt(row.skew),
                opt(row.kurt),
                row.entropy.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.routes.flush()?;
        self.stats.flush()?;
        self.orientation.flush()?;
        self.orientation_summary.flush()?;
        Ok(())
    }
}

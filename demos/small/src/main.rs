//! small — end-to-end example for the lmr route & street analyzer.
//!
//! Builds a synthetic two-neighbourhood city, plans three delivery routes on
//! it, derives driving distances from street shortest paths, and prints
//! route, analysis and street statistics.  CSV exports land in
//! `output/small` unless the config says otherwise.
//!
//! Usage: `small [config.json]`.  Every config field is optional.

mod network;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use env_logger::{Builder, Env};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use lmr_core::{load_json_config, GeoPoint, NodeId};
use lmr_matrix::DistanceMatrix;
use lmr_output::{
    basic_stats_rows, orientation_rows, orientation_summary_rows, route_rows, CsvWriter, OutputWriter,
};
use lmr_route::{
    Analysis, AnalysisConfig, Dimensions, LocationType, Package, PackageStatus, Route, SequenceKind,
    Stop, Vehicle,
};
use lmr_street::{network_distance_matrix, Geometry, OrientationConfig, StreetNetwork};

use network::{build_city, GROUP_KEY};

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct DemoConfig {
    seed:            u64,
    route_count:     usize,
    stops_per_route: usize,
    analysis:        AnalysisConfig,
    orientation:     OrientationConfig,
    output_dir:      PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed:            42,
            route_count:     3,
            stops_per_route: 8,
            analysis:        AnalysisConfig::default(),
            orientation:     OrientationConfig::default(),
            output_dir:      PathBuf::from("output/small"),
        }
    }
}

/// Van capacity in cm³ (~3.3 m³).
const VAN_CAPACITY_CM3: f64 = 3_300_000.0;

// ── Route generation ──────────────────────────────────────────────────────────

fn random_status<R: Rng>(rng: &mut R) -> PackageStatus {
    match rng.gen_range(0..100) {
        0..=89 => PackageStatus::Delivered,
        90..=94 => PackageStatus::Rejected,
        _ => PackageStatus::FailedAttempt,
    }
}

/// One route starting at `depot`, visiting `stops` distinct random nodes.
/// The actual sequence swaps a few neighbouring stops, as drivers do.
fn plan_route<R: Rng>(
    rng: &mut R,
    index: usize,
    net: &StreetNetwork,
    depot: NodeId,
    stops: usize,
) -> Result<Route> {
    let mut candidates: Vec<NodeId> = net.nodes().filter(|&n| n != depot).collect();
    candidates.shuffle(rng);

    let mut planned = vec![Stop::new(format!("R{index}-depot"), net.node_pos[depot.index()], LocationType::Depot)];
    for (i, node) in candidates.into_iter().take(stops).enumerate() {
        let pos = net.node_pos[node.index()];
        let packages = (0..rng.gen_range(1..=4))
            .map(|p| {
                let dims = Dimensions::new(
                    rng.gen_range(5.0..60.0),
                    rng.gen_range(5.0..40.0),
                    rng.gen_range(2.0..40.0),
                );
                Package::new(format!("R{index}-S{i}-P{p}"), dims, random_status(rng))
                    .with_weight(rng.gen_range(100.0..15_000.0))
            })
            .collect();
        let stop = Stop::new(format!("R{index}-S{i}"), pos, LocationType::Dropoff)
            .with_service_time(rng.gen_range(30.0..180.0))
            .with_packages(packages);
        planned.push(stop);
    }

    let mut actual: Vec<String> = planned.iter().map(|s| s.id().to_string()).collect();
    for i in 1..actual.len().saturating_sub(1) {
        if rng.gen_bool(0.3) {
            actual.swap(i, i + 1);
        }
    }

    let mut route = Route::new(format!("R{index}"), planned)?
        .with_vehicle(Vehicle::new(format!("van-{index}"), VAN_CAPACITY_CM3));
    route.set_actual_sequence(&actual)?;
    Ok(route)
}

fn stop_points(routes: &[Route]) -> Vec<(String, GeoPoint)> {
    let mut seen = HashSet::new();
    routes
        .iter()
        .flat_map(|r| r.stops())
        .filter(|s| seen.insert(s.id().clone()))
        .map(|s| (s.id().to_string(), s.location()))
        .collect()
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn print_routes(title: &str, analysis: &mut Analysis<'_>, matrix: &DistanceMatrix) -> Result<()> {
    let summaries = analysis.summarize_by_routes(Some(matrix))?;
    println!("{title}");
    println!(
        "{:<6} {:>6} {:>10} {:>10} {:>9} {:>9}",
        "Route", "Stops", "Eucl. km", "Drive km", "Circuity", "Util. %"
    );
    println!("{}", "-".repeat(56));
    for s in summaries.values() {
        println!(
            "{:<6} {:>6} {:>10.3} {:>10.3} {:>9.3} {:>9.2}",
            s.route_id.as_str(),
            s.stop_count,
            s.euclidean_km,
            s.driving_km.unwrap_or(f64::NAN),
            s.circuity.unwrap_or(f64::NAN),
            s.capacity_utilization.unwrap_or(0.0) * 100.0,
        );
    }
    println!();
    Ok(())
}

fn write_outputs(
    dir: &Path,
    analysis: &mut Analysis<'_>,
    matrix: &DistanceMatrix,
    geometry: &mut Geometry,
) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut writer = CsvWriter::new(dir)?;
    writer.write_route_summaries(&route_rows(&analysis.summarize_by_routes(Some(matrix))?))?;
    writer.write_basic_stats(&basic_stats_rows(geometry.basic_stats()?))?;
    writer.write_orientation(&orientation_rows(geometry.street_orientation()?))?;
    writer.write_orientation_summary(&orientation_summary_rows(geometry.street_orientation()?))?;
    writer.finish()?;
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config: DemoConfig = match std::env::args().nth(1) {
        Some(path) => load_json_config(Path::new(&path))?,
        None => DemoConfig::default(),
    };

    println!("=== small — lmr route & street analyzer ===");
    println!(
        "Routes: {}  |  Stops per route: {}  |  Seed: {}",
        config.route_count, config.stops_per_route, config.seed
    );
    println!();

    let t0 = Instant::now();
    let mut rng = SmallRng::seed_from_u64(config.seed);

    // 1. Street network.
    let (network, polygons) = build_city(&mut rng);
    println!("Street network: {} nodes, {} edges", network.node_count(), network.edge_count());

    // 2. Routes, all leaving from the riverside corner.
    let depot = network
        .snap_to_node(GeoPoint::new(30.690, -88.060))
        .ok_or_else(|| anyhow::anyhow!("street network is empty"))?;
    let mut routes = (0..config.route_count)
        .map(|i| plan_route(&mut rng, i, &network, depot, config.stops_per_route))
        .collect::<Result<Vec<_>>>()?;

    // 3. Driving distances from street shortest paths.
    let matrix = network_distance_matrix(&network, &stop_points(&routes))?;
    let stats = matrix.statistics()?;
    println!(
        "Distance matrix: {} entries, mean {:.0} m, max {:.0} m",
        stats.count, stats.mean, stats.max
    );
    println!();

    // 4. Planned vs. actual.
    let planned_config = AnalysisConfig { sequence: SequenceKind::Planned, ..config.analysis };
    let mut planned = Analysis::new("planned", routes.iter_mut().collect()).with_config(planned_config);
    print_routes("Planned sequences", &mut planned, &matrix)?;
    drop(planned);

    let actual_config = AnalysisConfig { sequence: SequenceKind::Actual, ..config.analysis };
    let mut actual = Analysis::new("actual", routes.iter_mut().collect()).with_config(actual_config);
    print_routes("Actual sequences", &mut actual, &matrix)?;

    let overall = actual.overall(Some(&matrix))?;
    println!(
        "Overall: {} packages at {} stops  |  delivered {:.1} %  rejected {:.1} %  failed {:.1} %",
        overall.packages.total(),
        overall.stop_count,
        overall.delivered_percentage,
        overall.rejected_percentage,
        overall.failed_percentage,
    );
    println!(
        "Driven {:.2} km over {:.2} km of straight lines",
        overall.driving_km.unwrap_or(0.0),
        overall.euclidean_km
    );
    println!();

    // 5. Street geometry per neighbourhood.
    let mut geometry = Geometry::new(network, GROUP_KEY, polygons).with_orientation_config(config.orientation);
    println!(
        "{:<10} {:>6} {:>8} {:>10} {:>12} {:>9}",
        "Group", "Nodes", "Streets", "Area km²", "Int. / km²", "Circuity"
    );
    println!("{}", "-".repeat(60));
    for (group, s) in geometry.basic_stats()? {
        println!(
            "{:<10} {:>6} {:>8} {:>10.4} {:>12.1} {:>9.3}",
            group,
            s.node_count,
            s.street_segment_count,
            s.area_km2.unwrap_or(f64::NAN),
            s.intersection_density_km2.unwrap_or(f64::NAN),
            s.circuity_avg.unwrap_or(f64::NAN),
        );
    }
    println!();
    for (group, o) in geometry.street_orientation()? {
        match o {
            Some(o) => println!(
                "{group}: main axis {:.0}° ({:.1} %), cross axis {} ({:.1} %), deviation {:.3}",
                o.dominant_bearing_deg,
                o.dominant_share * 100.0,
                o.second_bearing_deg.map_or("-".to_owned(), |b| format!("{b:.0}°")),
                o.second_share.unwrap_or(0.0) * 100.0,
                o.mean_deviation
            ),
            None => println!("{group}: no street bearings"),
        }
    }
    println!();

    // 6. Exports.
    write_outputs(&config.output_dir, &mut actual, &matrix, &mut geometry)?;
    println!("Wrote CSV exports to {}", config.output_dir.display());
    println!("Done in {:.3} s", t0.elapsed().as_secs_f64());

    Ok(())
}

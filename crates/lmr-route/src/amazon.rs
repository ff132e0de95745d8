//! Loader for the Amazon Last Mile Routing Research Challenge dataset.
//!
//! # Files
//!
//! | File                    | Shape                                                        |
//! |-------------------------|--------------------------------------------------------------|
//! | `route_data.json`       | `{route: {date_YYYY_MM_DD, departure_time_utc, executor_capacity_cm3, stops: {stop: {lat, lng, type, zone_id}}}}` |
//! | `package_data.json`     | `{route: {stop: {package: {scan_status, time_window, planned_service_time_seconds, dimensions}}}}` |
//! | `actual_sequences.json` | `{route: {"actual": {stop: rank}}}`                          |
//!
//! Stops keep their file order, which becomes the planned sequence.  The
//! published files contain bare `NaN` tokens (missing zones and time
//! windows); they are read as `null`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use lmr_core::GeoPoint;

use crate::{
    Dimensions, LocationType, Package, PackageStatus, Route, RouteError, RouteResult, Stop,
    Vehicle,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Raw records ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawRoute {
    #[serde(default)]
    executor_capacity_cm3: Option<f64>,
    #[serde(default, rename = "date_YYYY_MM_DD")]
    date: Option<String>,
    #[serde(default)]
    departure_time_utc: Option<String>,
    stops: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawStop {
    lat: f64,
    lng: f64,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    zone_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    scan_status: String,
    #[serde(default)]
    time_window: Option<RawWindow>,
    #[serde(default)]
    planned_service_time_seconds: Option<f64>,
    dimensions: Dimensions,
}

#[derive(Debug, Deserialize)]
struct RawWindow {
    #[serde(default)]
    start_time_utc: Option<String>,
    #[serde(default)]
    end_time_utc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawActual {
    actual: HashMap<String, i64>,
}

type RawPackages = HashMap<String, HashMap<String, Map<String, Value>>>;

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every route from `route_data.json` and `package_data.json`, and
/// optionally apply `actual_sequences.json`.
pub fn load_amazon_routes(
    route_path: &Path,
    package_path: &Path,
    actual_path: Option<&Path>,
) -> RouteResult<Vec<Route>> {
    let mut routes = load_amazon_reader(
        BufReader::new(File::open(route_path)?),
        BufReader::new(File::open(package_path)?),
    )?;
    if let Some(path) = actual_path {
        apply_actual_sequences_reader(BufReader::new(File::open(path)?), &mut routes)?;
    }
    Ok(routes)
}

/// Build routes from route and package JSON readers.  Routes come back in
/// file order.
pub fn load_amazon_reader<R1: Read, R2: Read>(route_data: R1, package_data: R2) -> RouteResult<Vec<Route>> {
    let raw_routes: Map<String, Value> = parse_json(route_data, "route data")?;
    let mut raw_packages: RawPackages = parse_json(package_data, "package data")?;

    let mut routes = Vec::with_capacity(raw_routes.len());
    for (route_id, value) in raw_routes {
        let raw: RawRoute = from_value(value, &route_id)?;
        let mut route_packages = raw_packages.remove(&route_id).unwrap_or_default();

        let mut stops = Vec::with_capacity(raw.stops.len());
        for (stop_id, value) in raw.stops {
            let raw_stop: RawStop = from_value(value, &stop_id)?;
            let packages = route_packages.remove(&stop_id).unwrap_or_default();
            stops.push(build_stop(stop_id, raw_stop, packages)?);
        }

        let mut route = Route::new(route_id.as_str(), stops)?;
        if let Some(capacity) = raw.executor_capacity_cm3 {
            route = route.with_vehicle(Vehicle::new(format!("{route_id}-vehicle"), capacity));
        }
        if let (Some(date), Some(time)) = (&raw.date, &raw.departure_time_utc) {
            route = route.with_departure_time(parse_timestamp(&format!("{date} {time}"))?);
        }
        routes.push(route);
    }

    if !raw_packages.is_empty() {
        log::warn!("package data has {} route(s) absent from route data", raw_packages.len());
    }
    log::info!("loaded {} route(s) from the Amazon dataset", routes.len());
    Ok(routes)
}

/// Set the actual sequence of each route listed in `reader`, ordering stops
/// by ascending rank.  Returns the number of routes updated.
///
/// Routes not mentioned keep no actual sequence; entries for unknown routes
/// are skipped with a warning.
pub fn apply_actual_sequences_reader<R: Read>(reader: R, routes: &mut [Route]) -> RouteResult<usize> {
    let mut raw: HashMap<String, RawActual> = parse_json(reader, "actual sequences")?;

    let mut updated = 0;
    for route in routes.iter_mut() {
        let Some(entry) = raw.remove(route.id().as_str()) else {
            continue;
        };
        let mut ranked: Vec<(String, i64)> = entry.actual.into_iter().collect();
        ranked.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        route.set_actual_sequence(ranked.iter().map(|(id, _)| id))?;
        updated += 1;
    }

    if !raw.is_empty() {
        log::warn!("actual sequences given for {} unknown route(s)", raw.len());
    }
    log::info!("applied actual sequences to {updated} route(s)");
    Ok(updated)
}

// ── Conversion ────────────────────────────────────────────────────────────────

fn build_stop(id: String, raw: RawStop, packages: Map<String, Value>) -> RouteResult<Stop> {
    let location_type = match raw.kind.as_str() {
        "Station" => LocationType::Depot,
        "Dropoff" => LocationType::Dropoff,
        other => return Err(RouteError::Parse(format!("stop {id}: unknown stop type {other:?}"))),
    };
    let location = GeoPoint::try_new(raw.lat, raw.lng)?;

    let mut service_secs = 0.0;
    let mut window: Option<(i64, i64)> = None;
    let mut parsed = Vec::with_capacity(packages.len());
    for (package_id, value) in packages {
        let raw_pkg: RawPackage = from_value(value, &package_id)?;
        let status = parse_status(&raw_pkg.scan_status)?;
        service_secs += raw_pkg.planned_service_time_seconds.unwrap_or(0.0);
        if let Some((start, end)) = raw_pkg.time_window.map(|w| parse_window(&w)).transpose()?.flatten() {
            window = Some(match window {
                Some((s, e)) => (s.min(start), e.max(end)),
                None => (start, end),
            });
        }
        parsed.push(Package::new(package_id, raw_pkg.dimensions, status));
    }

    let mut stop = Stop::new(id, location, location_type)
        .with_service_time(service_secs)
        .with_packages(parsed);
    if let Some(zone) = raw.zone_id {
        stop = stop.with_zone(zone);
    }
    if let Some((start, end)) = window {
        stop = stop.with_time_window(start, end)?;
    }
    Ok(stop)
}

fn parse_status(s: &str) -> RouteResult<PackageStatus> {
    match s {
        "DELIVERED" => Ok(PackageStatus::Delivered),
        "REJECTED" => Ok(PackageStatus::Rejected),
        "DELIVERY_ATTEMPTED" => Ok(PackageStatus::FailedAttempt),
        other => Err(RouteError::Parse(format!("unknown scan status {other:?}"))),
    }
}

/// Window bounds in Unix seconds; `None` when either end is missing.
fn parse_window(w: &RawWindow) -> RouteResult<Option<(i64, i64)>> {
    let (Some(start), Some(end)) = (&w.start_time_utc, &w.end_time_utc) else {
        return Ok(None);
    };
    Ok(Some((parse_timestamp(start)?, parse_timestamp(end)?)))
}

fn parse_timestamp(s: &str) -> RouteResult<i64> {
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .map(|t| t.and_utc().timestamp())
        .map_err(|e| RouteError::Parse(format!("bad timestamp {s:?}: {e}")))
}

// ── JSON helpers ──────────────────────────────────────────────────────────────

fn parse_json<T: DeserializeOwned, R: Read>(mut reader: R, what: &str) -> RouteResult<T> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    serde_json::from_str(&replace_nan(&text))
        .map_err(|e| RouteError::Parse(format!("{what}: {e}")))
}

fn from_value<T: DeserializeOwned>(value: Value, id: &str) -> RouteResult<T> {
    serde_json::from_value(value).map_err(|e| RouteError::Parse(format!("{id}: {e}")))
}

/// Replace bare `NaN` tokens outside string literals with `null`.
pub(crate) fn replace_nan(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if rest.starts_with("NaN") {
            out.push_str("null");
            rest = &rest[3..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

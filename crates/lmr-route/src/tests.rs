//! Unit tests for lmr-route.

#[cfg(test)]
mod fixtures {
    use lmr_core::GeoPoint;

    use crate::{Dimensions, LocationType, Package, PackageStatus, Route, Stop};

    pub fn stop(id: &str, lat: f64, lon: f64) -> Stop {
        Stop::new(id, GeoPoint::new(lat, lon), LocationType::Dropoff)
    }

    pub fn packages(prefix: &str, delivered: usize, rejected: usize, failed: usize) -> Vec<Package> {
        let dims = Dimensions::new(10.0, 10.0, 10.0);
        let statuses = std::iter::repeat(PackageStatus::Delivered)
            .take(delivered)
            .chain(std::iter::repeat(PackageStatus::Rejected).take(rejected))
            .chain(std::iter::repeat(PackageStatus::FailedAttempt).take(failed));
        statuses
            .enumerate()
            .map(|(i, s)| Package::new(format!("{prefix}-{i}"), dims, s))
            .collect()
    }

    /// A(0,0) → B(0,1).
    pub fn two_stop_route() -> Route {
        Route::new("R1", vec![stop("A", 0.0, 0.0), stop("B", 0.0, 1.0)]).unwrap()
    }

    /// Four stops on a small square, planned clockwise.
    pub fn square_route() -> Route {
        Route::new(
            "SQ",
            vec![
                stop("s0", 0.0, 0.0),
                stop("s1", 0.0, 0.01),
                stop("s2", 0.01, 0.01),
                stop("s3", 0.01, 0.0),
            ],
        )
        .unwrap()
    }
}

#[cfg(test)]
mod stop {
    use lmr_core::GeoPoint;

    use crate::{Dimensions, LocationType, Package, PackageStatus, RouteError, Stop, TimeWindow};

    #[test]
    fn time_window_must_be_ordered() {
        let s = Stop::new("x", GeoPoint::new(0.0, 0.0), LocationType::Dropoff);
        let err = s.clone().with_time_window(200, 100).unwrap_err();
        assert!(matches!(err, RouteError::InvalidTimeWindow { start: 200, end: 100, .. }));

        let ok = s.with_time_window(100, 100).unwrap();
        let tw = ok.time_window().unwrap();
        assert_eq!(tw.duration_secs(), 0);
        assert!(tw.contains(100));
    }

    #[test]
    fn time_window_deserialization_checks_order() {
        let tw: TimeWindow = serde_json::from_str(r#"{"start": 100, "end": 250}"#).unwrap();
        assert_eq!((tw.start(), tw.end()), (100, 250));
        assert_eq!(serde_json::to_string(&tw).unwrap(), r#"{"start":100,"end":250}"#);

        let err = serde_json::from_str::<TimeWindow>(r#"{"start": 250, "end": 100}"#).unwrap_err();
        assert!(err.to_string().contains("starts at 250"));
        assert!(TimeWindow::new(250, 100).is_none());
    }

    #[test]
    fn package_volume_and_counts() {
        let s = Stop::new("x", GeoPoint::new(0.0, 0.0), LocationType::Dropoff).with_packages(vec![
            Package::new("p1", Dimensions::new(10.0, 20.0, 30.0), PackageStatus::Delivered),
            Package::new("p2", Dimensions::new(1.0, 2.0, 3.0), PackageStatus::Rejected),
        ]);
        assert_eq!(s.package_volume_cm3(), 6006.0);
        let counts = s.package_status_counts();
        assert_eq!((counts.delivered, counts.rejected, counts.failed), (1, 1, 0));
    }
}

#[cfg(test)]
mod route {
    use super::fixtures::{stop, two_stop_route};
    use crate::{Route, RouteError, SequenceKind};

    #[test]
    fn duplicate_stop_rejected() {
        let err = Route::new("R", vec![stop("A", 0.0, 0.0), stop("A", 1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateStop { .. }));
    }

    #[test]
    fn actual_sequence_permutation_accepted() {
        let mut r = Route::new(
            "R",
            vec![stop("A", 0.0, 0.0), stop("B", 0.0, 1.0), stop("C", 1.0, 1.0)],
        )
        .unwrap();
        r.set_actual_sequence(["C", "A", "B"]).unwrap();
        let ids: Vec<&str> = r
            .sequence_ids(SequenceKind::Actual)
            .unwrap()
            .into_iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(ids, ["C", "A", "B"]);
        // Planned order untouched.
        assert_eq!(r.stops()[0].id().as_str(), "A");
    }

    #[test]
    fn actual_sequence_foreign_id_rejected() {
        let mut r = two_stop_route();
        let err = r.set_actual_sequence(["A", "Z"]).unwrap_err();
        assert!(matches!(err, RouteError::SequenceMismatch { .. }));
        assert!(!r.has_actual_sequence());
    }

    #[test]
    fn actual_sequence_repeat_or_missing_rejected() {
        let mut r = two_stop_route();
        assert!(matches!(
            r.set_actual_sequence(["A", "A"]),
            Err(RouteError::SequenceMismatch { .. })
        ));
        assert!(matches!(r.set_actual_sequence(["B"]), Err(RouteError::SequenceMismatch { .. })));
    }

    #[test]
    fn failed_set_keeps_previous_sequence() {
        let mut r = two_stop_route();
        r.set_actual_sequence(["B", "A"]).unwrap();
        assert!(r.set_actual_sequence(["B", "X"]).is_err());
        let ids = r.sequence_ids(SequenceKind::Actual).unwrap();
        assert_eq!(ids[0].as_str(), "B");
    }

    #[test]
    fn actual_sequence_unset() {
        let r = two_stop_route();
        assert!(matches!(
            r.sequence(SequenceKind::Actual),
            Err(RouteError::ActualSequenceUnset(_))
        ));
    }
}

#[cfg(test)]
mod metrics {
    use lmr_matrix::{DistanceMatrix, MatrixError};

    use super::fixtures::{packages, square_route, stop, two_stop_route};
    use crate::{Route, RouteError, SequenceKind};

    const PLANNED: SequenceKind = SequenceKind::Planned;

    fn ab_matrix() -> DistanceMatrix {
        let mut m = DistanceMatrix::new();
        m.insert("A", "B", 150_000.0).unwrap();
        m
    }

    #[test]
    fn one_degree_scenario() {
        let mut r = two_stop_route();
        let m = ab_matrix();
        let euclid = r.euclidean_distance(PLANNED).unwrap();
        assert!((euclid - 111.19).abs() < 0.01, "got {euclid}");
        assert_eq!(r.driving_distance(PLANNED, &m).unwrap(), 150.0);
        let c = r.circuity_factor(PLANNED, &m).unwrap();
        assert!((c - 1.349).abs() < 0.001, "got {c}");
    }

    #[test]
    fn short_routes_have_zero_length() {
        let mut empty = Route::new("E", vec![]).unwrap();
        assert_eq!(empty.euclidean_distance(PLANNED).unwrap(), 0.0);
        let mut single = Route::new("S", vec![stop("A", 1.0, 1.0)]).unwrap();
        assert_eq!(single.euclidean_distance(PLANNED).unwrap(), 0.0);
    }

    #[test]
    fn driving_distance_fails_on_missing_pair() {
        let mut r = two_stop_route();
        r.set_actual_sequence(["B", "A"]).unwrap();
        // Only A → B is in the matrix.
        let err = r.driving_distance(SequenceKind::Actual, &ab_matrix()).unwrap_err();
        assert!(matches!(err, RouteError::Matrix(MatrixError::MissingEntry { .. })));
        assert!(r.metrics().driving_actual_km.is_none());
    }

    #[test]
    fn circuity_at_least_one_when_driving_exceeds_euclidean() {
        let mut r = square_route();
        let mut m = DistanceMatrix::new();
        for (a, b) in [("s0", "s1"), ("s1", "s2"), ("s2", "s3")] {
            let km = r.stop(a).unwrap().location().distance_km(r.stop(b).unwrap().location());
            m.insert(a, b, km * 1000.0 * 1.2).unwrap();
        }
        let c = r.circuity_factor(PLANNED, &m).unwrap();
        assert!(c >= 1.0);
        assert!((c - 1.2).abs() < 1e-9);
    }

    #[test]
    fn degenerate_route_circuity() {
        let mut r = Route::new("D", vec![stop("A", 0.0, 0.0), stop("B", 0.0, 0.0)]).unwrap();
        let mut m = DistanceMatrix::new();
        m.insert("A", "B", 10.0).unwrap();
        assert!(matches!(
            r.circuity_factor(PLANNED, &m),
            Err(RouteError::DegenerateRoute { sequence: SequenceKind::Planned, .. })
        ));
    }

    #[test]
    fn centroid_and_bounding_box() {
        let mut r = square_route();
        let c = r.centroid().unwrap();
        assert!((c.lat - 0.005).abs() < 1e-12);
        assert!((c.lon - 0.005).abs() < 1e-12);
        let b = r.bounding_box().unwrap();
        assert_eq!((b.min_lat, b.min_lon, b.max_lat, b.max_lon), (0.0, 0.0, 0.01, 0.01));
    }

    #[test]
    fn single_stop_box_is_degenerate() {
        let mut r = Route::new("S", vec![stop("A", 3.0, 4.0)]).unwrap();
        assert!(r.bounding_box().unwrap().is_degenerate());
    }

    #[test]
    fn empty_route_has_no_centroid() {
        let mut r = Route::new("E", vec![]).unwrap();
        assert!(matches!(r.centroid(), Err(RouteError::EmptyRoute(_))));
        assert!(matches!(r.bounding_box(), Err(RouteError::EmptyRoute(_))));
    }

    #[test]
    fn cached_value_survives_new_matrix() {
        let mut r = two_stop_route();
        assert_eq!(r.driving_distance(PLANNED, &ab_matrix()).unwrap(), 150.0);

        let mut other = DistanceMatrix::new();
        other.insert("A", "B", 200_000.0).unwrap();
        assert_eq!(r.driving_distance(PLANNED, &other).unwrap(), 150.0);

        r.clear_metrics();
        assert_eq!(r.driving_distance(PLANNED, &other).unwrap(), 200.0);
    }

    #[test]
    fn set_actual_sequence_does_not_clear_cache() {
        let mut r = square_route();
        r.set_actual_sequence(["s0", "s1", "s2", "s3"]).unwrap();
        let first = r.euclidean_distance(SequenceKind::Actual).unwrap();
        r.set_actual_sequence(["s0", "s2", "s1", "s3"]).unwrap();
        assert_eq!(r.euclidean_distance(SequenceKind::Actual).unwrap(), first);

        r.recompute_metrics(SequenceKind::Actual, None).unwrap();
        assert!(r.euclidean_distance(SequenceKind::Actual).unwrap() > first);
    }

    #[test]
    fn recompute_fills_every_slot() {
        let mut r = two_stop_route();
        r.recompute_metrics(PLANNED, Some(&ab_matrix())).unwrap();
        let m = r.metrics();
        assert!(m.euclidean_planned_km.is_some());
        assert_eq!(m.driving_planned_km, Some(150.0));
        assert!(m.circuity_planned.is_some());
        assert!(m.centroid.is_some() && m.bounding_box.is_some());
        assert!(m.package_counts.is_some());
        assert!(m.euclidean_actual_km.is_none());
    }

    #[test]
    fn package_counts_over_stops() {
        let mut r = Route::new(
            "P",
            vec![
                stop("A", 0.0, 0.0).with_packages(packages("a", 2, 1, 0)),
                stop("B", 0.0, 1.0).with_packages(packages("b", 1, 0, 3)),
            ],
        )
        .unwrap();
        let c = r.package_status_counts();
        assert_eq!((c.delivered, c.rejected, c.failed), (3, 1, 3));
        assert_eq!(c.total(), 7);
    }
}

#[cfg(test)]
mod analysis {
    use lmr_matrix::DistanceMatrix;

    use super::fixtures::{packages, stop, two_stop_route};
    use crate::{Analysis, AnalysisConfig, CircuityPolicy, Route, RouteError, SequenceKind, Vehicle};

    fn two_routes() -> (Route, Route) {
        let r1 = Route::new(
            "R1",
            vec![
                stop("A", 0.0, 0.0).with_packages(packages("a", 8, 1, 0)),
                stop("B", 0.0, 1.0).with_packages(packages("b", 0, 0, 1)),
            ],
        )
        .unwrap();
        let r2 = Route::new(
            "R2",
            vec![
                stop("C", 1.0, 1.0).with_packages(packages("c", 9, 0, 0)),
                stop("D", 2.0, 2.0).with_packages(packages("d", 0, 0, 1)),
            ],
        )
        .unwrap();
        (r1, r2)
    }

    #[test]
    fn percentages() {
        let (mut r1, mut r2) = two_routes();
        let mut a = Analysis::new("two", vec![&mut r1, &mut r2]);
        assert!((a.rejected_percentage().unwrap() - 5.0).abs() < 1e-12);
        assert!((a.failed_percentage().unwrap() - 10.0).abs() < 1e-12);
        assert!((a.delivered_percentage().unwrap() - 85.0).abs() < 1e-12);
    }

    #[test]
    fn no_packages() {
        let mut r = two_stop_route();
        let mut a = Analysis::new("empty", vec![&mut r]);
        assert!(matches!(a.rejected_percentage(), Err(RouteError::NoPackages(_))));
    }

    #[test]
    fn overall_bounding_box_union() {
        let (mut r1, mut r2) = two_routes();
        let mut a = Analysis::new("two", vec![&mut r1, &mut r2]);
        let b = a.overall_bounding_box().unwrap();
        assert_eq!((b.min_lat, b.min_lon, b.max_lat, b.max_lon), (0.0, 0.0, 2.0, 2.0));
    }

    #[test]
    fn overall_bounding_box_without_routes() {
        let mut a = Analysis::new("none", vec![]);
        assert!(matches!(a.overall_bounding_box(), Err(RouteError::EmptyAnalysis(_))));
    }

    #[test]
    fn summarize_without_matrix() {
        let (mut r1, mut r2) = two_routes();
        let mut a = Analysis::new("two", vec![&mut r1, &mut r2]);
        let summaries = a.summarize_by_routes(None).unwrap();
        assert_eq!(summaries.len(), 2);
        let s = &summaries["R1"];
        assert!((s.euclidean_km - 111.19).abs() < 0.01);
        assert!(s.driving_km.is_none() && s.circuity.is_none());
        assert_eq!(s.packages.total(), 10);
        let names: Vec<&str> = s.metrics().iter().map(|(k, _)| *k).collect();
        assert!(names.contains(&"euclidean_km"));
        assert!(!names.contains(&"driving_km"));
        // Values were cached on the route.
        drop(a);
        assert!(r1.metrics().euclidean_planned_km.is_some());
    }

    #[test]
    fn summarize_with_clamped_circuity() {
        let mut r = two_stop_route().with_vehicle(Vehicle::new("v", 1000.0));
        let mut m = DistanceMatrix::new();
        // Shorter than the great circle: a rounding artefact.
        m.insert("A", "B", 100_000.0).unwrap();
        let config = AnalysisConfig { sequence: SequenceKind::Planned, circuity: CircuityPolicy::ClampToOne };
        let mut a = Analysis::new("clamp", vec![&mut r]).with_config(config);
        let s = a.summarize_by_routes(Some(&m)).unwrap().remove("R1").unwrap();
        assert_eq!(s.driving_km, Some(100.0));
        assert_eq!(s.circuity, Some(1.0));
        assert_eq!(s.capacity_utilization, Some(0.0));
        drop(a);
        // The cache keeps the raw ratio.
        assert!(r.metrics().circuity_planned.unwrap() < 1.0);
    }

    #[test]
    fn summarize_fails_on_missing_pair() {
        let (mut r1, mut r2) = two_routes();
        let mut m = DistanceMatrix::new();
        m.insert("A", "B", 120_000.0).unwrap();
        let mut a = Analysis::new("two", vec![&mut r1, &mut r2]);
        assert!(matches!(a.summarize_by_routes(Some(&m)), Err(RouteError::Matrix(_))));
    }

    #[test]
    fn summarize_actual_requires_actual_sequence() {
        let (mut r1, mut r2) = two_routes();
        r1.set_actual_sequence(["B", "A"]).unwrap();
        let config = AnalysisConfig { sequence: SequenceKind::Actual, ..Default::default() };
        let mut a = Analysis::new("two", vec![&mut r1, &mut r2]).with_config(config);
        assert!(matches!(a.summarize_by_routes(None), Err(RouteError::ActualSequenceUnset(_))));
    }

    #[test]
    fn overall_totals() {
        let (mut r1, mut r2) = two_routes();
        let mut a = Analysis::new("two", vec![&mut r1, &mut r2]);
        let o = a.overall(None).unwrap();
        assert_eq!(o.route_count, 2);
        assert_eq!(o.stop_count, 4);
        assert_eq!(o.packages.total(), 20);
        assert!((o.rejected_percentage - 5.0).abs() < 1e-12);
        assert!(o.driving_km.is_none());
        assert!(o.euclidean_km > 111.0);
    }
}

#[cfg(test)]
mod amazon {
    use std::io::Cursor;

    use crate::amazon::replace_nan;
    use crate::{
        LocationType, PackageStatus, RouteError, SequenceKind, apply_actual_sequences_reader,
        load_amazon_reader,
    };

    const ROUTES: &str = r#"{
        "RouteID_1": {
            "station_code": "DLA3",
            "date_YYYY_MM_DD": "2018-07-27",
            "departure_time_utc": "16:02:10",
            "executor_capacity_cm3": 3313071.0,
            "route_score": "High",
            "stops": {
                "ST": {"lat": 34.09, "lng": -118.32, "type": "Station", "zone_id": NaN},
                "ZB": {"lat": 34.10, "lng": -118.33, "type": "Dropoff", "zone_id": "A-1.2C"},
                "AA": {"lat": 34.11, "lng": -118.31, "type": "Dropoff", "zone_id": "A-1.3C"}
            }
        }
    }"#;

    const PACKAGES: &str = r#"{
        "RouteID_1": {
            "ST": {},
            "ZB": {
                "PackageID_1": {
                    "scan_status": "DELIVERED",
                    "time_window": {"start_time_utc": "2018-07-27 16:00:00", "end_time_utc": "2018-07-27 23:00:00"},
                    "planned_service_time_seconds": 59.0,
                    "dimensions": {"depth_cm": 25.4, "height_cm": 12.2, "width_cm": 3.8}
                },
                "PackageID_2": {
                    "scan_status": "REJECTED",
                    "time_window": {"start_time_utc": NaN, "end_time_utc": NaN},
                    "planned_service_time_seconds": 30.0,
                    "dimensions": {"depth_cm": 10.0, "height_cm": 10.0, "width_cm": 10.0}
                }
            },
            "AA": {
                "PackageID_3": {
                    "scan_status": "DELIVERY_ATTEMPTED",
                    "time_window": {"start_time_utc": NaN, "end_time_utc": NaN},
                    "planned_service_time_seconds": 12.0,
                    "dimensions": {"depth_cm": 5.0, "height_cm": 5.0, "width_cm": 5.0}
                }
            }
        }
    }"#;

    const ACTUAL: &str = r#"{"RouteID_1": {"actual": {"ST": 0, "AA": 1, "ZB": 2}}}"#;

    #[test]
    fn nan_outside_strings_only() {
        assert_eq!(replace_nan(r#"{"a": NaN, "b": "NaN"}"#), r#"{"a": null, "b": "NaN"}"#);
        assert_eq!(replace_nan(r#"["x\"NaN", NaN]"#), r#"["x\"NaN", null]"#);
    }

    #[test]
    fn load_routes_in_file_order() {
        let routes = load_amazon_reader(Cursor::new(ROUTES), Cursor::new(PACKAGES)).unwrap();
        assert_eq!(routes.len(), 1);
        let r = &routes[0];
        let ids: Vec<&str> = r.stops().iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, ["ST", "ZB", "AA"]);

        assert_eq!(r.stops()[0].location_type(), LocationType::Depot);
        assert_eq!(r.stops()[0].zone_id(), None);
        assert_eq!(r.vehicle().unwrap().capacity_cm3, 3313071.0);

        let zb = r.stop("ZB").unwrap();
        assert_eq!(zb.zone_id(), Some("A-1.2C"));
        assert_eq!(zb.planned_service_time_secs(), 89.0);
        assert_eq!(zb.packages()[1].status, PackageStatus::Rejected);
        let tw = zb.time_window().unwrap();
        assert_eq!(tw.duration_secs(), 7 * 3600);
        // Departs 16:02:10, the window opens at 16:00:00 the same day.
        assert_eq!(r.departure_time(), Some(tw.start() + 130));
        assert_eq!(tw.start(), 1_532_707_200);

        assert_eq!(r.stop("AA").unwrap().packages()[0].status, PackageStatus::FailedAttempt);
        assert!(r.stop("AA").unwrap().time_window().is_none());
    }

    #[test]
    fn apply_actual_sequences_by_rank() {
        let mut routes = load_amazon_reader(Cursor::new(ROUTES), Cursor::new(PACKAGES)).unwrap();
        let n = apply_actual_sequences_reader(Cursor::new(ACTUAL), &mut routes).unwrap();
        assert_eq!(n, 1);
        let ids: Vec<&str> = routes[0]
            .sequence_ids(SequenceKind::Actual)
            .unwrap()
            .into_iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(ids, ["ST", "AA", "ZB"]);
    }

    #[test]
    fn unknown_scan_status() {
        let packages = PACKAGES.replace("\"REJECTED\"", "\"LOST\"");
        let err = load_amazon_reader(Cursor::new(ROUTES), Cursor::new(packages)).unwrap_err();
        assert!(matches!(err, RouteError::Parse(_)));
    }

    #[test]
    fn unknown_stop_type() {
        let routes = ROUTES.replace("\"Station\"", "\"Warehouse\"");
        let err = load_amazon_reader(Cursor::new(routes), Cursor::new(PACKAGES)).unwrap_err();
        assert!(matches!(err, RouteError::Parse(_)));
    }

    #[test]
    fn malformed_json() {
        let err = load_amazon_reader(Cursor::new("{"), Cursor::new(PACKAGES)).unwrap_err();
        assert!(matches!(err, RouteError::Parse(_)));
    }

    #[test]
    fn departure_time_optional_but_checked() {
        let routes = ROUTES.replace("\"departure_time_utc\": \"16:02:10\",", "");
        let loaded = load_amazon_reader(Cursor::new(routes), Cursor::new(PACKAGES)).unwrap();
        assert_eq!(loaded[0].departure_time(), None);

        let routes = ROUTES.replace("16:02:10", "16h02");
        let err = load_amazon_reader(Cursor::new(routes), Cursor::new(PACKAGES)).unwrap_err();
        assert!(matches!(err, RouteError::Parse(_)));
    }
}

#[cfg(test)]
mod config {
    use crate::{AnalysisConfig, CircuityPolicy, SequenceKind};

    #[test]
    fn partial_json_uses_defaults() {
        let c: AnalysisConfig = serde_json::from_str(r#"{"circuity": "clamp_to_one"}"#).unwrap();
        assert_eq!(c.sequence, SequenceKind::Planned);
        assert_eq!(c.circuity, CircuityPolicy::ClampToOne);
    }

    #[test]
    fn clamp_policy() {
        assert_eq!(CircuityPolicy::Raw.apply(0.9), 0.9);
        assert_eq!(CircuityPolicy::ClampToOne.apply(0.9), 1.0);
        assert_eq!(CircuityPolicy::ClampToOne.apply(1.4), 1.4);
    }
}

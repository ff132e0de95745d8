//! Integration tests for lmr-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use lmr_core::GeoPoint;
    use lmr_route::{Analysis, LocationType, Route, Stop};
    use lmr_street::{Geometry, StreetNetworkBuilder};

    use crate::csv::CsvWriter;
    use crate::writer::OutputWriter;
    use crate::{basic_stats_rows, orientation_rows, orientation_summary_rows, route_rows};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read_rows(dir: &TempDir, file: &str) -> (Vec<String>, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("route_summaries.csv").exists());
        assert!(dir.path().join("basic_stats.csv").exists());
        assert!(dir.path().join("street_orientation.csv").exists());
        assert!(dir.path().join("orientation_summary.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let (headers, rows) = read_rows(&dir, "street_orientation.csv");
        assert_eq!(headers, ["group", "bucket", "bearing_deg", "share"]);
        assert!(rows.is_empty());

        let (headers, _) = read_rows(&dir, "route_summaries.csv");
        assert_eq!(headers[0], "route_id");
        assert_eq!(headers.len(), 17);
        assert_eq!(&headers[11..15], ["min_lat", "min_lon", "max_lat", "max_lon"]);

        let (headers, _) = read_rows(&dir, "orientation_summary.csv");
        assert_eq!(headers[0], "group");
        assert_eq!(headers.len(), 13);

        let (headers, _) = read_rows(&dir, "basic_stats.csv");
        assert_eq!(headers[0], "group");
        assert_eq!(headers.len(), 18);
    }

    #[test]
    fn route_summaries_written() {
        let mut route = Route::new("R1", vec![
            Stop::new("A", GeoPoint::new(0.0, 0.0), LocationType::Depot),
            Stop::new("B", GeoPoint::new(0.0, 1.0), LocationType::Dropoff),
        ])
        .unwrap();
        let summaries = Analysis::new("a", vec![&mut route]).summarize_by_routes(None).unwrap();

        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_route_summaries(&route_rows(&summaries)).unwrap();
        w.finish().unwrap();

        let (_, rows) = read_rows(&dir, "route_summaries.csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "R1");
        assert_eq!(&rows[0][1], "planned");
        assert_eq!(&rows[0][2], "2");
        assert!(rows[0][6].parse::<f64>().unwrap() > 111.0);
        // No matrix: driving distance and circuity are empty.
        assert_eq!(&rows[0][7], "");
        assert_eq!(&rows[0][8], "");
        // Bounding box of A(0, 0) and B(0, 1).
        assert_eq!(&rows[0][11], "0");
        assert_eq!(&rows[0][12], "0");
        assert_eq!(&rows[0][13], "0");
        assert_eq!(&rows[0][14], "1");
    }

    #[test]
    fn street_stats_written() {
        let mut b = StreetNetworkBuilder::new();
        let pts = [(0.0, 0.0), (0.0, 0.001), (0.001, 0.001), (0.001, 0.0)];
        let ids = pts.map(|(lat, lon)| b.add_node_with_attrs(GeoPoint::new(lat, lon), [("hood", "A")]));
        for i in 0..4 {
            b.add_straight_street(ids[i], ids[(i + 1) % 4]);
        }
        b.add_node_with_attrs(GeoPoint::new(1.0, 1.0), [("hood", "B")]);
        let mut geo = Geometry::new(b.build(), "hood", vec![]);

        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_basic_stats(&basic_stats_rows(geo.basic_stats().unwrap())).unwrap();
        w.write_orientation(&orientation_rows(geo.street_orientation().unwrap())).unwrap();
        w.write_orientation_summary(&orientation_summary_rows(geo.street_orientation().unwrap())).unwrap();
        w.finish().unwrap();

        let (_, rows) = read_rows(&dir, "basic_stats.csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "A");
        assert_eq!(&rows[0][1], "4");
        // No polygon: area is empty.
        assert_eq!(&rows[0][13], "");

        // Group B has no bearings and contributes no rows.
        let (_, rows) = read_rows(&dir, "street_orientation.csv");
        assert_eq!(rows.len(), 36);
        assert!(rows.iter().all(|r| &r[0] == "A"));
        assert_eq!(&rows[9][2], "90");
        assert_eq!(&rows[9][3], "0.25");

        // One descriptor row for A: north-south and east-west axes tie.
        let (_, rows) = read_rows(&dir, "orientation_summary.csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "A");
        assert_eq!(&rows[0][1], "8");
        assert_eq!(&rows[0][2], "0");
        assert_eq!(&rows[0][3], "0.5");
        assert_eq!(&rows[0][4], "90");
        assert_eq!(&rows[0][5], "0.5");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batches_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_route_summaries(&[]).unwrap();
        w.write_basic_stats(&[]).unwrap();
        w.write_orientation(&[]).unwrap();
        w.write_orientation_summary(&[]).unwrap();
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("nope")).is_err());
    }
}

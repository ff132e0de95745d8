//! Synthetic two-neighbourhood city.
//!
//! "riverside" is a north-aligned grid west of the river; "hilltop" is a grid
//! rotated by 30° east of it.  One bridge joins them.  Coordinates are
//! loosely placed on Mobile, AL.

use lmr_core::{GeoPoint, NodeId};
use lmr_street::{GroupPolygon, StreetNetwork, StreetNetworkBuilder};
use rand::Rng;

pub const GROUP_KEY: &str = "neighbourhood";

const ORIGIN: GeoPoint = GeoPoint { lat: 30.690, lon: -88.060 };
/// Block edge in degrees (~100 m).
const BLOCK_DEG: f64 = 0.0009;
const GRID: usize = 6;

/// Build the city.  `rng` adds street curvature so that circuity is not
/// exactly 1.
///
/// Returns the network and the two neighbourhood polygons.
pub fn build_city<R: Rng>(rng: &mut R) -> (StreetNetwork, Vec<GroupPolygon>) {
    let mut b = StreetNetworkBuilder::with_capacity(2 * GRID * GRID, 8 * GRID * GRID);

    let riverside = add_grid(&mut b, &mut *rng, ORIGIN, 0.0);
    let hilltop_origin = GeoPoint::new(ORIGIN.lat, ORIGIN.lon + (GRID as f64 + 2.0) * BLOCK_DEG);
    let hilltop = add_grid(&mut b, &mut *rng, hilltop_origin, 30.0);

    // The bridge: east edge of riverside to the nearest hilltop corner.
    b.add_straight_street(riverside[GRID - 1], hilltop[0]);

    let span = GRID as f64 * BLOCK_DEG;
    let polygons = vec![
        GroupPolygon::rectangle(
            "riverside",
            GeoPoint::new(ORIGIN.lat - BLOCK_DEG, ORIGIN.lon - BLOCK_DEG),
            GeoPoint::new(ORIGIN.lat + span, ORIGIN.lon + span - 0.5 * BLOCK_DEG),
        ),
        GroupPolygon::rectangle(
            "hilltop",
            GeoPoint::new(hilltop_origin.lat - span, hilltop_origin.lon - BLOCK_DEG),
            GeoPoint::new(hilltop_origin.lat + 1.5 * span, hilltop_origin.lon + 1.5 * span),
        ),
    ];

    let untagged = b.assign_groups(GROUP_KEY, &polygons);
    if untagged > 0 {
        log::warn!("{untagged} node(s) outside both neighbourhoods");
    }
    (b.build(), polygons)
}

/// `GRID × GRID` grid rotated clockwise by `rotation_deg`, with two-way
/// streets between horizontal and vertical neighbours.  Returns node ids in
/// row-major order.
fn add_grid<R: Rng>(b: &mut StreetNetworkBuilder, rng: &mut R, origin: GeoPoint, rotation_deg: f64) -> Vec<NodeId> {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    let mut ids = Vec::with_capacity(GRID * GRID);
    for row in 0..GRID {
        for col in 0..GRID {
            let (x, y) = (col as f64 * BLOCK_DEG, row as f64 * BLOCK_DEG);
            let east = x * cos + y * sin;
            let north = -x * sin + y * cos;
            ids.push(b.add_node(GeoPoint::new(origin.lat + north, origin.lon + east)));
        }
    }

    for row in 0..GRID {
        for col in 0..GRID {
            let here = ids[row * GRID + col];
            let mut neighbours = Vec::with_capacity(2);
            if col + 1 < GRID {
                neighbours.push(ids[row * GRID + col + 1]);
            }
            if row + 1 < GRID {
                neighbours.push(ids[(row + 1) * GRID + col]);
            }
            for there in neighbours {
                let straight = b.node_pos(here).distance_m(b.node_pos(there));
                b.add_street(here, there, straight * rng.gen_range(1.0..1.25));
            }
        }
    }
    ids
}

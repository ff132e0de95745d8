//! Topology statistics of one group of a street network.

use std::collections::BTreeMap;

use serde::Serialize;

use lmr_core::NodeId;

use crate::StreetNetwork;

/// Size, connectivity and density figures for one group.
///
/// Averages and ratios are `None` when their denominator is zero; densities
/// are `None` when the group has no polygon (or a zero-area one).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BasicStats {
    pub node_count:               usize,
    /// Directed edges with both endpoints in the group.
    pub edge_count:               usize,
    /// Average node degree, `2 * edge_count / node_count`.
    pub k_avg:                    Option<f64>,
    pub edge_length_total_m:      f64,
    pub edge_length_avg_m:        Option<f64>,
    /// Undirected streets: an edge and its reverse count once.
    pub street_segment_count:     usize,
    pub street_length_total_m:    f64,
    pub street_length_avg_m:      Option<f64>,
    pub streets_per_node_avg:     Option<f64>,
    /// Nodes where at least two streets meet.
    pub intersection_count:       usize,
    pub self_loop_proportion:     Option<f64>,
    /// Street length over straight-line length, self-loops excluded.
    pub circuity_avg:             Option<f64>,
    pub area_km2:                 Option<f64>,
    pub node_density_km2:         Option<f64>,
    pub intersection_density_km2: Option<f64>,
    /// Directed edges per km².
    pub edge_density_km2:         Option<f64>,
    /// Metres of street per km².
    pub street_density_m_per_km2: Option<f64>,
}

impl BasicStats {
    /// Flat `(name, value)` view; absent values are left out.
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        let all = [
            ("node_count", Some(self.node_count as f64)),
            ("edge_count", Some(self.edge_count as f64)),
            ("k_avg", self.k_avg),
            ("edge_length_total_m", Some(self.edge_length_total_m)),
            ("edge_length_avg_m", self.edge_length_avg_m),
            ("street_segment_count", Some(self.street_segment_count as f64)),
            ("street_length_total_m", Some(self.street_length_total_m)),
            ("street_length_avg_m", self.street_length_avg_m),
            ("streets_per_node_avg", self.streets_per_node_avg),
            ("intersection_count", Some(self.intersection_count as f64)),
            ("self_loop_proportion", self.self_loop_proportion),
            ("circuity_avg", self.circuity_avg),
            ("area_km2", self.area_km2),
            ("node_density_km2", self.node_density_km2),
            ("intersection_density_km2", self.intersection_density_km2),
            ("edge_density_km2", self.edge_density_km2),
            ("street_density_m_per_km2", self.street_density_m_per_km2),
        ];
        all.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))).collect()
    }
}

fn ratio(num: f64, den: f64) -> Option<f64> {
    (den > 0.0).then(|| num / den)
}

/// Statistics over the nodes flagged in `members` and the edges whose
/// endpoints are both members.
pub(crate) fn compute(network: &StreetNetwork, members: &[bool], area_km2: Option<f64>) -> BasicStats {
    let nodes: Vec<NodeId> = network.nodes().filter(|n| members[n.index()]).collect();
    let node_count = nodes.len();

    let mut edge_count = 0;
    let mut edge_length_total_m = 0.0;
    // (min, max) endpoint pair → street length.  The first edge seen wins.
    let mut segments: BTreeMap<(NodeId, NodeId), f64> = BTreeMap::new();

    for e in network.edges() {
        let (u, v) = (network.edge_from[e.index()], network.edge_to[e.index()]);
        if !(members[u.index()] && members[v.index()]) {
            continue;
        }
        edge_count += 1;
        edge_length_total_m += network.edge_length_m[e.index()];
        segments.entry((u.min(v), u.max(v))).or_insert(network.edge_length_m[e.index()]);
    }

    let mut streets_per_node = vec![0usize; network.node_count()];
    let mut street_length_total_m = 0.0;
    let mut straight_total_m = 0.0;
    let mut curved_total_m = 0.0;
    let mut self_loops = 0;
    for (&(u, v), &len) in &segments {
        street_length_total_m += len;
        streets_per_node[u.index()] += 1;
        streets_per_node[v.index()] += 1;
        if u == v {
            self_loops += 1;
        } else {
            curved_total_m += len;
            straight_total_m += network.node_pos[u.index()].distance_m(network.node_pos[v.index()]);
        }
    }

    let spn_total: usize = nodes.iter().map(|n| streets_per_node[n.index()]).sum();
    let intersection_count = nodes.iter().filter(|n| streets_per_node[n.index()] >= 2).count();
    let segment_count = segments.len();
    let area = area_km2.filter(|a| *a > 0.0);
    let density = |x: f64| area.map(|a| x / a);

    BasicStats {
        node_count,
        edge_count,
        k_avg: ratio(2.0 * edge_count as f64, node_count as f64),
        edge_length_total_m,
        edge_length_avg_m: ratio(edge_length_total_m, edge_count as f64),
        street_segment_count: segment_count,
        street_length_total_m,
        street_length_avg_m: ratio(street_length_total_m, segment_count as f64),
        streets_per_node_avg: ratio(spn_total as f64, node_count as f64),
        intersection_count,
        self_loop_proportion: ratio(self_loops as f64, segment_count as f64),
        circuity_avg: ratio(curved_total_m, straight_total_m),
        area_km2,
        node_density_km2: density(node_count as f64),
        intersection_density_km2: density(intersection_count as f64),
        edge_density_km2: density(edge_count as f64),
        street_density_m_per_km2: density(street_length_total_m),
    }
}

//! Shortest paths over the street graph and network-derived distance matrices.
//!
//! # Cost units
//!
//! Dijkstra runs on integer millimetres so the heap can order costs exactly;
//! reported lengths are the `f64` sum of the traversed edges in metres.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use lmr_core::{EdgeId, GeoPoint, NodeId};
use lmr_matrix::DistanceMatrix;

use crate::network::StreetNetwork;
use crate::{StreetError, StreetResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Edges to traverse in order, from source to destination.
    pub edges:    Vec<EdgeId>,
    pub length_m: f64,
}

impl Path {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Point-to-point routing engine.
pub trait Router {
    /// Shortest path from `from` to `to`; `from == to` gives an empty path.
    fn route(&self, network: &StreetNetwork, from: NodeId, to: NodeId) -> StreetResult<Path>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Dijkstra's algorithm over the CSR graph, minimising street length.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, network: &StreetNetwork, from: NodeId, to: NodeId) -> StreetResult<Path> {
        if from == to {
            return Ok(Path { edges: vec![], length_m: 0.0 });
        }
        let tree = shortest_path_tree(network, from, Some(to));
        if tree.prev_edge[to.index()] == EdgeId::INVALID {
            return Err(StreetError::NoRoute { from, to });
        }
        Ok(tree.path_to(network, to))
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[inline]
fn edge_cost_mm(network: &StreetNetwork, edge: EdgeId) -> u64 {
    (network.edge_length_m[edge.index()].max(0.0) * 1000.0).round() as u64
}

struct ShortestPathTree {
    /// prev_edge[v] = edge that reached v; `EdgeId::INVALID` when unreached
    /// (and for the source).
    prev_edge: Vec<EdgeId>,
    reached:   Vec<bool>,
}

impl ShortestPathTree {
    fn path_to(&self, network: &StreetNetwork, to: NodeId) -> Path {
        let mut edges = Vec::new();
        let mut cur = to;
        loop {
            let e = self.prev_edge[cur.index()];
            if e == EdgeId::INVALID {
                break;
            }
            edges.push(e);
            cur = network.edge_from[e.index()];
        }
        edges.reverse();
        let length_m = edges.iter().map(|e| network.edge_length_m[e.index()]).sum();
        Path { edges, length_m }
    }

    /// Street length to `to`, or `None` if unreachable.
    fn length_to(&self, network: &StreetNetwork, to: NodeId) -> Option<f64> {
        self.reached[to.index()].then(|| self.path_to(network, to).length_m)
    }
}

/// Single-source Dijkstra; stops early once `target` is settled.
fn shortest_path_tree(network: &StreetNetwork, from: NodeId, target: Option<NodeId>) -> ShortestPathTree {
    let n = network.node_count();
    let mut dist = vec![u64::MAX; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut reached = vec![false; n];

    dist[from.index()] = 0;
    reached[from.index()] = true;

    // Secondary key NodeId makes tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if Some(node) == target {
            break;
        }
        if cost > dist[node.index()] {
            continue;
        }
        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost.saturating_add(edge_cost_mm(network, edge));
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                reached[neighbor.index()] = true;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    ShortestPathTree { prev_edge, reached }
}

// ── Distance matrix ───────────────────────────────────────────────────────────

/// Driving distances between every ordered pair of `points`, measured as
/// shortest street paths between their nearest nodes.
///
/// Entries are in metres, keyed by the given ids; every point is also paired
/// with itself at distance 0.  Fails with [`StreetError::NoRoute`] if any
/// pair is disconnected.
pub fn network_distance_matrix<S: AsRef<str>>(
    network: &StreetNetwork,
    points: &[(S, GeoPoint)],
) -> StreetResult<DistanceMatrix> {
    let snapped: Vec<(&str, NodeId)> = points
        .iter()
        .map(|(id, pos)| {
            network
                .snap_to_node(*pos)
                .map(|n| (id.as_ref(), n))
                .ok_or(StreetError::EmptyNetwork)
        })
        .collect::<StreetResult<_>>()?;

    let mut matrix = DistanceMatrix::new();
    for &(origin, from) in &snapped {
        let tree = shortest_path_tree(network, from, None);
        for &(destination, to) in &snapped {
            let meters = if origin == destination {
                0.0
            } else {
                tree.length_to(network, to).ok_or(StreetError::NoRoute { from, to })?
            };
            matrix.insert(origin, destination, meters)?;
        }
    }

    log::info!("derived {} matrix entries from street shortest paths", matrix.len());
    Ok(matrix)
}

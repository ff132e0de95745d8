//! Street network representation and builder.
//!
//! # Data layout
//!
//! Nodes are intersections (and dead ends); edges are **directed** street
//! segments.  A two-way street is stored as two edges.  Outgoing edges use
//! **Compressed Sparse Row (CSR)** layout: given a `NodeId n`, its edges
//! occupy
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edge arrays are sorted by source node and indexed by `EdgeId`.
//!
//! # Node attributes
//!
//! Every node carries a small string map.  Grouping (the neighbourhood a node
//! belongs to) is one such attribute, looked up by a key chosen at analysis
//! time.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`, used to
//! snap stops and query points onto the graph.

use std::collections::BTreeMap;

use geo::Contains;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use lmr_core::{EdgeId, GeoPoint, NodeId};

use crate::GroupPolygon;

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared planar distance in degrees; adequate for nearest-node queries
    /// at city scale.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── StreetNetwork ─────────────────────────────────────────────────────────────

/// Directed street graph in CSR format plus a spatial index.
///
/// Build with [`StreetNetworkBuilder`].
pub struct StreetNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    node_attrs: Vec<BTreeMap<String, String>>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    /// Street length in metres, which may exceed the straight-line distance
    /// between the endpoints.
    pub edge_length_m: Vec<f64>,

    spatial_idx: RTree<NodeEntry>,
}

impl StreetNetwork {
    pub fn empty() -> Self {
        StreetNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count()).map(|i| NodeId(i as u32))
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edge_count()).map(|i| EdgeId(i as u32))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Outgoing edges of `node`: a contiguous index range.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    #[inline]
    pub fn is_self_loop(&self, edge: EdgeId) -> bool {
        self.edge_from[edge.index()] == self.edge_to[edge.index()]
    }

    /// Straight-line (great-circle) distance between the edge's endpoints.
    pub fn edge_straight_m(&self, edge: EdgeId) -> f64 {
        let a = self.node_pos[self.edge_from[edge.index()].index()];
        let b = self.node_pos[self.edge_to[edge.index()].index()];
        a.distance_m(b)
    }

    /// Initial bearing from the edge's source to its target, in `[0, 360)`.
    pub fn edge_bearing_deg(&self, edge: EdgeId) -> f64 {
        let a = self.node_pos[self.edge_from[edge.index()].index()];
        let b = self.node_pos[self.edge_to[edge.index()].index()];
        a.bearing_deg(b)
    }

    // ── Attributes ────────────────────────────────────────────────────────

    pub fn node_attr(&self, node: NodeId, key: &str) -> Option<&str> {
        self.node_attrs[node.index()].get(key).map(String::as_str)
    }

    pub fn node_attrs(&self, node: NodeId) -> &BTreeMap<String, String> {
        &self.node_attrs[node.index()]
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos`; `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Up to `k` nearest nodes to `pos`, nearest first.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── StreetNetworkBuilder ──────────────────────────────────────────────────────

/// Construct a [`StreetNetwork`] incrementally, then call
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use lmr_core::GeoPoint;
/// use lmr_street::StreetNetworkBuilder;
///
/// let mut b = StreetNetworkBuilder::new();
/// let a = b.add_node_with_attrs(GeoPoint::new(40.0, -74.0), [("hood", "north")]);
/// let c = b.add_node_with_attrs(GeoPoint::new(40.001, -74.0), [("hood", "north")]);
/// b.add_street(a, c, 120.0);
/// let net = b.build();
/// assert_eq!(net.edge_count(), 2); // two-way
/// assert_eq!(net.node_attr(a, "hood"), Some("north"));
/// ```
pub struct StreetNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    attrs:     Vec<BTreeMap<String, String>>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: f64,
}

impl StreetNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), attrs: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            attrs:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node without attributes; ids are sequential from 0.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.attrs.push(BTreeMap::new());
        id
    }

    pub fn add_node_with_attrs<I, K, V>(&mut self, pos: GeoPoint, attrs: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let id = self.add_node(pos);
        self.attrs[id.index()].extend(attrs.into_iter().map(|(k, v)| (k.into(), v.into())));
        id
    }

    pub fn set_node_attr(&mut self, node: NodeId, key: impl Into<String>, value: impl Into<String>) {
        self.attrs[node.index()].insert(key.into(), value.into());
    }

    /// Add a one-way street segment from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) {
        self.raw_edges.push(RawEdge { from, to, length_m });
    }

    /// Add a two-way street: one edge in each direction.
    pub fn add_street(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        self.add_directed_edge(a, b, length_m);
        self.add_directed_edge(b, a, length_m);
    }

    /// Two-way street whose length is the great-circle distance between
    /// its endpoints.
    pub fn add_straight_street(&mut self, a: NodeId, b: NodeId) {
        let length_m = self.node_pos(a).distance_m(self.node_pos(b));
        self.add_street(a, b, length_m);
    }

    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Set attribute `key` on every node to the name of the first polygon
    /// containing it.  Returns the number of nodes no polygon contains;
    /// those keep whatever value they had before.
    pub fn assign_groups(&mut self, key: &str, polygons: &[GroupPolygon]) -> usize {
        let shapes: Vec<(&str, geo::Polygon<f64>)> = polygons
            .iter()
            .filter(|p| p.ring.len() >= 3)
            .map(|p| (p.name.as_str(), p.to_geo()))
            .collect();

        let mut untagged = 0;
        for (pos, attrs) in self.nodes.iter().zip(self.attrs.iter_mut()) {
            let pt = geo::Point::new(pos.lon, pos.lat);
            match shapes.iter().find(|(_, shape)| shape.contains(&pt)) {
                Some((name, _)) => {
                    attrs.insert(key.to_owned(), (*name).to_owned());
                }
                None => untagged += 1,
            }
        }
        if untagged > 0 {
            log::warn!("{untagged} of {} node(s) fall outside every {key:?} polygon", self.nodes.len());
        }
        untagged
    }

    /// Consume the builder and produce a [`StreetNetwork`].
    pub fn build(self) -> StreetNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort keeps insertion order among a node's edges.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: [pos.lat, pos.lon], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        log::debug!("built street network: {node_count} nodes, {edge_count} edges");

        StreetNetwork {
            node_pos: self.nodes,
            node_attrs: self.attrs,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            spatial_idx,
        }
    }
}

impl Default for StreetNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

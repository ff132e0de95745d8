//! Per-group street statistics with cached results.
//!
//! A [`Geometry`] partitions a [`StreetNetwork`] by the value of one node
//! attribute (the *group key*).  An edge belongs to a group only when both
//! of its endpoints do, so streets crossing a group boundary count towards
//! neither side.

use std::collections::BTreeMap;

use lmr_core::{GeoPoint, NodeId};

use crate::orientation::{OrientationConfig, OrientationStats};
use crate::stats::{self, BasicStats};
use crate::{GroupPolygon, StreetError, StreetNetwork, StreetResult};

pub struct Geometry {
    network:     StreetNetwork,
    group_key:   String,
    polygons:    BTreeMap<String, GroupPolygon>,
    orientation: OrientationConfig,

    // ── Caches (filled on first request, emptied by `clear_cache`) ────────
    basic_stats:        Option<BTreeMap<String, BasicStats>>,
    orientation_stats:  Option<BTreeMap<String, Option<OrientationStats>>>,
}

impl Geometry {
    /// `polygons` supply group areas; a group without a polygon gets `None`
    /// densities.
    pub fn new(network: StreetNetwork, group_key: impl Into<String>, polygons: Vec<GroupPolygon>) -> Self {
        Self {
            network,
            group_key: group_key.into(),
            polygons: polygons.into_iter().map(|p| (p.name.clone(), p)).collect(),
            orientation: OrientationConfig::default(),
            basic_stats: None,
            orientation_stats: None,
        }
    }

    pub fn with_orientation_config(mut self, config: OrientationConfig) -> Self {
        self.orientation = config;
        self
    }

    pub fn network(&self) -> &StreetNetwork {
        &self.network
    }

    pub fn group_key(&self) -> &str {
        &self.group_key
    }

    pub fn polygon(&self, group: &str) -> Option<&GroupPolygon> {
        self.polygons.get(group)
    }

    /// Group of the node nearest to `point`.
    pub fn group_at(&self, point: GeoPoint) -> Option<&str> {
        let node = self.network.snap_to_node(point)?;
        self.network.node_attr(node, &self.group_key)
    }

    /// Topology statistics per group, computed on first call.
    pub fn basic_stats(&mut self) -> StreetResult<&BTreeMap<String, BasicStats>> {
        let stats = match self.basic_stats.take() {
            Some(stats) => stats,
            None => self.compute_basic_stats()?,
        };
        Ok(self.basic_stats.insert(stats))
    }

    /// Bearing distribution per group, computed on first call.  Groups
    /// without any usable bearing map to `None`.
    pub fn street_orientation(&mut self) -> StreetResult<&BTreeMap<String, Option<OrientationStats>>> {
        let stats = match self.orientation_stats.take() {
            Some(stats) => stats,
            None => self.compute_orientation()?,
        };
        Ok(self.orientation_stats.insert(stats))
    }

    /// Forget cached statistics; the next request recomputes them.
    pub fn clear_cache(&mut self) {
        log::debug!("clearing cached street statistics for {:?}", self.group_key);
        self.basic_stats = None;
        self.orientation_stats = None;
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Membership mask per group name.
    fn partition(&self) -> StreetResult<BTreeMap<&str, Vec<bool>>> {
        let n = self.network.node_count();
        let mut groups: BTreeMap<&str, Vec<bool>> = BTreeMap::new();
        for node in self.network.nodes() {
            let group = self.group_of(node)?;
            groups.entry(group).or_insert_with(|| vec![false; n])[node.index()] = true;
        }
        Ok(groups)
    }

    fn group_of(&self, node: NodeId) -> StreetResult<&str> {
        self.network
            .node_attr(node, &self.group_key)
            .ok_or_else(|| StreetError::UngroupedGraph { node, key: self.group_key.clone() })
    }

    fn compute_basic_stats(&self) -> StreetResult<BTreeMap<String, BasicStats>> {
        let out: BTreeMap<String, BasicStats> = self
            .partition()?
            .into_iter()
            .map(|(group, members)| {
                let area = self.polygons.get(group).map(GroupPolygon::area_km2);
                (group.to_owned(), stats::compute(&self.network, &members, area))
            })
            .collect();
        log::debug!("computed basic stats for {} group(s)", out.len());
        Ok(out)
    }

    fn compute_orientation(&self) -> StreetResult<BTreeMap<String, Option<OrientationStats>>> {
        let net = &self.network;
        let out: BTreeMap<String, Option<OrientationStats>> = self
            .partition()?
            .into_iter()
            .map(|(group, members)| {
                let edges = net.edges().filter(|e| {
                    members[net.edge_from[e.index()].index()] && members[net.edge_to[e.index()].index()]
                });
                let stats = OrientationStats::from_edges(net, edges, &self.orientation);
                if stats.is_none() {
                    log::warn!("group {group:?} has no street with a usable bearing");
                }
                (group.to_owned(), stats)
            })
            .collect();
        log::debug!("computed street orientation for {} group(s)", out.len());
        Ok(out)
    }
}

//! Paths and their derived metrics.

use std::collections::{BTreeMap, HashMap};

use super::fare::FareOutcome;
use crate::graph::{Graph, Mode, NodeIndex};

/// An ordered node sequence through a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    nodes: Vec<NodeIndex>,
}

impl Path {
    pub fn new(nodes: Vec<NodeIndex>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<NodeIndex> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn origin(&self) -> Option<NodeIndex> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeIndex> {
        self.nodes.last().copied()
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.nodes.contains(&node)
    }

    /// True when every consecutive pair is joined by at least one edge.
    pub fn is_connected(&self, graph: &Graph) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().all(|&n| n < graph.node_count())
            && self.nodes.windows(2).all(|w| graph.has_edge(w[0], w[1]))
    }

    /// Drops every loop: revisiting a node truncates back to its first
    /// visit, so `A B C B D` becomes `A B D`.
    pub fn remove_cycles(&self) -> Path {
        let mut out: Vec<NodeIndex> = Vec::with_capacity(self.nodes.len());
        let mut position: HashMap<NodeIndex, usize> = HashMap::new();
        for &node in &self.nodes {
            if let Some(&at) = position.get(&node) {
                for dropped in out.drain(at + 1..) {
                    position.remove(&dropped);
                }
            } else {
                position.insert(node, out.len());
                out.push(node);
            }
        }
        Path::new(out)
    }

    /// String ids of the nodes, skipping indices unknown to `graph`.
    pub fn node_ids(&self, graph: &Graph) -> Vec<String> {
        self.nodes
            .iter()
            .filter_map(|&n| graph.node(n).map(|node| node.id.clone()))
            .collect()
    }
}

impl From<Vec<NodeIndex>> for Path {
    fn from(nodes: Vec<NodeIndex>) -> Self {
        Self::new(nodes)
    }
}

/// One leg of a path breakdown.
///
/// Wait segments start and end at the boarding node and have zero distance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub mode: Mode,
    pub route_id: Option<String>,
    pub trip_id: Option<String>,
    pub time_s: f64,
    pub distance_m: f64,
}

/// Aggregates of one path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathMetrics {
    /// Sum of every segment time, waits included.
    pub total_time_s: f64,
    /// In-vehicle time.
    pub travel_time_s: f64,
    pub waiting_time_s: f64,
    pub walking_time_s: f64,
    pub walking_distance_m: f64,
    pub transfer_time_s: f64,
    pub emissions_g: f64,
    pub transfers: usize,
    /// Distinct zone ids of transit edge endpoints in first-seen order.
    pub zones: Vec<String>,
    pub fare_cost: f64,
    pub fare: FareOutcome,
    pub segments: Vec<Segment>,
    pub waits_by_route: BTreeMap<String, f64>,
    pub distance_km_by_mode: BTreeMap<Mode, f64>,
}

impl Default for PathMetrics {
    fn default() -> Self {
        Self {
            total_time_s: 0.0,
            travel_time_s: 0.0,
            waiting_time_s: 0.0,
            walking_time_s: 0.0,
            walking_distance_m: 0.0,
            transfer_time_s: 0.0,
            emissions_g: 0.0,
            transfers: 0,
            zones: Vec::new(),
            fare_cost: 0.0,
            fare: FareOutcome::NotApplicable,
            segments: Vec::new(),
            waits_by_route: BTreeMap::new(),
            distance_km_by_mode: BTreeMap::new(),
        }
    }
}

impl PathMetrics {
    pub fn has_transit(&self) -> bool {
        self.segments.iter().any(|s| s.mode.is_transit())
    }

    pub fn has_walk(&self) -> bool {
        self.segments.iter().any(|s| s.mode == Mode::Walk)
    }

    /// Route ids ridden, in order of first boarding.
    pub fn routes(&self) -> Vec<&str> {
        let mut routes: Vec<&str> = Vec::new();
        for id in self
            .segments
            .iter()
            .filter(|s| s.mode.is_transit())
            .filter_map(|s| s.route_id.as_deref())
        {
            if !routes.contains(&id) {
                routes.push(id);
            }
        }
        routes
    }
}

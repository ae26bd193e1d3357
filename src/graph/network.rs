//! The multimodal graph.
//!
//! Nodes are stored densely; edges live in a node-pair → edge-list map so
//! that a transit edge and a walk edge (or several routes) can join the
//! same ordered pair. Successor lists are kept sorted so every traversal
//! visits neighbors in the same order on every run.

use std::collections::HashMap;

use super::bridges::{BridgeDecision, BridgeRules, WalkGate};
use super::config::GraphConfig;
use super::report::BuildReport;
use super::spatial::StopIndex;
use super::types::{Edge, EdgeKind, Mode, Node, NodeIndex};
use crate::error::{Result, RoutingError};
use crate::metrics::FareTable;

/// Multimodal transit graph.
///
/// Built once by [`GraphBuilder`](super::GraphBuilder) and then shared
/// read-only. Virtual points for arbitrary origins and destinations are
/// added on a private copy before the graph is handed to a search.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) node_lookup: HashMap<String, NodeIndex>,
    pub(crate) stop_index: StopIndex,
    pub(crate) edges: HashMap<(NodeIndex, NodeIndex), Vec<Edge>>,
    pub(crate) successors: Vec<Vec<NodeIndex>>,
    pub(crate) degree: Vec<usize>,
    /// Operator -> route id -> headway in seconds.
    pub(crate) headways: HashMap<String, HashMap<String, f64>>,
    pub(crate) fares: FareTable,
    pub(crate) bridges: BridgeRules,
    pub(crate) config: GraphConfig,
    pub(crate) report: BuildReport,
}

impl Graph {
    pub(crate) fn empty(config: GraphConfig, bridges: BridgeRules) -> Self {
        Self {
            nodes: Vec::new(),
            node_lookup: HashMap::new(),
            stop_index: StopIndex::default(),
            edges: HashMap::new(),
            successors: Vec::new(),
            degree: Vec::new(),
            headways: HashMap::new(),
            fares: FareTable::default(),
            bridges,
            config,
            report: BuildReport::default(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of directed edges, parallel edges included.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Looks a node up by its string id.
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_lookup.get(id).copied()
    }

    /// Like [`node_index`](Self::node_index) but with a typed error.
    pub fn require_node(&self, id: &str) -> Result<NodeIndex> {
        self.node_index(id)
            .ok_or_else(|| RoutingError::UnknownStop(id.to_string()))
    }

    /// All edges from `from` to `to`, in insertion order.
    pub fn edges_between(&self, from: NodeIndex, to: NodeIndex) -> &[Edge] {
        self.edges
            .get(&(from, to))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        !self.edges_between(from, to).is_empty()
    }

    /// Sorted, de-duplicated successor indices.
    pub fn successors(&self, node: NodeIndex) -> &[NodeIndex] {
        self.successors
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of edges touching the node in either direction.
    pub fn degree(&self, node: NodeIndex) -> usize {
        self.degree.get(node).copied().unwrap_or(0)
    }

    /// Estimated headway in seconds of an operator's route.
    pub fn headway(&self, operator: &str, route_id: &str) -> Option<f64> {
        self.headways.get(operator)?.get(route_id).copied()
    }

    /// Headway of the route a transit edge rides. The operator is the one
    /// of the edge's origin stop.
    pub fn edge_headway(&self, edge: &Edge) -> Option<f64> {
        let operator = self.nodes.get(edge.from)?.operator.as_deref()?;
        self.headway(operator, edge.route_id.as_deref()?)
    }

    pub fn fare_table(&self) -> &FareTable {
        &self.fares
    }

    pub fn bridge_rules(&self) -> &BridgeRules {
        &self.bridges
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Emissions in grams for traversing an edge.
    pub fn edge_emissions(&self, edge: &Edge) -> f64 {
        if !edge.is_transit() {
            return 0.0;
        }
        edge.distance_m / 1000.0 * self.config.emissions.factor(edge.mode)
    }

    /// Iterates over every edge in a deterministic order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.successors
            .iter()
            .enumerate()
            .flat_map(move |(from, succ)| {
                succ.iter()
                    .flat_map(move |&to| self.edges_between(from, to).iter())
            })
    }

    pub(crate) fn push_node(&mut self, mut node: Node) -> NodeIndex {
        let index = self.nodes.len();
        node.index = index;
        self.node_lookup.insert(node.id.clone(), index);
        self.nodes.push(node);
        self.successors.push(Vec::new());
        self.degree.push(0);
        index
    }

    /// Returns an id not yet used by any node, suffixing `_1`, `_2`, ...
    pub(crate) fn unique_id(&self, base: &str) -> String {
        if !self.node_lookup.contains_key(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.node_lookup.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) {
        let (from, to) = (edge.from, edge.to);
        match edge.kind {
            EdgeKind::Transit => self.report.transit_edges += 1,
            EdgeKind::Walk => self.report.walk_edges += 1,
            EdgeKind::Transfer => self.report.transfer_edges += 1,
        }
        self.edges.entry((from, to)).or_default().push(edge);
        let succ = &mut self.successors[from];
        if let Err(pos) = succ.binary_search(&to) {
            succ.insert(pos, to);
        }
        self.degree[from] += 1;
        self.degree[to] += 1;
    }

    /// Adds a bidirectional walk pair between two nodes unless the segment
    /// crosses the river without an allowed bridge.
    ///
    /// Crossing decisions are recorded in the build report. Returns whether
    /// the pair was added.
    pub(crate) fn link_walk(&mut self, a: NodeIndex, b: NodeIndex, distance_m: f64) -> bool {
        let pa = self.nodes[a].location;
        let pb = self.nodes[b].location;
        let bridge_id = match self.bridges.gate(&pa, &pb) {
            WalkGate::Open => None,
            WalkGate::Bridge(id) => {
                log::debug!("walk link {a} <-> {b} kept over bridge {id}");
                self.report.bridge_decisions.push(BridgeDecision {
                    from: a,
                    to: b,
                    bridge_id: Some(id.clone()),
                    kept: true,
                });
                Some(id)
            }
            WalkGate::Blocked(snapped) => {
                log::debug!("walk link {a} <-> {b} dropped at river crossing (bridge {snapped:?})");
                self.report.bridge_decisions.push(BridgeDecision {
                    from: a,
                    to: b,
                    bridge_id: snapped,
                    kept: false,
                });
                return false;
            }
        };

        let time_s = self.config.walk_time_s(distance_m);
        for (from, to) in [(a, b), (b, a)] {
            self.push_edge(Edge {
                from,
                to,
                kind: EdgeKind::Walk,
                mode: Mode::Walk,
                time_s,
                distance_m,
                route_id: None,
                trip_id: None,
                bridge_id: bridge_id.clone(),
            });
        }
        true
    }
}

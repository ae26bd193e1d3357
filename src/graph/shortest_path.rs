//! Single-source shortest paths under a caller-supplied edge cost.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::network::Graph;
use super::types::{Edge, NodeIndex};
use crate::error::{Result, RoutingError};
use crate::metrics::Path;

/// Heap entry ordered as a min-heap on cost, then on node index.
#[derive(Debug, Clone, Copy)]
struct State {
    cost: f64,
    node: NodeIndex,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl Graph {
    /// Dijkstra from `origin` to `destination`.
    ///
    /// The cost of moving between two nodes is the cheapest `cost(edge)`
    /// over their parallel edges; costs must be non-negative. Nodes with
    /// `avoid[node] == true` are never entered. Equal-cost frontiers are
    /// expanded in node index order, so the result is deterministic.
    pub fn shortest_path_with<F>(
        &self,
        origin: NodeIndex,
        destination: NodeIndex,
        avoid: Option<&[bool]>,
        mut cost: F,
    ) -> Option<Path>
    where
        F: FnMut(&Edge) -> f64,
    {
        let n = self.node_count();
        if origin >= n || destination >= n {
            return None;
        }
        let blocked = |node: NodeIndex| avoid.is_some_and(|mask| mask.get(node).copied().unwrap_or(false));

        let mut dist = vec![f64::INFINITY; n];
        let mut prev: Vec<Option<NodeIndex>> = vec![None; n];
        let mut heap = BinaryHeap::new();

        dist[origin] = 0.0;
        heap.push(State {
            cost: 0.0,
            node: origin,
        });

        while let Some(State { cost: d, node }) = heap.pop() {
            if node == destination {
                break;
            }
            if d > dist[node] {
                continue;
            }
            for &next in self.successors(node) {
                if blocked(next) {
                    continue;
                }
                let step = self
                    .edges_between(node, next)
                    .iter()
                    .map(&mut cost)
                    .fold(f64::INFINITY, f64::min);
                let candidate = d + step;
                if candidate < dist[next] {
                    dist[next] = candidate;
                    prev[next] = Some(node);
                    heap.push(State {
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }

        if !dist[destination].is_finite() {
            return None;
        }

        let mut nodes = vec![destination];
        let mut current = destination;
        while let Some(p) = prev[current] {
            nodes.push(p);
            current = p;
        }
        nodes.reverse();
        Some(Path::new(nodes))
    }

    /// Minimum-time path.
    ///
    /// # Errors
    ///
    /// [`RoutingError::UnknownNode`] for an out-of-range index and
    /// [`RoutingError::Unreachable`] when no path exists.
    pub fn fastest_path(&self, origin: NodeIndex, destination: NodeIndex) -> Result<Path> {
        for node in [origin, destination] {
            if node >= self.node_count() {
                return Err(RoutingError::UnknownNode(node));
            }
        }
        self.shortest_path_with(origin, destination, None, |edge| edge.time_s)
            .ok_or(RoutingError::Unreachable {
                origin,
                destination,
            })
    }

    /// True when `destination` can be reached from `origin`.
    pub fn is_reachable(&self, origin: NodeIndex, destination: NodeIndex) -> bool {
        self.shortest_path_with(origin, destination, None, |_| 0.0)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::graph::bridges::BridgeRules;
    use crate::graph::config::GraphConfig;
    use crate::graph::types::{EdgeKind, Mode, Node, NodeKind};

    fn diamond() -> Graph {
        // 0 -> 1 -> 3 (10 + 10), 0 -> 2 -> 3 (5 + 20), 0 -> 3 walk 100
        let mut g = Graph::empty(GraphConfig::default(), BridgeRules::default());
        for i in 0..4 {
            g.push_node(Node {
                index: 0,
                id: format!("N{i}"),
                kind: NodeKind::Stop,
                location: GeoPoint::new(41.15 + i as f64 * 0.001, -8.61),
                zone_id: None,
                name: None,
                operator: None,
                mode: None,
            });
        }
        for (from, to, t) in [(0, 1, 10.0), (1, 3, 10.0), (0, 2, 5.0), (2, 3, 20.0), (0, 3, 100.0)] {
            g.push_edge(Edge {
                from,
                to,
                kind: EdgeKind::Transit,
                mode: Mode::Bus,
                time_s: t,
                distance_m: t * 10.0,
                route_id: Some("r".into()),
                trip_id: None,
                bridge_id: None,
            });
        }
        g
    }

    #[test]
    fn test_fastest_path() {
        let g = diamond();
        assert_eq!(g.fastest_path(0, 3).unwrap().nodes(), &[0, 1, 3]);
    }

    #[test]
    fn test_avoid_mask() {
        let g = diamond();
        let avoid = [false, true, false, false];
        let path = g
            .shortest_path_with(0, 3, Some(&avoid), |e| e.time_s)
            .unwrap();
        assert_eq!(path.nodes(), &[0, 2, 3]);
    }

    #[test]
    fn test_custom_cost() {
        let g = diamond();
        let path = g.shortest_path_with(0, 3, None, |_| 1.0).unwrap();
        assert_eq!(path.nodes(), &[0, 3]);
    }

    #[test]
    fn test_unreachable() {
        let g = diamond();
        assert_eq!(
            g.fastest_path(3, 0).unwrap_err(),
            RoutingError::Unreachable {
                origin: 3,
                destination: 0
            }
        );
        assert!(!g.is_reachable(3, 0));
        assert!(matches!(
            g.fastest_path(0, 9),
            Err(RoutingError::UnknownNode(9))
        ));
    }

    #[test]
    fn test_equal_costs_prefer_lower_index() {
        let g = diamond();
        // Every hop costs 0: the direct edge is relaxed first and never
        // improved upon.
        let path = g.shortest_path_with(0, 3, None, |_| 0.0).unwrap();
        assert_eq!(path.nodes(), &[0, 3]);
    }
}

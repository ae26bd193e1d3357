//! Path variation operators.
//!
//! Every operator keeps paths edge-backed: children are spliced at nodes
//! both parents visit, and regenerated tails come from a shortest-path
//! query on the graph itself.
//!
//! - [`random_path`]: Dijkstra on randomly perturbed edge times
//! - [`splice_crossover`]: exchange tails at a shared interior node
//! - [`regenerate_tail`]: keep a prefix, re-route the rest

use std::collections::HashMap;

use rand::Rng;

use crate::graph::{Graph, NodeIndex};
use crate::metrics::Path;

/// Shortest path under edge times scaled by independent factors drawn
/// from `[1 - perturbation, 1 + perturbation]`.
///
/// Nodes flagged in `avoid` are never entered. Returns `None` when the
/// destination cannot be reached.
pub fn random_path<R: Rng>(
    graph: &Graph,
    origin: NodeIndex,
    destination: NodeIndex,
    avoid: Option<&[bool]>,
    perturbation: f64,
    rng: &mut R,
) -> Option<Path> {
    let low = 1.0 - perturbation;
    let high = 1.0 + perturbation;
    graph.shortest_path_with(origin, destination, avoid, |edge| {
        edge.time_s * rng.random_range(low..=high)
    })
}

/// Splices two parents at a random interior node they share.
///
/// With cut node `x` at position `i` in `a` and `j` in `b`, the children
/// are `a[..i] + b[j..]` and `b[..j] + a[i..]`, each with cycles removed.
/// Returns `None` when the parents share no interior node.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use u_multimodal::metrics::Path;
/// use u_multimodal::search::splice_crossover;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let a = Path::new(vec![0, 1, 2, 5]);
/// let b = Path::new(vec![0, 3, 2, 4, 5]);
///
/// let (c1, c2) = splice_crossover(&a, &b, &mut rng).unwrap();
/// assert_eq!(c1.nodes(), &[0, 1, 2, 4, 5]);
/// assert_eq!(c2.nodes(), &[0, 3, 2, 5]);
/// ```
pub fn splice_crossover<R: Rng>(a: &Path, b: &Path, rng: &mut R) -> Option<(Path, Path)> {
    let interior_b: HashMap<NodeIndex, usize> = interior(b)
        .iter()
        .enumerate()
        .rev()
        .map(|(k, &node)| (node, k + 1))
        .collect();

    let shared: Vec<(usize, usize)> = interior(a)
        .iter()
        .enumerate()
        .filter_map(|(k, node)| interior_b.get(node).map(|&j| (k + 1, j)))
        .collect();
    if shared.is_empty() {
        return None;
    }

    let (i, j) = shared[rng.random_range(0..shared.len())];
    let (a, b) = (a.nodes(), b.nodes());
    let child1: Vec<NodeIndex> = a[..i].iter().chain(&b[j..]).copied().collect();
    let child2: Vec<NodeIndex> = b[..j].iter().chain(&a[i..]).copied().collect();
    Some((
        Path::new(child1).remove_cycles(),
        Path::new(child2).remove_cycles(),
    ))
}

/// Keeps the path up to a random interior node and re-routes from there
/// with [`random_path`], never re-entering the kept prefix.
///
/// Each attempt draws a fresh cut. Returns `None` once `max_attempts`
/// attempts found no way through. Paths without an interior node are
/// returned unchanged.
pub fn regenerate_tail<R: Rng>(
    graph: &Graph,
    path: &Path,
    max_attempts: usize,
    perturbation: f64,
    rng: &mut R,
) -> Option<Path> {
    let nodes = path.nodes();
    if nodes.len() < 3 {
        return Some(path.clone());
    }
    let destination = nodes[nodes.len() - 1];

    for _ in 0..max_attempts {
        let cut = rng.random_range(1..nodes.len() - 1);
        let mut avoid = vec![false; graph.node_count()];
        for &node in &nodes[..cut] {
            if let Some(flag) = avoid.get_mut(node) {
                *flag = true;
            }
        }

        if let Some(tail) = random_path(graph, nodes[cut], destination, Some(&avoid), perturbation, rng) {
            let spliced: Vec<NodeIndex> = nodes[..cut]
                .iter()
                .copied()
                .chain(tail.into_nodes())
                .collect();
            return Some(Path::new(spliced));
        }
    }
    None
}

fn interior(path: &Path) -> &[NodeIndex] {
    let nodes = path.nodes();
    if nodes.len() < 3 {
        &[]
    } else {
        &nodes[1..nodes.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, GraphConfig};
    use crate::random::create_rng;
    use crate::schedule::{ScheduleData, StopRecord, StopTimeRecord, TripRecord};

    /// Two bus corridors from A to D, via B or via C, plus a B-C link.
    /// Stops are far enough apart that no walk edges form.
    fn ladder() -> Graph {
        let mut data = ScheduleData::default();
        data.stops = vec![
            StopRecord::new("A", "STCP", 41.10, -8.60),
            StopRecord::new("B", "STCP", 41.12, -8.58),
            StopRecord::new("C", "STCP", 41.12, -8.62),
            StopRecord::new("D", "STCP", 41.14, -8.60),
        ];
        data.trips = vec![
            TripRecord::new("t1", "1", "STCP"),
            TripRecord::new("t2", "2", "STCP"),
            TripRecord::new("t3", "3", "STCP"),
        ];
        data.stop_times = vec![
            StopTimeRecord::new("STCP", "t1", "A", 1, Some(0), Some(0)),
            StopTimeRecord::new("STCP", "t1", "B", 2, Some(300), Some(300)),
            StopTimeRecord::new("STCP", "t1", "D", 3, Some(600), Some(600)),
            StopTimeRecord::new("STCP", "t2", "A", 1, Some(0), Some(0)),
            StopTimeRecord::new("STCP", "t2", "C", 2, Some(300), Some(300)),
            StopTimeRecord::new("STCP", "t2", "D", 3, Some(600), Some(600)),
            StopTimeRecord::new("STCP", "t3", "B", 1, Some(0), Some(0)),
            StopTimeRecord::new("STCP", "t3", "C", 2, Some(200), Some(200)),
        ];
        GraphBuilder::new(GraphConfig::default()).build(&data).unwrap()
    }

    // ---- random_path ----

    #[test]
    fn test_random_path_is_connected() {
        let g = ladder();
        let mut rng = create_rng(3);
        for _ in 0..20 {
            let p = random_path(&g, 0, 3, None, 0.5, &mut rng).unwrap();
            assert!(p.is_connected(&g));
            assert_eq!(p.origin(), Some(0));
            assert_eq!(p.destination(), Some(3));
        }
    }

    #[test]
    fn test_random_path_explores_both_corridors() {
        let g = ladder();
        let mut rng = create_rng(11);
        let mut via_b = false;
        let mut via_c = false;
        for _ in 0..100 {
            let p = random_path(&g, 0, 3, None, 0.5, &mut rng).unwrap();
            via_b |= p.nodes() == [0, 1, 3];
            via_c |= p.nodes() == [0, 2, 3];
        }
        assert!(via_b && via_c);
    }

    #[test]
    fn test_random_path_zero_perturbation_is_fastest() {
        let g = ladder();
        let mut rng = create_rng(5);
        let p = random_path(&g, 0, 3, None, 0.0, &mut rng).unwrap();
        assert_eq!(p, g.fastest_path(0, 3).unwrap());
    }

    #[test]
    fn test_random_path_respects_avoid() {
        let g = ladder();
        let mut rng = create_rng(5);
        let avoid = [false, true, false, false];
        for _ in 0..20 {
            let p = random_path(&g, 0, 3, Some(&avoid), 0.5, &mut rng).unwrap();
            assert!(!p.contains(1));
        }
    }

    // ---- crossover ----

    #[test]
    fn test_crossover_needs_shared_interior() {
        let mut rng = create_rng(1);
        let a = Path::new(vec![0, 1, 3]);
        let b = Path::new(vec![0, 2, 3]);
        assert!(splice_crossover(&a, &b, &mut rng).is_none());
    }

    #[test]
    fn test_crossover_children_stay_connected() {
        let g = ladder();
        let mut rng = create_rng(9);
        let a = Path::new(vec![0, 1, 3]);
        let b = Path::new(vec![0, 1, 2, 3]);
        for _ in 0..10 {
            let (c1, c2) = splice_crossover(&a, &b, &mut rng).unwrap();
            assert!(c1.is_connected(&g));
            assert!(c2.is_connected(&g));
            assert_eq!(c1, Path::new(vec![0, 1, 2, 3]));
            assert_eq!(c2, Path::new(vec![0, 1, 3]));
        }
    }

    #[test]
    fn test_crossover_removes_cycles() {
        let mut rng = create_rng(2);
        // Shared interior nodes: 1 and 2. Cutting at 2 revisits 1 in child 1.
        let a = Path::new(vec![0, 1, 2, 9]);
        let b = Path::new(vec![0, 2, 1, 8, 9]);
        for _ in 0..10 {
            let (c1, c2) = splice_crossover(&a, &b, &mut rng).unwrap();
            for child in [c1, c2] {
                let mut seen = std::collections::HashSet::new();
                assert!(child.nodes().iter().all(|n| seen.insert(*n)));
                assert_eq!(child.origin(), Some(0));
                assert_eq!(child.destination(), Some(9));
            }
        }
    }

    // ---- mutation ----

    #[test]
    fn test_regenerate_keeps_prefix_and_endpoints() {
        let g = ladder();
        let mut rng = create_rng(4);
        let parent = Path::new(vec![0, 1, 2, 3]);
        for _ in 0..20 {
            let child = regenerate_tail(&g, &parent, 8, 0.5, &mut rng).unwrap();
            assert!(child.is_connected(&g));
            assert_eq!(child.origin(), Some(0));
            assert_eq!(child.destination(), Some(3));
            assert_eq!(child.nodes()[1], 1);
        }
    }

    #[test]
    fn test_regenerate_short_path_unchanged() {
        let g = ladder();
        let mut rng = create_rng(4);
        let p = Path::new(vec![0, 3]);
        assert_eq!(regenerate_tail(&g, &p, 8, 0.5, &mut rng), Some(p));
    }

    #[test]
    fn test_regenerate_gives_up_after_budget() {
        let g = ladder();
        let mut rng = create_rng(4);
        // Every cut lands on a node with no route to A.
        let p = Path::new(vec![3, 1, 2, 0]);
        assert_eq!(regenerate_tail(&g, &p, 3, 0.5, &mut rng), None);
    }
}

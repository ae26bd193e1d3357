//! Spatial queries: nearest stops, virtual points, name lookup.

use rstar::primitives::GeomWithData;
use rstar::RTree;

use super::network::Graph;
use super::types::{Node, NodeIndex, NodeKind};
use crate::error::{Result, RoutingError};
use crate::geo::GeoPoint;

/// Slightly under the true length of a degree of latitude.
const METERS_PER_DEG_LAT: f64 = 111_000.0;

type IndexedStop = GeomWithData<[f64; 2], NodeIndex>;

/// R-tree over stop coordinates projected to a flat metric frame.
///
/// Longitude is scaled by the cosine of the highest absolute latitude in
/// the set, so planar distances never overstate great-circle ones. Callers
/// refine candidates with the haversine distance.
#[derive(Debug, Clone)]
pub(crate) struct StopIndex {
    max_abs_lat: f64,
    meters_per_deg_lon: f64,
    tree: RTree<IndexedStop>,
}

impl Default for StopIndex {
    fn default() -> Self {
        Self {
            max_abs_lat: 0.0,
            meters_per_deg_lon: METERS_PER_DEG_LAT,
            tree: RTree::new(),
        }
    }
}

impl StopIndex {
    pub(crate) fn new(stops: &[(NodeIndex, GeoPoint)]) -> Self {
        let max_abs_lat = stops.iter().map(|(_, p)| p.lat.abs()).fold(0.0, f64::max);
        let meters_per_deg_lon = METERS_PER_DEG_LAT * max_abs_lat.to_radians().cos().max(1e-6);
        let items: Vec<IndexedStop> = stops
            .iter()
            .map(|&(node, p)| GeomWithData::new(project(&p, meters_per_deg_lon), node))
            .collect();
        Self {
            max_abs_lat,
            meters_per_deg_lon,
            tree: RTree::bulk_load(items),
        }
    }

    /// Every stop within `radius_m` of `p`, plus possibly a few just beyond.
    pub(crate) fn candidates(&self, p: &GeoPoint, radius_m: f64) -> Vec<NodeIndex> {
        // A query poleward of every stop sees shorter longitude degrees.
        let cap = p.lat.abs().max(self.max_abs_lat).min(89.9);
        let stretch = self.max_abs_lat.to_radians().cos() / cap.to_radians().cos();
        let r = radius_m * stretch.max(1.0);
        self.tree
            .locate_within_distance(project(p, self.meters_per_deg_lon), r * r)
            .map(|item| item.data)
            .collect()
    }
}

fn project(p: &GeoPoint, meters_per_deg_lon: f64) -> [f64; 2] {
    [p.lon * meters_per_deg_lon, p.lat * METERS_PER_DEG_LAT]
}

/// One result of [`Graph::search_stops_by_name`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopMatch {
    pub node: NodeIndex,
    pub id: String,
    pub name: String,
    /// Whole-name match, as opposed to a substring match.
    pub exact: bool,
    pub degree: usize,
}

impl Graph {
    /// Up to `k` stop nodes within `radius_m` of `point`.
    ///
    /// Ordered by distance, ties broken by ascending node id. Virtual nodes
    /// are never returned.
    pub fn nearest_stops(&self, point: &GeoPoint, radius_m: f64, k: usize) -> Vec<(NodeIndex, f64)> {
        let mut found: Vec<(&Node, f64)> = self
            .stop_index
            .candidates(point, radius_m)
            .into_iter()
            .map(|i| &self.nodes[i])
            .filter(|node| node.kind == NodeKind::Stop)
            .map(|node| (node, point.distance_m(&node.location)))
            .filter(|&(_, d)| d <= radius_m)
            .collect();
        found.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));
        found.truncate(k);
        found.into_iter().map(|(node, d)| (node.index, d)).collect()
    }

    /// Anchors an arbitrary coordinate as a virtual node.
    ///
    /// The node is linked by walk pairs to the `k` nearest stops within
    /// `radius_m`; river crossings follow the bridge rules. `id` is made
    /// unique by suffixing `_1`, `_2`, ... if it is already taken.
    ///
    /// # Errors
    ///
    /// [`RoutingError::InvalidConfig`] when `k` is zero,
    /// [`RoutingError::NoStopsNearPoint`] when no stop lies within the
    /// radius and [`RoutingError::AccessBlocked`] when every candidate lies
    /// across the river. The graph is left untouched on error.
    pub fn add_virtual_point(
        &mut self,
        id: &str,
        point: GeoPoint,
        radius_m: f64,
        k: usize,
    ) -> Result<NodeIndex> {
        if k == 0 {
            return Err(RoutingError::InvalidConfig(
                "virtual point needs at least one neighbor".into(),
            ));
        }
        let neighbors = self.nearest_stops(&point, radius_m, k);
        if neighbors.is_empty() {
            return Err(RoutingError::NoStopsNearPoint {
                lat: point.lat,
                lon: point.lon,
                radius_m,
            });
        }
        let walkable = neighbors
            .iter()
            .any(|&(stop, _)| self.bridges.gate(&point, &self.nodes[stop].location).is_walkable());
        if !walkable {
            return Err(RoutingError::AccessBlocked {
                lat: point.lat,
                lon: point.lon,
                blocked: neighbors.len(),
            });
        }

        let index = self.push_node(Node {
            index: 0,
            id: self.unique_id(id),
            kind: NodeKind::Virtual,
            location: point,
            zone_id: None,
            name: None,
            operator: None,
            mode: None,
        });

        let linked = neighbors
            .into_iter()
            .filter(|&(stop, d)| self.link_walk(index, stop, d))
            .count();
        log::debug!("virtual point '{}' linked to {linked} stops", self.nodes[index].id);

        Ok(index)
    }

    /// [`add_virtual_point`](Self::add_virtual_point) with the access radius
    /// and neighbor count of the graph configuration.
    pub fn anchor_point(&mut self, id: &str, point: GeoPoint) -> Result<NodeIndex> {
        let (radius, k) = (self.config.access_radius_m, self.config.access_neighbors);
        self.add_virtual_point(id, point, radius, k)
    }

    /// Adds a direct walk pair between two existing nodes.
    ///
    /// Refused when the walk would exceed `max_walk_s` or crosses the river
    /// without an allowed bridge. Returns whether the pair was added.
    pub fn add_direct_walk_edge(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        max_walk_s: Option<f64>,
    ) -> Result<bool> {
        if a >= self.node_count() {
            return Err(RoutingError::UnknownNode(a));
        }
        if b >= self.node_count() {
            return Err(RoutingError::UnknownNode(b));
        }
        if a == b {
            return Ok(false);
        }

        let distance_m = self.nodes[a].location.distance_m(&self.nodes[b].location);
        if max_walk_s.is_some_and(|max| self.config.walk_time_s(distance_m) > max) {
            return Ok(false);
        }
        Ok(self.link_walk(a, b, distance_m))
    }

    /// Stops whose name matches `query`, case-insensitively.
    ///
    /// Ordering: exact matches before substring matches, metro before bus,
    /// higher degree first, then name, then node id.
    pub fn search_stops_by_name(&self, query: &str, max_results: Option<usize>) -> Vec<StopMatch> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<(u8, StopMatch)> = self
            .nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Stop)
            .filter_map(|node| {
                let name = node.name.as_deref()?;
                let lowered = name.to_lowercase();
                let exact = lowered == q;
                if !exact && !lowered.contains(&q) {
                    return None;
                }
                let mode_priority = node.mode.map_or(2, |m| m.priority());
                Some((
                    mode_priority,
                    StopMatch {
                        node: node.index,
                        id: node.id.clone(),
                        name: name.to_string(),
                        exact,
                        degree: self.degree(node.index),
                    },
                ))
            })
            .collect();

        ranked.sort_by(|(pa, a), (pb, b)| {
            b.exact
                .cmp(&a.exact)
                .then(pa.cmp(pb))
                .then(b.degree.cmp(&a.degree))
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });

        let limit = max_results.unwrap_or(ranked.len());
        ranked.into_iter().take(limit).map(|(_, m)| m).collect()
    }
}

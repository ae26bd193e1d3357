//! Per-path metrics.

use std::collections::BTreeSet;

use super::fare::FareOutcome;
use super::types::{Path, PathMetrics, Segment};
use crate::error::{Result, RoutingError};
use crate::graph::{Edge, EdgeKind, Graph, Mode};

/// `(mode, route id)` of a ride.
type RideKey = (Mode, Option<String>);

/// Picks the edge to traverse between two nodes: the one continuing the
/// active ride if any, otherwise the fastest (first on ties).
fn choose_edge<'g>(edges: &'g [Edge], active: Option<&RideKey>) -> Option<&'g Edge> {
    if let Some((mode, route)) = active {
        let continuing = edges
            .iter()
            .find(|e| e.ride_key() == Some((*mode, route.as_deref())));
        if continuing.is_some() {
            return continuing;
        }
    }
    edges.iter().min_by(|a, b| a.time_s.total_cmp(&b.time_s))
}

/// Computes the metrics of `path`.
///
/// Each maximal run of transit edges on the same `(mode, route id)` is one
/// ride. A ride on a route with a known headway is preceded by a wait
/// segment of half the headway. A new ride on a different key than the
/// previous ride counts as a transfer, as does every transfer edge; the
/// ride right after a transfer edge is not counted again.
///
/// # Errors
///
/// [`RoutingError::UnknownNode`] for an index outside the graph and
/// [`RoutingError::Disconnected`] when two consecutive nodes share no edge.
///
/// # Examples
///
/// ```
/// use u_multimodal::graph::{GraphBuilder, GraphConfig};
/// use u_multimodal::metrics::{path_metrics, Path};
/// use u_multimodal::schedule::{ScheduleData, StopRecord};
///
/// let mut data = ScheduleData::default();
/// data.stops.push(StopRecord::new("A", "METRO", 41.150, -8.610));
/// data.stops.push(StopRecord::new("B", "METRO", 41.151, -8.610));
/// let graph = GraphBuilder::new(GraphConfig::default()).build(&data).unwrap();
///
/// let m = path_metrics(&graph, &Path::new(vec![0, 1])).unwrap();
/// assert_eq!(m.emissions_g, 0.0);
/// assert!(m.walking_distance_m > 100.0);
/// ```
pub fn path_metrics(graph: &Graph, path: &Path) -> Result<PathMetrics> {
    if let Some(&bad) = path.nodes().iter().find(|&&n| n >= graph.node_count()) {
        return Err(RoutingError::UnknownNode(bad));
    }

    let mut m = PathMetrics::default();
    let mut routes_used: BTreeSet<String> = BTreeSet::new();
    let mut active: Option<RideKey> = None;
    let mut previous_ride: Option<RideKey> = None;
    let mut after_transfer_edge = false;

    for pair in path.nodes().windows(2) {
        let (u, v) = (pair[0], pair[1]);
        let edge = choose_edge(graph.edges_between(u, v), active.as_ref())
            .ok_or(RoutingError::Disconnected { from: u, to: v })?;

        match edge.kind {
            EdgeKind::Transit => {
                let key: RideKey = (edge.mode, edge.route_id.clone());
                if active.as_ref() != Some(&key) {
                    if let Some(headway) = graph.edge_headway(edge) {
                        let wait_s = 0.5 * headway;
                        m.waiting_time_s += wait_s;
                        *m.waits_by_route
                            .entry(edge.route_id.clone().unwrap_or_default())
                            .or_insert(0.0) += wait_s;
                        m.segments.push(Segment {
                            from: u,
                            to: u,
                            mode: Mode::Wait,
                            route_id: edge.route_id.clone(),
                            trip_id: None,
                            time_s: wait_s,
                            distance_m: 0.0,
                        });
                    }
                    if !after_transfer_edge && previous_ride.as_ref().is_some_and(|p| *p != key) {
                        m.transfers += 1;
                    }
                    after_transfer_edge = false;
                    active = Some(key.clone());
                }

                m.travel_time_s += edge.time_s;
                m.emissions_g += graph.edge_emissions(edge);
                *m.distance_km_by_mode.entry(edge.mode).or_insert(0.0) += edge.distance_m / 1000.0;
                if let Some(route) = &edge.route_id {
                    routes_used.insert(route.clone());
                }
                for node in [u, v] {
                    if let Some(zone) = graph.node(node).and_then(|n| n.zone_id.as_ref()) {
                        if !m.zones.contains(zone) {
                            m.zones.push(zone.clone());
                        }
                    }
                }
                previous_ride = Some(key);
            }
            EdgeKind::Walk => {
                m.walking_time_s += edge.time_s;
                m.walking_distance_m += edge.distance_m;
                *m.distance_km_by_mode.entry(Mode::Walk).or_insert(0.0) += edge.distance_m / 1000.0;
                active = None;
            }
            EdgeKind::Transfer => {
                m.transfer_time_s += edge.time_s;
                m.transfers += 1;
                after_transfer_edge = true;
                active = None;
            }
        }

        m.segments.push(Segment {
            from: u,
            to: v,
            mode: edge.mode,
            route_id: edge.route_id.clone(),
            trip_id: edge.trip_id.clone(),
            time_s: edge.time_s,
            distance_m: edge.distance_m,
        });
    }

    m.total_time_s = m.segments.iter().map(|s| s.time_s).sum();

    if m.has_transit() {
        m.fare = graph.fare_table().estimate(&routes_used, &m.zones);
        m.fare_cost = m.fare.cost();
    } else {
        m.fare = FareOutcome::NotApplicable;
        m.fare_cost = 0.0;
    }

    Ok(m)
}

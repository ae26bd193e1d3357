//! Graph construction from schedule records.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::bridges::BridgeRules;
use super::config::GraphConfig;
use super::network::Graph;
use super::report::ScheduleIssue;
use super::spatial::StopIndex;
use super::types::{Edge, EdgeKind, Mode, Node, NodeIndex, NodeKind, TransitMode};
use crate::error::{Result, RoutingError};
use crate::metrics::FareTable;
use crate::schedule::{running_time, ScheduleData, StopTimeRecord, Timestamp, TripRecord};

/// Builds a [`Graph`] from one schedule snapshot.
///
/// # Examples
///
/// ```
/// use u_multimodal::graph::{GraphBuilder, GraphConfig};
/// use u_multimodal::schedule::{ScheduleData, StopRecord};
///
/// let mut data = ScheduleData::default();
/// data.stops.push(StopRecord::new("A", "METRO", 41.150, -8.610));
/// data.stops.push(StopRecord::new("B", "METRO", 41.151, -8.610));
///
/// let graph = GraphBuilder::new(GraphConfig::default()).build(&data).unwrap();
/// assert_eq!(graph.node_count(), 2);
/// // The stops are ~111 m apart, so a walk pair links them.
/// assert!(graph.has_edge(0, 1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: GraphConfig,
    bridges: BridgeRules,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            bridges: BridgeRules::default(),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Sets the river boundary and bridge rules used to gate walk edges.
    pub fn with_bridge_rules(mut self, bridges: BridgeRules) -> Self {
        self.bridges = bridges;
        self
    }

    /// Builds the graph.
    ///
    /// Malformed rows are skipped and recorded in the [`BuildReport`](super::BuildReport).
    ///
    /// # Errors
    ///
    /// [`RoutingError::InvalidConfig`] for an invalid configuration and
    /// [`RoutingError::EmptyGraph`] when no stop survives validation.
    pub fn build(&self, data: &ScheduleData) -> Result<Graph> {
        self.config.validate()?;

        let mut graph = Graph::empty(self.config.clone(), self.bridges.clone());

        add_stops(&mut graph, data);
        if graph.node_count() == 0 {
            return Err(RoutingError::EmptyGraph);
        }
        let stops: Vec<_> = graph.nodes.iter().map(|n| (n.index, n.location)).collect();
        graph.stop_index = StopIndex::new(&stops);

        let trips: HashMap<ScopedId<'_>, &TripRecord> = data
            .trips
            .iter()
            .map(|trip| ((trip.operator.as_str(), trip.trip_id.as_str()), trip))
            .collect();

        let first_departures = add_transit_edges(&mut graph, data, &trips);
        add_transfer_edges(&mut graph, data);
        add_walk_edges(&mut graph);
        graph.headways = estimate_headways(&mut graph, data, &trips, first_departures);
        graph.fares = build_fare_table(&mut graph, data);

        let report = &graph.report;
        log::info!(
            "built graph: {} nodes, {} transit / {} walk / {} transfer edges, {} rows skipped, {} walk links blocked",
            graph.node_count(),
            report.transit_edges,
            report.walk_edges,
            report.transfer_edges,
            report.issues.len(),
            report.blocked_walk_links(),
        );

        Ok(graph)
    }
}

/// `(operator, id)` of a trip or route. Feed ids are only unique within
/// one operator.
type ScopedId<'a> = (&'a str, &'a str);

/// Node id of a stop.
pub(crate) fn stop_node_id(operator: &str, stop_id: &str) -> String {
    format!("{operator}_{stop_id}")
}

fn add_stops(graph: &mut Graph, data: &ScheduleData) {
    for stop in &data.stops {
        if !stop.location.is_valid() {
            graph.report.skip(ScheduleIssue::InvalidCoordinates {
                operator: stop.operator.clone(),
                stop_id: stop.stop_id.clone(),
            });
            continue;
        }

        let id = stop_node_id(&stop.operator, &stop.stop_id);
        if graph.node_index(&id).is_some() {
            graph.report.skip(ScheduleIssue::DuplicateStop {
                operator: stop.operator.clone(),
                stop_id: stop.stop_id.clone(),
            });
            continue;
        }

        graph.push_node(Node {
            index: 0,
            id,
            kind: NodeKind::Stop,
            location: stop.location,
            zone_id: stop.zone_id.clone(),
            name: stop.name.clone(),
            operator: Some(stop.operator.clone()),
            mode: Some(TransitMode::from_operator(&stop.operator)),
        });
    }
}

/// Adds one transit edge per (from, to, route). Trips are visited in
/// ascending trip id order so the smallest trip id serving a pair wins.
///
/// Returns the first-stop departure of every trip, grouped by
/// `(operator, route id)`.
fn add_transit_edges<'a>(
    graph: &mut Graph,
    data: &'a ScheduleData,
    trips: &HashMap<ScopedId<'a>, &'a TripRecord>,
) -> BTreeMap<ScopedId<'a>, Vec<Timestamp>> {
    let route_modes: HashMap<ScopedId<'_>, TransitMode> = data
        .routes
        .iter()
        .filter_map(|route| {
            let mode = TransitMode::from_route_type(route.route_type?)?;
            Some(((route.operator.as_str(), route.route_id.as_str()), mode))
        })
        .collect();

    let mut by_trip: BTreeMap<ScopedId<'_>, Vec<&StopTimeRecord>> = BTreeMap::new();
    for st in &data.stop_times {
        by_trip
            .entry((st.operator.as_str(), st.trip_id.as_str()))
            .or_default()
            .push(st);
    }

    let mut seen: HashSet<(NodeIndex, NodeIndex, String)> = HashSet::new();
    let mut first_departures: BTreeMap<ScopedId<'a>, Vec<Timestamp>> = BTreeMap::new();

    for ((operator, trip_id), mut stop_times) in by_trip {
        let Some(&trip) = trips.get(&(operator, trip_id)) else {
            graph.report.skip(ScheduleIssue::UnknownTrip {
                operator: operator.to_string(),
                trip_id: trip_id.to_string(),
            });
            continue;
        };
        let route_key = (trip.operator.as_str(), trip.route_id.as_str());
        stop_times.sort_by_key(|st| st.stop_sequence);

        if let Some(dep) = stop_times
            .first()
            .and_then(|st| st.departure_time.or(st.arrival_time))
        {
            first_departures.entry(route_key).or_default().push(dep);
        }

        let mut resolved: Vec<Option<NodeIndex>> = Vec::with_capacity(stop_times.len());
        for st in &stop_times {
            let index = graph.node_index(&stop_node_id(&trip.operator, &st.stop_id));
            if index.is_none() {
                graph.report.skip(ScheduleIssue::UnknownStop {
                    operator: operator.to_string(),
                    trip_id: trip_id.to_string(),
                    stop_id: st.stop_id.clone(),
                });
            }
            resolved.push(index);
        }

        for i in 1..stop_times.len() {
            let (Some(from), Some(to)) = (resolved[i - 1], resolved[i]) else {
                continue;
            };
            if from == to || !seen.insert((from, to, trip.route_id.clone())) {
                continue;
            }

            let prev = stop_times[i - 1];
            let curr = stop_times[i];
            let mode = route_modes
                .get(&route_key)
                .copied()
                .or(graph.nodes[from].mode)
                .unwrap_or_else(|| TransitMode::from_operator(&trip.operator));
            let distance_m = graph.nodes[from]
                .location
                .distance_m(&graph.nodes[to].location);
            let time_s = running_time(
                prev.departure_time.or(prev.arrival_time),
                curr.arrival_time.or(curr.departure_time),
            )
            .unwrap_or_else(|| (distance_m / graph.config.fallback_speed_m_s(mode)).max(1.0));

            graph.push_edge(Edge {
                from,
                to,
                kind: EdgeKind::Transit,
                mode: mode.into(),
                time_s,
                distance_m,
                route_id: Some(trip.route_id.clone()),
                trip_id: Some(trip.trip_id.clone()),
                bridge_id: None,
            });
        }
    }

    first_departures
}

fn add_transfer_edges(graph: &mut Graph, data: &ScheduleData) {
    for transfer in &data.transfers {
        if transfer.transfer_type == Some(3) {
            log::debug!(
                "transfer {} -> {} marked not possible",
                transfer.from_stop_id,
                transfer.to_stop_id
            );
            continue;
        }

        let from = graph.node_index(&stop_node_id(&transfer.operator, &transfer.from_stop_id));
        let to = graph.node_index(&stop_node_id(&transfer.operator, &transfer.to_stop_id));
        let (Some(from), Some(to)) = (from, to) else {
            graph.report.skip(ScheduleIssue::UnknownTransferStop {
                operator: transfer.operator.clone(),
                from_stop_id: transfer.from_stop_id.clone(),
                to_stop_id: transfer.to_stop_id.clone(),
            });
            continue;
        };

        let time_s = match transfer.min_transfer_time {
            Some(t) if !t.is_finite() || t < 0.0 => {
                graph.report.skip(ScheduleIssue::InvalidTransferTime {
                    from_stop_id: transfer.from_stop_id.clone(),
                    to_stop_id: transfer.to_stop_id.clone(),
                });
                continue;
            }
            Some(t) => t,
            None => 0.0,
        };
        if from == to {
            continue;
        }

        let distance_m = graph.nodes[from]
            .location
            .distance_m(&graph.nodes[to].location);
        graph.push_edge(Edge {
            from,
            to,
            kind: EdgeKind::Transfer,
            mode: Mode::Transfer,
            time_s,
            distance_m,
            route_id: None,
            trip_id: None,
            bridge_id: None,
        });
    }
}

fn add_walk_edges(graph: &mut Graph) {
    let radius = graph.config.walk_radius_m;
    if radius <= 0.0 {
        return;
    }

    let points: Vec<_> = graph.nodes.iter().map(|n| n.location).collect();

    for a in 0..points.len() {
        let mut pairs: Vec<(NodeIndex, f64)> = graph
            .stop_index
            .candidates(&points[a], radius)
            .into_iter()
            .filter(|&b| b > a)
            .filter_map(|b| {
                let d = points[a].distance_m(&points[b]);
                (d <= radius).then_some((b, d))
            })
            .collect();
        pairs.sort_by_key(|&(b, _)| b);

        for (b, d) in pairs {
            graph.link_walk(a, b, d);
        }
    }
}

/// Mean frequency headway per `(operator, route id)`, falling back to the
/// mean gap between successive first-stop departures.
fn estimate_headways(
    graph: &mut Graph,
    data: &ScheduleData,
    trips: &HashMap<ScopedId<'_>, &TripRecord>,
    first_departures: BTreeMap<ScopedId<'_>, Vec<Timestamp>>,
) -> HashMap<String, HashMap<String, f64>> {
    let mut from_frequencies: BTreeMap<ScopedId<'_>, (f64, usize)> = BTreeMap::new();
    for freq in &data.frequencies {
        let Some(&trip) = trips.get(&(freq.operator.as_str(), freq.trip_id.as_str())) else {
            graph.report.skip(ScheduleIssue::UnknownTrip {
                operator: freq.operator.clone(),
                trip_id: freq.trip_id.clone(),
            });
            continue;
        };
        if !freq.headway_secs.is_finite() || freq.headway_secs <= 0.0 {
            graph.report.skip(ScheduleIssue::InvalidHeadway {
                operator: freq.operator.clone(),
                trip_id: freq.trip_id.clone(),
            });
            continue;
        }
        let entry = from_frequencies
            .entry((trip.operator.as_str(), trip.route_id.as_str()))
            .or_insert((0.0, 0));
        entry.0 += freq.headway_secs;
        entry.1 += 1;
    }

    let mut headways: HashMap<ScopedId<'_>, f64> = from_frequencies
        .into_iter()
        .map(|(route, (sum, n))| (route, sum / n as f64))
        .collect();

    for (route, mut departures) in first_departures {
        if headways.contains_key(&route) || departures.len() < 2 {
            continue;
        }
        departures.sort_unstable();
        let span = (departures[departures.len() - 1] - departures[0]) as f64;
        let mean_gap = span / (departures.len() - 1) as f64;
        if mean_gap > 0.0 {
            headways.insert(route, mean_gap);
        }
    }

    let mut by_operator: HashMap<String, HashMap<String, f64>> = HashMap::new();
    for ((operator, route), headway) in headways {
        by_operator
            .entry(operator.to_string())
            .or_default()
            .insert(route.to_string(), headway);
    }
    by_operator
}

fn build_fare_table(graph: &mut Graph, data: &ScheduleData) -> FareTable {
    let mut attributes = Vec::with_capacity(data.fare_attributes.len());
    for attr in &data.fare_attributes {
        if !attr.price.is_finite() || attr.price < 0.0 {
            graph.report.skip(ScheduleIssue::InvalidFarePrice {
                fare_id: attr.fare_id.clone(),
            });
            continue;
        }
        attributes.push(attr.clone());
    }
    FareTable::new(attributes, data.fare_rules.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::graph::bridges::{BridgeRule, RiverBoundary};
    use crate::schedule::{
        FareAttribute, FrequencyRecord, RouteRecord, StopRecord, StopTimeRecord, TransferRecord,
    };

    fn line_data() -> ScheduleData {
        let mut data = ScheduleData::default();
        data.stops = vec![
            StopRecord::new("A", "STCP", 41.150, -8.610).with_zone("Z1"),
            StopRecord::new("B", "STCP", 41.160, -8.610).with_zone("Z1"),
            StopRecord::new("C", "STCP", 41.170, -8.610).with_zone("Z2"),
        ];
        data.routes = vec![RouteRecord::new("200", "STCP", 3)];
        data.trips = vec![
            TripRecord::new("t2", "200", "STCP"),
            TripRecord::new("t1", "200", "STCP"),
        ];
        for (trip, base) in [("t1", 28_800), ("t2", 30_600)] {
            data.stop_times.push(StopTimeRecord::new("STCP", trip, "A", 1, Some(base), Some(base)));
            data.stop_times.push(StopTimeRecord::new("STCP", trip, "B", 2, Some(base + 120), Some(base + 130)));
            data.stop_times.push(StopTimeRecord::new("STCP", trip, "C", 3, Some(base + 300), Some(base + 300)));
        }
        data
    }

    // ---- nodes ----

    #[test]
    fn test_node_ids_use_operator_prefix() {
        let graph = GraphBuilder::default().build(&line_data()).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.node_index("STCP_A"), Some(0));
        let b = graph.node(1).unwrap();
        assert_eq!(b.zone_id.as_deref(), Some("Z1"));
        assert_eq!(b.mode, Some(TransitMode::Bus));
    }

    #[test]
    fn test_invalid_and_duplicate_stops_skipped() {
        let mut data = line_data();
        data.stops.push(StopRecord::new("X", "STCP", f64::NAN, -8.6));
        data.stops.push(StopRecord::new("A", "STCP", 41.0, -8.6));
        let graph = GraphBuilder::default().build(&data).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.report().issues.len(), 2);
    }

    #[test]
    fn test_empty_graph_is_fatal() {
        let mut data = ScheduleData::default();
        data.stops.push(StopRecord::new("X", "STCP", f64::NAN, 0.0));
        assert_eq!(
            GraphBuilder::default().build(&data).unwrap_err(),
            RoutingError::EmptyGraph
        );
    }

    // ---- transit edges ----

    #[test]
    fn test_transit_edge_from_smallest_trip() {
        let graph = GraphBuilder::default().build(&line_data()).unwrap();
        let edges = graph.edges_between(0, 1);
        let transit: Vec<_> = edges.iter().filter(|e| e.is_transit()).collect();
        assert_eq!(transit.len(), 1);
        assert_eq!(transit[0].trip_id.as_deref(), Some("t1"));
        assert_eq!(transit[0].time_s, 120.0);
        assert_eq!(transit[0].mode, Mode::Bus);
        // B departs at +130, C arrives at +300.
        let bc = &graph.edges_between(1, 2)[0];
        assert_eq!(bc.time_s, 170.0);
    }

    #[test]
    fn test_missing_times_use_fallback_speed() {
        let mut data = line_data();
        for st in &mut data.stop_times {
            st.arrival_time = None;
            st.departure_time = None;
        }
        let graph = GraphBuilder::default().build(&data).unwrap();
        let edge = &graph.edges_between(0, 1)[0];
        let expected = edge.distance_m / (30.0 * 1000.0 / 3600.0);
        assert!((edge.time_s - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_trip_and_stop_recorded() {
        let mut data = line_data();
        data.stop_times.push(StopTimeRecord::new("STCP", "ghost", "A", 1, None, None));
        data.stop_times.push(StopTimeRecord::new("STCP", "t1", "Q", 4, None, None));
        let graph = GraphBuilder::default().build(&data).unwrap();
        let issues = &graph.report().issues;
        assert!(issues.contains(&ScheduleIssue::UnknownTrip {
            operator: "STCP".into(),
            trip_id: "ghost".into()
        }));
        assert!(issues.contains(&ScheduleIssue::UnknownStop {
            operator: "STCP".into(),
            trip_id: "t1".into(),
            stop_id: "Q".into()
        }));
    }

    #[test]
    fn test_trip_and_route_ids_scoped_by_operator() {
        let mut data = ScheduleData::default();
        data.stops = vec![
            StopRecord::new("A", "STCP", 41.150, -8.610),
            StopRecord::new("B", "STCP", 41.160, -8.610),
            StopRecord::new("X", "METRO", 41.150, -8.580),
            StopRecord::new("Y", "METRO", 41.160, -8.580),
        ];
        data.routes = vec![
            RouteRecord::new("1", "STCP", 3),
            RouteRecord::new("1", "METRO", 1),
        ];
        data.trips = vec![
            TripRecord::new("1", "1", "STCP"),
            TripRecord::new("1", "1", "METRO"),
        ];
        data.stop_times = vec![
            StopTimeRecord::new("STCP", "1", "A", 1, Some(100), Some(100)),
            StopTimeRecord::new("STCP", "1", "B", 2, Some(400), Some(400)),
            StopTimeRecord::new("METRO", "1", "X", 1, Some(200), Some(200)),
            StopTimeRecord::new("METRO", "1", "Y", 2, Some(320), Some(320)),
        ];
        data.frequencies = vec![FrequencyRecord::new("METRO", "1", 300.0)];

        let graph = GraphBuilder::default().build(&data).unwrap();
        assert!(graph.report().issues.is_empty());
        assert_eq!(graph.report().transit_edges, 2);

        let ab = &graph.edges_between(0, 1)[0];
        assert_eq!(ab.mode, Mode::Bus);
        assert_eq!(ab.time_s, 300.0);
        let xy = &graph.edges_between(2, 3)[0];
        assert_eq!(xy.mode, Mode::Metro);
        assert_eq!(xy.time_s, 120.0);

        assert_eq!(graph.headway("METRO", "1"), Some(300.0));
        assert_eq!(graph.headway("STCP", "1"), None);
        assert_eq!(graph.edge_headway(xy), Some(300.0));
        assert_eq!(graph.edge_headway(ab), None);
    }

    // ---- transfers ----

    #[test]
    fn test_transfer_type_three_skipped() {
        let mut data = line_data();
        data.transfers.push(TransferRecord {
            operator: "STCP".into(),
            from_stop_id: "A".into(),
            to_stop_id: "C".into(),
            transfer_type: Some(3),
            min_transfer_time: Some(60.0),
        });
        data.transfers.push(TransferRecord {
            operator: "STCP".into(),
            from_stop_id: "C".into(),
            to_stop_id: "A".into(),
            transfer_type: Some(2),
            min_transfer_time: Some(60.0),
        });
        let graph = GraphBuilder::default().build(&data).unwrap();
        assert!(!graph.has_edge(0, 2));
        let edge = &graph.edges_between(2, 0)[0];
        assert_eq!(edge.kind, EdgeKind::Transfer);
        assert_eq!(edge.time_s, 60.0);
    }

    // ---- walk edges ----

    #[test]
    fn test_walk_edges_respect_radius() {
        let graph = GraphBuilder::default().build(&line_data()).unwrap();
        // Stops are ~1.1 km apart: no walking.
        assert_eq!(graph.report().walk_edges, 0);

        let config = GraphConfig::default().with_walk_radius_m(1200.0);
        let graph = GraphBuilder::new(config).build(&line_data()).unwrap();
        assert_eq!(graph.report().walk_edges, 4);
        assert!(graph
            .edges_between(1, 0)
            .iter()
            .any(|e| e.kind == EdgeKind::Walk));
    }

    #[test]
    fn test_river_blocks_walk_without_bridge() {
        let mut data = ScheduleData::default();
        data.stops = vec![
            StopRecord::new("N", "STCP", 41.1415, -8.61),
            StopRecord::new("S", "STCP", 41.1385, -8.61),
        ];
        let river = RiverBoundary::new(vec![
            GeoPoint::new(41.14, -8.70),
            GeoPoint::new(41.14, -8.50),
        ]);

        let blocked = GraphBuilder::default()
            .with_bridge_rules(BridgeRules::new(river.clone(), vec![]))
            .build(&data)
            .unwrap();
        assert_eq!(blocked.report().walk_edges, 0);
        assert_eq!(blocked.report().blocked_walk_links(), 1);

        let bridge = BridgeRule::new("ponte", true, GeoPoint::new(41.14, -8.6102), 100.0);
        let open = GraphBuilder::default()
            .with_bridge_rules(BridgeRules::new(river, vec![bridge]))
            .build(&data)
            .unwrap();
        let edge = &open.edges_between(0, 1)[0];
        assert_eq!(edge.bridge_id.as_deref(), Some("ponte"));
    }

    // ---- headways & fares ----

    #[test]
    fn test_headway_from_departures() {
        let graph = GraphBuilder::default().build(&line_data()).unwrap();
        assert_eq!(graph.headway("STCP", "200"), Some(1800.0));
        assert_eq!(graph.headway("METRO", "200"), None);
    }

    #[test]
    fn test_headway_prefers_frequencies() {
        let mut data = line_data();
        data.frequencies = vec![
            FrequencyRecord::new("STCP", "t1", 600.0),
            FrequencyRecord::new("STCP", "t2", 900.0),
            FrequencyRecord::new("STCP", "t1", -5.0),
        ];
        let graph = GraphBuilder::default().build(&data).unwrap();
        assert_eq!(graph.headway("STCP", "200"), Some(750.0));
        assert_eq!(graph.report().issues.len(), 1);
    }

    #[test]
    fn test_frequency_of_other_operator_not_applied() {
        let mut data = line_data();
        data.frequencies = vec![FrequencyRecord::new("METRO", "t1", 60.0)];
        let graph = GraphBuilder::default().build(&data).unwrap();
        assert_eq!(graph.headway("STCP", "200"), Some(1800.0));
        assert_eq!(
            graph.report().issues,
            vec![ScheduleIssue::UnknownTrip {
                operator: "METRO".into(),
                trip_id: "t1".into()
            }]
        );
    }

    #[test]
    fn test_invalid_fare_price_skipped() {
        let mut data = line_data();
        data.fare_attributes = vec![
            FareAttribute {
                fare_id: "Z2".into(),
                price: 1.8,
                currency: "EUR".into(),
            },
            FareAttribute {
                fare_id: "Z3".into(),
                price: f64::NAN,
                currency: "EUR".into(),
            },
        ];
        let graph = GraphBuilder::default().build(&data).unwrap();
        assert_eq!(graph.fare_table().tiers().len(), 1);
        assert_eq!(
            graph.report().issues,
            vec![ScheduleIssue::InvalidFarePrice {
                fare_id: "Z3".into()
            }]
        );
    }
}

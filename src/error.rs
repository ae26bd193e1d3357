//! Error taxonomy for graph construction, metrics and search.
//!
//! Only failures the caller must act on are errors. Malformed schedule rows
//! are recorded as [`ScheduleIssue`](crate::graph::ScheduleIssue)s in the
//! build report, constraint violations become penalty vectors, and
//! unresolvable fares are carried as
//! [`FareOutcome::Unresolved`](crate::metrics::FareOutcome::Unresolved).

use crate::graph::NodeIndex;

/// Errors surfaced by the routing core.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// The schedule data produced no usable stop.
    #[error("graph has no valid stops")]
    EmptyGraph,

    /// A node index outside the graph was referenced.
    #[error("unknown node index {0}")]
    UnknownNode(NodeIndex),

    /// A node id (e.g. `METRO_12`) does not exist in the graph.
    #[error("unknown node id '{0}'")]
    UnknownStop(String),

    /// No stop lies within the search radius of a point.
    #[error("no stop within {radius_m} m of ({lat}, {lon})")]
    NoStopsNearPoint { lat: f64, lon: f64, radius_m: f64 },

    /// Two consecutive path nodes are not joined by any edge.
    #[error("path is disconnected between nodes {from} and {to}")]
    Disconnected { from: NodeIndex, to: NodeIndex },

    /// No path exists between origin and destination.
    #[error("no path found from node {origin} to node {destination}")]
    Unreachable {
        origin: NodeIndex,
        destination: NodeIndex,
    },

    /// Every stop near a point is only reachable across the river.
    #[error("all {blocked} stops near ({lat}, {lon}) are across the river without a bridge")]
    AccessBlocked { lat: f64, lon: f64, blocked: usize },

    /// A path with no nodes.
    #[error("path is empty")]
    EmptyPath,

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RoutingError>;

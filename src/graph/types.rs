//! Node and edge types of the multimodal graph.

use crate::geo::GeoPoint;

/// Dense index of a node inside a [`Graph`](super::Graph).
pub type NodeIndex = usize;

/// Transit mode of a stop or a transit edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitMode {
    /// Metro, light rail and tram.
    Metro,
    /// Bus and everything else road-based.
    Bus,
}

impl TransitMode {
    /// Mode implied by an operator prefix (`METRO` → metro, anything else → bus).
    pub fn from_operator(operator: &str) -> Self {
        let op = operator.to_ascii_lowercase();
        if op.contains("metro") || op.contains("subway") || op.contains("tram") {
            TransitMode::Metro
        } else {
            TransitMode::Bus
        }
    }

    /// Mode implied by a GTFS `route_type`, if it is one we classify.
    pub fn from_route_type(route_type: u16) -> Option<Self> {
        match route_type {
            0 | 1 | 2 | 5 | 7 | 12 => Some(TransitMode::Metro),
            3 | 11 => Some(TransitMode::Bus),
            _ => None,
        }
    }

    /// Priority used when ranking stops (metro first).
    pub(crate) fn priority(self) -> u8 {
        match self {
            TransitMode::Metro => 0,
            TransitMode::Bus => 1,
        }
    }
}

/// Mode of a traversed edge or metrics segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    Metro,
    Bus,
    Walk,
    Transfer,
    /// Synthetic waiting segment inserted before boarding.
    Wait,
}

impl Mode {
    pub fn is_transit(self) -> bool {
        matches!(self, Mode::Metro | Mode::Bus)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Metro => "metro",
            Mode::Bus => "bus",
            Mode::Walk => "walk",
            Mode::Transfer => "transfer",
            Mode::Wait => "wait",
        }
    }
}

impl From<TransitMode> for Mode {
    fn from(mode: TransitMode) -> Self {
        match mode {
            TransitMode::Metro => Mode::Metro,
            TransitMode::Bus => Mode::Bus,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a node is a real stop or an anchor for an arbitrary coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Stop,
    Virtual,
}

/// A graph node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub index: NodeIndex,
    /// `"{operator}_{stop_id}"` for stops; caller-chosen for virtual nodes.
    pub id: String,
    pub kind: NodeKind,
    pub location: GeoPoint,
    /// Always `None` for virtual nodes.
    pub zone_id: Option<String>,
    pub name: Option<String>,
    pub operator: Option<String>,
    pub mode: Option<TransitMode>,
}

impl Node {
    pub fn is_virtual(&self) -> bool {
        self.kind == NodeKind::Virtual
    }
}

/// Edge category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeKind {
    Transit,
    Walk,
    Transfer,
}

/// A directed edge. Several edges may join the same ordered node pair.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub kind: EdgeKind,
    pub mode: Mode,
    /// Seconds, never negative.
    pub time_s: f64,
    pub distance_m: f64,
    pub route_id: Option<String>,
    pub trip_id: Option<String>,
    /// Set on walk edges that were kept because they snap to an allowed bridge.
    pub bridge_id: Option<String>,
}

impl Edge {
    pub fn is_transit(&self) -> bool {
        self.kind == EdgeKind::Transit
    }

    /// The `(mode, route id)` key identifying the ride this edge belongs to.
    pub fn ride_key(&self) -> Option<(Mode, Option<&str>)> {
        self.is_transit()
            .then(|| (self.mode, self.route_id.as_deref()))
    }
}

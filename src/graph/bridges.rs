//! River-crossing rules for walk edges.
//!
//! A walk edge whose straight segment crosses the river boundary is only
//! walkable over a bridge. The edge snaps to the bridge whose midpoint is
//! closest to the walk segment, provided that distance is within the
//! bridge's snap radius; the edge survives only if that bridge allows
//! pedestrians.

use super::types::NodeIndex;
use crate::geo::{point_to_segment_distance_m, segments_intersect, GeoPoint};

/// Pedestrian rule and crossing geometry of one bridge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BridgeRule {
    pub id: String,
    pub name: Option<String>,
    /// Whether pedestrians may cross.
    pub allowed: bool,
    pub midpoint: GeoPoint,
    pub snap_radius_m: f64,
}

impl BridgeRule {
    pub fn new(id: &str, allowed: bool, midpoint: GeoPoint, snap_radius_m: f64) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            allowed,
            midpoint,
            snap_radius_m,
        }
    }
}

/// Polyline approximating the river centre line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiverBoundary {
    pub line: Vec<GeoPoint>,
}

impl RiverBoundary {
    pub fn new(line: Vec<GeoPoint>) -> Self {
        Self { line }
    }

    /// True when the segment `a`–`b` crosses any piece of the boundary.
    pub fn is_crossed_by(&self, a: &GeoPoint, b: &GeoPoint) -> bool {
        self.line
            .windows(2)
            .any(|w| segments_intersect(a, b, &w[0], &w[1]))
    }
}

/// Outcome of gating one walk segment.
#[derive(Debug, Clone, PartialEq)]
pub enum WalkGate {
    /// The segment does not cross the river.
    Open,
    /// Crosses over an allowed bridge.
    Bridge(String),
    /// Crosses without an allowed bridge; the optional id is the bridge it
    /// snapped to, if any.
    Blocked(Option<String>),
}

impl WalkGate {
    pub fn is_walkable(&self) -> bool {
        !matches!(self, WalkGate::Blocked(_))
    }
}

/// Logged decision for one river-crossing walk edge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BridgeDecision {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub bridge_id: Option<String>,
    pub kept: bool,
}

/// The bridge rule set together with the river it applies to.
///
/// Without a river boundary nothing is ever considered a crossing.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BridgeRules {
    pub river: Option<RiverBoundary>,
    pub bridges: Vec<BridgeRule>,
}

impl BridgeRules {
    pub fn new(river: RiverBoundary, bridges: Vec<BridgeRule>) -> Self {
        Self {
            river: Some(river),
            bridges,
        }
    }

    /// Bridge nearest to the segment within its snap radius.
    pub fn snap(&self, a: &GeoPoint, b: &GeoPoint) -> Option<&BridgeRule> {
        self.bridges
            .iter()
            .filter(|bridge| bridge.snap_radius_m > 0.0)
            .map(|bridge| (bridge, point_to_segment_distance_m(&bridge.midpoint, a, b)))
            .filter(|(bridge, d)| *d <= bridge.snap_radius_m)
            .min_by(|x, y| x.1.total_cmp(&y.1).then_with(|| x.0.id.cmp(&y.0.id)))
            .map(|(bridge, _)| bridge)
    }

    /// Classifies a walk segment.
    pub fn gate(&self, a: &GeoPoint, b: &GeoPoint) -> WalkGate {
        let crosses = self
            .river
            .as_ref()
            .is_some_and(|river| river.is_crossed_by(a, b));
        if !crosses {
            return WalkGate::Open;
        }
        match self.snap(a, b) {
            Some(bridge) if bridge.allowed => WalkGate::Bridge(bridge.id.clone()),
            Some(bridge) => WalkGate::Blocked(Some(bridge.id.clone())),
            None => WalkGate::Blocked(None),
        }
    }
}

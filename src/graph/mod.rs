//! Multimodal transit graph.
//!
//! Stops become nodes; consecutive stop times become transit edges;
//! transfer rows become transfer edges; stops within walking distance are
//! linked by walk pairs unless the walk would cross the river away from a
//! pedestrian bridge. Parallel edges between the same node pair are kept.
//!
//! # Submodules
//!
//! - [`types`]: nodes, edges and modes
//! - [`config`]: build constants and emission factors
//! - [`bridges`]: river-crossing rules for walk edges
//! - [`builder`]: construction from [`ScheduleData`](crate::schedule::ScheduleData)
//! - [`cache`]: caller-owned cache keyed by snapshot and build constants

pub mod bridges;
pub mod builder;
pub mod cache;
pub mod config;
mod network;
mod report;
mod shortest_path;
mod spatial;
pub mod types;

pub use bridges::{BridgeDecision, BridgeRule, BridgeRules, RiverBoundary, WalkGate};
pub use builder::GraphBuilder;
pub use cache::{GraphCache, GraphKey};
pub use config::{EmissionFactors, GraphConfig};
pub use network::Graph;
pub use report::{BuildReport, ScheduleIssue};
pub use spatial::StopMatch;
pub use types::{Edge, EdgeKind, Mode, Node, NodeIndex, NodeKind, TransitMode};

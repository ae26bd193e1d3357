//! Path metrics: time, emissions, walking, transfers, zones and fares.
//!
//! [`path_metrics`] is the single entry point. It never consults anything
//! but the graph and the path, so the same input always yields the same
//! [`PathMetrics`].

mod engine;
mod fare;
mod types;

pub use engine::path_metrics;
pub use fare::{FareOutcome, FareProvenance, FareTable, FareTier, SelectedFare};
pub use types::{Path, PathMetrics, Segment};

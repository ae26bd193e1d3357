//! Multi-objective routing over multimodal transit networks.
//!
//! Finds Pareto-optimal routes trading travel time against CO₂ emissions,
//! optionally also walking distance and fare, between two points of a
//! network built from schedule data.
//!
//! - **Graph**: stops, scheduled transit edges, transfers and walk links,
//!   with river-crossing walk links gated by bridge rules.
//! - **Metrics**: per-path time, waiting, walking, emissions, transfers,
//!   zones and fare, broken into segments.
//! - **Fitness**: path → minimization vector, with hard limits mapped to a
//!   penalty vector.
//! - **Search**: NSGA-II over connected node sequences, seeded from the
//!   weighted-sum baseline.
//! - **Baseline**: deterministic λ sweep of blended shortest paths.
//! - **Pareto**: dominance, filtering and 2D hypervolume for comparing fronts.
//!
//! # Example
//!
//! ```
//! use u_multimodal::baseline::{BaselineConfig, BaselineRunner};
//! use u_multimodal::graph::{GraphBuilder, GraphConfig};
//! use u_multimodal::pareto::{compare_fronts, DEFAULT_MARGIN};
//! use u_multimodal::schedule::{ScheduleData, StopRecord};
//! use u_multimodal::search::{SearchConfig, SearchRunner};
//!
//! let mut data = ScheduleData::default();
//! data.stops.push(StopRecord::new("A", "METRO", 41.150, -8.610));
//! data.stops.push(StopRecord::new("B", "METRO", 41.151, -8.610));
//! let graph = GraphBuilder::new(GraphConfig::default()).build(&data).unwrap();
//!
//! let baseline = BaselineRunner::run(&graph, 0, 1, &BaselineConfig::default()).unwrap();
//! let search = SearchRunner::run(&graph, 0, 1, &SearchConfig::fast().with_seed(1)).unwrap();
//!
//! let baseline_points: Vec<[f64; 2]> = baseline.iter().map(|s| s.point()).collect();
//! let cmp = compare_fronts(&baseline_points, &search.points(), DEFAULT_MARGIN);
//! assert_eq!(cmp.baseline_dominated, 0);
//! ```

pub mod baseline;
pub mod error;
pub mod fitness;
pub mod geo;
pub mod graph;
pub mod metrics;
pub mod pareto;
pub mod random;
pub mod schedule;
pub mod search;

//! Path → objective vector.

use super::config::{ObjectiveConfig, WalkPolicy};
use crate::error::RoutingError;
use crate::graph::Graph;
use crate::metrics::{path_metrics, Path, PathMetrics};

/// Value of every objective of an infeasible or invalid path.
///
/// Far above any real time, emission, distance or fare, so a penalized
/// vector is dominated by every feasible one.
pub const PENALTY: f64 = 1e9;

/// Why a path received the penalty vector, if it did.
#[derive(Debug, Clone, PartialEq)]
pub enum Feasibility {
    Feasible,
    WalkLimitExceeded { walk_s: f64, limit_s: f64 },
    TransferLimitExceeded { transfers: usize, limit: usize },
    /// The path is empty, disconnected or references unknown nodes.
    Invalid(RoutingError),
}

impl Feasibility {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Feasibility::Feasible)
    }
}

/// Full outcome of evaluating one path.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub objectives: Vec<f64>,
    /// `None` only for invalid paths.
    pub metrics: Option<PathMetrics>,
    pub feasibility: Feasibility,
}

impl Assessment {
    pub fn is_penalized(&self) -> bool {
        !self.feasibility.is_feasible()
    }
}

/// Maps paths to objective vectors under one [`ObjectiveConfig`].
///
/// Evaluation never fails: constraint violations and broken paths yield
/// the penalty vector. It only reads the graph, so one evaluator can be
/// shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'g> {
    graph: &'g Graph,
    config: &'g ObjectiveConfig,
}

impl<'g> Evaluator<'g> {
    pub fn new(graph: &'g Graph, config: &'g ObjectiveConfig) -> Self {
        Self { graph, config }
    }

    pub fn config(&self) -> &ObjectiveConfig {
        self.config
    }

    pub fn penalty_vector(&self) -> Vec<f64> {
        vec![PENALTY; self.config.objective_count()]
    }

    /// Objective vector of `path`.
    pub fn evaluate(&self, path: &Path) -> Vec<f64> {
        self.assess(path).objectives
    }

    /// Objective vector together with the metrics and feasibility verdict.
    pub fn assess(&self, path: &Path) -> Assessment {
        if path.is_empty() {
            return self.invalid(RoutingError::EmptyPath);
        }
        let metrics = match path_metrics(self.graph, path) {
            Ok(metrics) => metrics,
            Err(err) => return self.invalid(err),
        };

        let feasibility = self.check_constraints(&metrics);
        let objectives = if feasibility.is_feasible() {
            self.objectives_of(&metrics)
        } else {
            self.penalty_vector()
        };

        Assessment {
            objectives,
            metrics: Some(metrics),
            feasibility,
        }
    }

    /// Objective vector of already computed metrics, ignoring constraints.
    pub fn objectives_of(&self, metrics: &PathMetrics) -> Vec<f64> {
        let mut objectives = Vec::with_capacity(self.config.objective_count());
        objectives.push(metrics.total_time_s);
        objectives.push(metrics.emissions_g);
        match self.config.walk_policy {
            Some(WalkPolicy::Reward) => objectives.push(-metrics.walking_distance_m),
            Some(WalkPolicy::Penalize) => objectives.push(metrics.walking_distance_m),
            None => {}
        }
        if self.config.include_fare {
            objectives.push(metrics.fare_cost);
        }
        objectives
    }

    fn check_constraints(&self, metrics: &PathMetrics) -> Feasibility {
        if let Some(limit_s) = self.config.max_walk_time_s {
            let walk_s = metrics.walking_time_s;
            if walk_s > limit_s || (limit_s <= 0.0 && metrics.has_walk()) {
                return Feasibility::WalkLimitExceeded { walk_s, limit_s };
            }
        }
        if let Some(limit) = self.config.max_transfers {
            if metrics.transfers > limit {
                return Feasibility::TransferLimitExceeded {
                    transfers: metrics.transfers,
                    limit,
                };
            }
        }
        Feasibility::Feasible
    }

    fn invalid(&self, err: RoutingError) -> Assessment {
        Assessment {
            objectives: self.penalty_vector(),
            metrics: None,
            feasibility: Feasibility::Invalid(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, GraphConfig};
    use crate::schedule::{ScheduleData, StopRecord, StopTimeRecord, TripRecord};

    /// Bus A-B, walk B-C (~111 m), bus C-D on another route.
    fn graph() -> Graph {
        let mut data = ScheduleData::default();
        data.stops = vec![
            StopRecord::new("A", "STCP", 41.140, -8.610),
            StopRecord::new("B", "STCP", 41.150, -8.610),
            StopRecord::new("C", "STCP", 41.151, -8.610),
            StopRecord::new("D", "STCP", 41.161, -8.610),
        ];
        data.trips = vec![
            TripRecord::new("t1", "1", "STCP"),
            TripRecord::new("t2", "2", "STCP"),
        ];
        data.stop_times = vec![
            StopTimeRecord::new("STCP", "t1", "A", 1, Some(0), Some(0)),
            StopTimeRecord::new("STCP", "t1", "B", 2, Some(200), Some(200)),
            StopTimeRecord::new("STCP", "t2", "C", 1, Some(0), Some(0)),
            StopTimeRecord::new("STCP", "t2", "D", 2, Some(200), Some(200)),
        ];
        GraphBuilder::new(GraphConfig::default()).build(&data).unwrap()
    }

    fn full_path() -> Path {
        Path::new(vec![0, 1, 2, 3])
    }

    #[test]
    fn test_default_vector_time_and_emissions() {
        let g = graph();
        let config = ObjectiveConfig::default();
        let v = Evaluator::new(&g, &config).evaluate(&full_path());
        assert_eq!(v.len(), 2);
        assert!(v[0] > 400.0);
        assert!(v[1] > 0.0);
    }

    #[test]
    fn test_walk_sign_follows_policy() {
        let g = graph();
        let reward = ObjectiveConfig::default().with_walk_policy(WalkPolicy::Reward);
        let penalize = ObjectiveConfig::default().with_walk_policy(WalkPolicy::Penalize);
        let r = Evaluator::new(&g, &reward).evaluate(&full_path());
        let p = Evaluator::new(&g, &penalize).evaluate(&full_path());
        assert!(r[2] < 0.0);
        assert_eq!(r[2], -p[2]);
    }

    #[test]
    fn test_zero_walk_limit_penalizes_walking() {
        let g = graph();
        let config = ObjectiveConfig::default().with_max_walk_time_s(0.0);
        let eval = Evaluator::new(&g, &config);
        let a = eval.assess(&full_path());
        assert!(a.is_penalized());
        assert_eq!(a.objectives, vec![PENALTY, PENALTY]);

        let ride_only = eval.assess(&Path::new(vec![0, 1]));
        assert!(!ride_only.is_penalized());
    }

    #[test]
    fn test_transfer_limit() {
        let g = graph();
        let config = ObjectiveConfig::default().with_max_transfers(0);
        let a = Evaluator::new(&g, &config).assess(&full_path());
        assert_eq!(
            a.feasibility,
            Feasibility::TransferLimitExceeded {
                transfers: 1,
                limit: 0
            }
        );
    }

    #[test]
    fn test_invalid_path_penalized_not_error() {
        let g = graph();
        let config = ObjectiveConfig::default().with_fare(true);
        let eval = Evaluator::new(&g, &config);
        let a = eval.assess(&Path::new(vec![0, 3]));
        assert!(matches!(a.feasibility, Feasibility::Invalid(_)));
        assert_eq!(a.objectives, vec![PENALTY; 3]);
    }

    #[test]
    fn test_empty_path_reported_as_empty() {
        let g = graph();
        let config = ObjectiveConfig::default();
        let a = Evaluator::new(&g, &config).assess(&Path::default());
        assert!(a.is_penalized());
        assert!(a.metrics.is_none());
        assert_eq!(a.feasibility, Feasibility::Invalid(RoutingError::EmptyPath));
    }

    #[test]
    fn test_evaluation_is_pure() {
        let g = graph();
        let config = ObjectiveConfig::default().with_walk_policy(WalkPolicy::Reward);
        let eval = Evaluator::new(&g, &config);
        assert_eq!(eval.evaluate(&full_path()), eval.evaluate(&full_path()));
    }
}

//! Weighted-sum shortest-path sweep.

use std::collections::HashSet;

use super::config::BaselineConfig;
use crate::error::{Result, RoutingError};
use crate::graph::{Edge, Graph, NodeIndex};
use crate::metrics::{path_metrics, Path, PathMetrics};
use crate::pareto::pareto_filter;

/// Which extreme of the baseline front a solution sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extreme {
    MinTime,
    MinEmissions,
    MinTimeAndEmissions,
}

/// One distinct path found by the sweep.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaselineSolution {
    /// First λ that produced this path.
    pub lambda: f64,
    pub path: Path,
    pub metrics: PathMetrics,
    /// Scalarized cost of the path under `lambda`.
    pub weight_value: f64,
    /// Set by [`BaselineRunner::pareto_front`].
    pub extreme: Option<Extreme>,
}

impl BaselineSolution {
    /// `[total time, emissions]`.
    pub fn point(&self) -> [f64; 2] {
        [self.metrics.total_time_s, self.metrics.emissions_g]
    }
}

/// Graph-wide maxima used to normalize both edge terms.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CostScale {
    max_time_s: f64,
    max_emissions_g: f64,
}

impl CostScale {
    pub(crate) fn of(graph: &Graph) -> Self {
        let mut scale = Self {
            max_time_s: 0.0,
            max_emissions_g: 0.0,
        };
        for edge in graph.edges() {
            scale.max_time_s = scale.max_time_s.max(edge.time_s);
            scale.max_emissions_g = scale.max_emissions_g.max(graph.edge_emissions(edge));
        }
        scale
    }

    /// `λ·time/max_time + (1−λ)·emissions/max_emissions`; a zero maximum
    /// drops its term.
    pub(crate) fn weight(&self, graph: &Graph, edge: &Edge, lambda: f64) -> f64 {
        let time = if self.max_time_s > 0.0 {
            edge.time_s / self.max_time_s
        } else {
            0.0
        };
        let emissions = if self.max_emissions_g > 0.0 {
            graph.edge_emissions(edge) / self.max_emissions_g
        } else {
            0.0
        };
        lambda * time + (1.0 - lambda) * emissions
    }
}

/// Runs the λ sweep.
///
/// # Examples
///
/// ```
/// use u_multimodal::baseline::{BaselineConfig, BaselineRunner};
/// use u_multimodal::graph::{GraphBuilder, GraphConfig};
/// use u_multimodal::schedule::{ScheduleData, StopRecord};
///
/// let mut data = ScheduleData::default();
/// data.stops.push(StopRecord::new("A", "METRO", 41.150, -8.610));
/// data.stops.push(StopRecord::new("B", "METRO", 41.151, -8.610));
/// let graph = GraphBuilder::new(GraphConfig::default()).build(&data).unwrap();
///
/// let solutions = BaselineRunner::run(&graph, 0, 1, &BaselineConfig::default()).unwrap();
/// // Only one path exists, found at λ = 0.
/// assert_eq!(solutions.len(), 1);
/// assert_eq!(solutions[0].lambda, 0.0);
/// ```
pub struct BaselineRunner;

impl BaselineRunner {
    /// Distinct shortest paths over every λ of the sweep, in λ order.
    ///
    /// # Errors
    ///
    /// [`RoutingError::InvalidConfig`], [`RoutingError::UnknownNode`], or
    /// [`RoutingError::Unreachable`] when no path joins the endpoints.
    pub fn run(
        graph: &Graph,
        origin: NodeIndex,
        destination: NodeIndex,
        config: &BaselineConfig,
    ) -> Result<Vec<BaselineSolution>> {
        config.validate()?;
        for node in [origin, destination] {
            if node >= graph.node_count() {
                return Err(RoutingError::UnknownNode(node));
            }
        }

        let scale = CostScale::of(graph);
        let lambdas = config.lambdas();
        let mut seen: HashSet<Path> = HashSet::new();
        let mut solutions = Vec::new();

        for &lambda in &lambdas {
            let path = graph
                .shortest_path_with(origin, destination, None, |edge| {
                    scale.weight(graph, edge, lambda)
                })
                .ok_or(RoutingError::Unreachable {
                    origin,
                    destination,
                })?;
            if !seen.insert(path.clone()) {
                continue;
            }

            let metrics = path_metrics(graph, &path)?;
            let weight_value = path_weight(graph, &path, &scale, lambda);
            log::debug!(
                "λ={lambda:.2}: {} nodes, {:.0} s, {:.1} g",
                path.len(),
                metrics.total_time_s,
                metrics.emissions_g
            );
            solutions.push(BaselineSolution {
                lambda,
                path,
                metrics,
                weight_value,
                extreme: None,
            });
        }

        log::info!(
            "baseline sweep: {} distinct paths over {} λ values",
            solutions.len(),
            lambdas.len()
        );
        Ok(solutions)
    }

    /// Non-dominated subset in (time, emissions), with the minimum-time and
    /// minimum-emissions solutions labelled.
    pub fn pareto_front(solutions: &[BaselineSolution]) -> Vec<BaselineSolution> {
        let points: Vec<Vec<f64>> = solutions.iter().map(|s| s.point().to_vec()).collect();
        let mut front: Vec<BaselineSolution> = pareto_filter(&points)
            .into_iter()
            .map(|i| solutions[i].clone())
            .collect();

        let argmin = |axis: usize| {
            front
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.point()[axis].total_cmp(&b.1.point()[axis]))
                .map(|(i, _)| i)
        };
        let min_time = argmin(0);
        let min_emissions = argmin(1);

        for (i, solution) in front.iter_mut().enumerate() {
            solution.extreme = match (Some(i) == min_time, Some(i) == min_emissions) {
                (true, true) => Some(Extreme::MinTimeAndEmissions),
                (true, false) => Some(Extreme::MinTime),
                (false, true) => Some(Extreme::MinEmissions),
                (false, false) => None,
            };
        }
        front
    }
}

/// Scalarized cost of a path, taking the cheapest parallel edge per hop.
fn path_weight(graph: &Graph, path: &Path, scale: &CostScale, lambda: f64) -> f64 {
    path.nodes()
        .windows(2)
        .map(|w| {
            graph
                .edges_between(w[0], w[1])
                .iter()
                .map(|edge| scale.weight(graph, edge, lambda))
                .fold(f64::INFINITY, f64::min)
        })
        .sum()
}

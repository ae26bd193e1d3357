//! Evolutionary loop execution.
//!
//! [`SearchRunner`] orchestrates the complete run:
//! seeding → evaluation → tournament → splice → regenerate → survival → repeat.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use rand::Rng;

use super::config::SearchConfig;
use super::operators::{random_path, regenerate_tail, splice_crossover};
use super::selection::{assign_rank_and_crowding, crowded_tournament, survivors};
use super::types::{Individual, Population, Solution};
use crate::baseline::BaselineRunner;
use crate::error::{Result, RoutingError};
use crate::fitness::Evaluator;
use crate::graph::{Graph, NodeIndex};
use crate::metrics::{Path, PathMetrics};
use crate::pareto::pareto_filter;
use crate::random::{create_rng, resolve_seed};

/// Result of a search run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// The population after the last survival step.
    pub population: Population,

    /// Non-dominated routes, one per distinct node sequence, ordered by
    /// objective vector.
    pub front: Vec<Solution>,

    /// Penalized individuals in the final population.
    pub penalized_count: usize,

    /// True when every individual broke a limit and `front` holds the
    /// non-dominated routes under the unconstrained objectives instead.
    pub best_effort: bool,

    /// Size of the rank-0 front, initially and after each generation.
    pub front_sizes: Vec<usize>,

    /// Total number of generations executed.
    pub generations: usize,

    /// The seed that drove the run.
    pub seed: u64,
}

impl SearchResult {
    /// `[total time, emissions]` of each front route.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.front.iter().map(Solution::point).collect()
    }
}

/// Executes the evolutionary search.
///
/// # Usage
///
/// ```
/// use u_multimodal::graph::{GraphBuilder, GraphConfig};
/// use u_multimodal::schedule::{ScheduleData, StopRecord};
/// use u_multimodal::search::{SearchConfig, SearchRunner};
///
/// let mut data = ScheduleData::default();
/// data.stops.push(StopRecord::new("A", "METRO", 41.150, -8.610));
/// data.stops.push(StopRecord::new("B", "METRO", 41.151, -8.610));
/// let graph = GraphBuilder::new(GraphConfig::default()).build(&data).unwrap();
///
/// let config = SearchConfig::fast().with_seed(42);
/// let result = SearchRunner::run(&graph, 0, 1, &config).unwrap();
/// assert_eq!(result.front.len(), 1);
/// assert_eq!(result.front[0].node_ids, vec!["METRO_A", "METRO_B"]);
/// ```
pub struct SearchRunner;

impl SearchRunner {
    /// Runs the search from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// [`RoutingError::InvalidConfig`], [`RoutingError::UnknownNode`], or
    /// [`RoutingError::Unreachable`] when no path joins the endpoints.
    /// Routes that only break the configured limits are not errors: they
    /// come back as a best-effort front.
    pub fn run(
        graph: &Graph,
        origin: NodeIndex,
        destination: NodeIndex,
        config: &SearchConfig,
    ) -> Result<SearchResult> {
        config.validate()?;
        for node in [origin, destination] {
            if node >= graph.node_count() {
                return Err(RoutingError::UnknownNode(node));
            }
        }
        if !graph.is_reachable(origin, destination) {
            return Err(RoutingError::Unreachable {
                origin,
                destination,
            });
        }

        let seed = resolve_seed(config.seed);
        let mut rng = create_rng(seed);
        let evaluator = Evaluator::new(graph, &config.objectives);

        // 1. Seed and evaluate
        let mut lambdas: HashMap<Path, f64> = HashMap::new();
        let mut population =
            initial_population(graph, origin, destination, config, &mut lambdas, &mut rng)?;
        population.evaluate(&evaluator, config.parallel);
        assign_rank_and_crowding(population.individuals_mut());

        let mut front_sizes = Vec::with_capacity(config.max_generations + 1);
        front_sizes.push(front_size(&population));

        // 2. Generational loop
        for gen in 0..config.max_generations {
            let mut children = offspring(graph, &population, config, &mut rng);
            children.evaluate(&evaluator, config.parallel);

            let mut combined = population.into_individuals();
            combined.extend(children.into_individuals());
            population = Population::from(survivors(combined, config.population_size));

            let size = front_size(&population);
            front_sizes.push(size);
            log::debug!(
                "generation {}: front {}, penalized {}",
                gen + 1,
                size,
                population.penalized_count()
            );
        }

        // 3. Extract
        let (front, best_effort) = extract_front(graph, &evaluator, &population, &lambdas);
        let penalized_count = population.penalized_count();
        log::info!(
            "search finished: {} routes on the front, {} of {} individuals penalized{}",
            front.len(),
            penalized_count,
            population.len(),
            if best_effort { " (best effort)" } else { "" }
        );

        Ok(SearchResult {
            population,
            front,
            penalized_count,
            best_effort,
            front_sizes,
            generations: config.max_generations,
            seed,
        })
    }
}

/// Baseline paths first, then randomized shortest paths until full.
///
/// Records the λ of every baseline path in `lambdas`.
fn initial_population<R: Rng>(
    graph: &Graph,
    origin: NodeIndex,
    destination: NodeIndex,
    config: &SearchConfig,
    lambdas: &mut HashMap<Path, f64>,
    rng: &mut R,
) -> Result<Population> {
    let size = config.population_size;
    let mut population = Population::with_capacity(size);

    if config.seed_with_baseline {
        for solution in BaselineRunner::run(graph, origin, destination, &config.baseline)? {
            lambdas.entry(solution.path.clone()).or_insert(solution.lambda);
            if population.len() < size {
                population.push(Individual::new(solution.path));
            }
        }
    }

    while population.len() < size {
        let path = random_path(graph, origin, destination, None, config.perturbation, rng).ok_or(
            RoutingError::Unreachable {
                origin,
                destination,
            },
        )?;
        population.push(Individual::new(path));
    }
    Ok(population)
}

/// One offspring population of the same size as `parents`.
///
/// Unchanged copies keep their cached evaluation; spliced or regenerated
/// children start unevaluated.
fn offspring<R: Rng>(
    graph: &Graph,
    parents: &Population,
    config: &SearchConfig,
    rng: &mut R,
) -> Population {
    let pool = parents.individuals();
    let size = config.population_size;
    let mut children = Population::with_capacity(size);

    while children.len() < size {
        let p1 = &pool[crowded_tournament(pool, config.tournament_size, rng)];
        let p2 = &pool[crowded_tournament(pool, config.tournament_size, rng)];

        let mut pair = [p1.clone(), p2.clone()];
        if rng.random_range(0.0..1.0) < config.crossover_rate {
            if let Some((a, b)) = splice_crossover(&p1.path, &p2.path, rng) {
                pair = [Individual::new(a), Individual::new(b)];
            }
        }

        for mut child in pair {
            if children.len() >= size {
                break;
            }
            if rng.random_range(0.0..1.0) < config.mutation_rate {
                child = match regenerate_tail(
                    graph,
                    &child.path,
                    config.max_repair_attempts,
                    config.perturbation,
                    rng,
                ) {
                    Some(path) => Individual::new(path),
                    None => Individual::invalid(child.path),
                };
            }
            children.push(child);
        }
    }
    children
}

fn front_size(population: &Population) -> usize {
    population.iter().filter(|i| i.rank == 0).count()
}

/// Non-dominated feasible routes, deduplicated by node sequence. When no
/// individual is feasible, falls back to the valid routes scored without
/// limits and reports `true`.
fn extract_front(
    graph: &Graph,
    evaluator: &Evaluator<'_>,
    population: &Population,
    lambdas: &HashMap<Path, f64>,
) -> (Vec<Solution>, bool) {
    let best_effort = population.iter().all(|i| i.penalized);

    let mut seen: HashSet<&Path> = HashSet::new();
    let mut candidates: Vec<(&Path, Vec<f64>, PathMetrics)> = Vec::new();
    for ind in population.iter() {
        let eligible = if best_effort { ind.valid } else { !ind.penalized };
        if !eligible || !seen.insert(&ind.path) {
            continue;
        }
        let Some(metrics) = evaluator.assess(&ind.path).metrics else {
            continue;
        };
        let objectives = if best_effort {
            evaluator.objectives_of(&metrics)
        } else {
            ind.objectives.clone()
        };
        candidates.push((&ind.path, objectives, metrics));
    }

    let vectors: Vec<Vec<f64>> = candidates.iter().map(|c| c.1.clone()).collect();
    let keep: HashSet<usize> = pareto_filter(&vectors).into_iter().collect();

    let mut front: Vec<Solution> = candidates
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep.contains(i))
        .map(|(_, (path, objectives, metrics))| {
            let lambda = lambdas.get(path).copied();
            Solution::new(graph, path.clone(), objectives, metrics, lambda)
        })
        .collect();
    front.sort_by(|a, b| {
        lexicographic(&a.objectives, &b.objectives).then_with(|| a.path.nodes().cmp(b.path.nodes()))
    });

    (front, best_effort)
}

fn lexicographic(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

// ============================================================================
// Tests
// ============================================================================

//! Individuals, populations and the solutions handed to callers.

use crate::fitness::Evaluator;
use crate::graph::Graph;
use crate::metrics::{Path, PathMetrics};

/// A candidate route in the population.
///
/// `objectives` is empty until the individual is evaluated. An invalid
/// individual (failed mutation repair) is always penalized.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    pub path: Path,
    pub objectives: Vec<f64>,
    pub valid: bool,
    pub penalized: bool,
    /// Non-domination rank from the last sort (0 = front).
    pub rank: usize,
    /// Crowding distance within its rank from the last sort.
    pub crowding: f64,
}

impl Individual {
    /// A valid, not yet evaluated individual.
    pub fn new(path: Path) -> Self {
        Self {
            path,
            objectives: Vec::new(),
            valid: true,
            penalized: false,
            rank: usize::MAX,
            crowding: 0.0,
        }
    }

    /// An individual whose repair budget ran out.
    pub fn invalid(path: Path) -> Self {
        Self {
            valid: false,
            ..Self::new(path)
        }
    }

    pub fn is_evaluated(&self) -> bool {
        !self.objectives.is_empty()
    }

    /// Computes and caches the objective vector.
    pub fn evaluate(&mut self, evaluator: &Evaluator<'_>) {
        if !self.valid {
            self.objectives = evaluator.penalty_vector();
            self.penalized = true;
            return;
        }
        let assessment = evaluator.assess(&self.path);
        self.penalized = assessment.is_penalized();
        self.objectives = assessment.objectives;
    }
}

/// The individuals of one generation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn push(&mut self, individual: Individual) {
        self.individuals.push(individual);
    }

    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    /// Objective vectors in population order.
    pub fn objectives(&self) -> Vec<Vec<f64>> {
        self.individuals.iter().map(|i| i.objectives.clone()).collect()
    }

    pub fn penalized_count(&self) -> usize {
        self.individuals.iter().filter(|i| i.penalized).count()
    }

    /// Evaluates every individual without a cached objective vector.
    ///
    /// With the `parallel` feature and `parallel` set, evaluation runs on
    /// the rayon pool. Evaluation draws no random numbers, so the outcome
    /// is identical either way.
    pub fn evaluate(&mut self, evaluator: &Evaluator<'_>, parallel: bool) {
        #[cfg(feature = "parallel")]
        if parallel {
            use rayon::prelude::*;
            self.individuals
                .par_iter_mut()
                .filter(|ind| !ind.is_evaluated())
                .for_each(|ind| ind.evaluate(evaluator));
            return;
        }
        #[cfg(not(feature = "parallel"))]
        let _ = parallel;

        for ind in self.individuals.iter_mut().filter(|i| !i.is_evaluated()) {
            ind.evaluate(evaluator);
        }
    }
}

impl From<Vec<Individual>> for Population {
    fn from(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }
}

impl FromIterator<Individual> for Population {
    fn from_iter<I: IntoIterator<Item = Individual>>(iter: I) -> Self {
        Self {
            individuals: iter.into_iter().collect(),
        }
    }
}

/// A route returned to callers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    pub path: Path,
    pub node_ids: Vec<String>,
    pub objectives: Vec<f64>,
    pub metrics: PathMetrics,
    /// The λ of the baseline sweep that produced this exact path, if any.
    pub lambda: Option<f64>,
}

impl Solution {
    pub(crate) fn new(
        graph: &Graph,
        path: Path,
        objectives: Vec<f64>,
        metrics: PathMetrics,
        lambda: Option<f64>,
    ) -> Self {
        Self {
            node_ids: path.node_ids(graph),
            path,
            objectives,
            metrics,
            lambda,
        }
    }

    /// `[total time, emissions]`.
    pub fn point(&self) -> [f64; 2] {
        [self.metrics.total_time_s, self.metrics.emissions_g]
    }
}

//! Search configuration.
//!
//! [`SearchConfig`] holds every parameter of the evolutionary loop together
//! with the objective and baseline settings it composes.

use crate::baseline::BaselineConfig;
use crate::error::{Result, RoutingError};
use crate::fitness::ObjectiveConfig;

/// Configuration for the evolutionary route search.
///
/// # Defaults
///
/// ```
/// use u_multimodal::search::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.max_generations, 30);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_multimodal::fitness::{ObjectiveConfig, WalkPolicy};
/// use u_multimodal::search::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_population_size(80)
///     .with_mutation_rate(0.2)
///     .with_objectives(ObjectiveConfig::default().with_walk_policy(WalkPolicy::Penalize))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Number of individuals kept after each survival step.
    pub population_size: usize,

    /// Number of generations; the only termination criterion.
    pub max_generations: usize,

    /// Probability of splicing a parent pair (0.0–1.0).
    ///
    /// Pairs that are not spliced, or share no interior node, are copied.
    pub crossover_rate: f64,

    /// Probability of regenerating the tail of an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Contestants per crowded tournament.
    pub tournament_size: usize,

    /// Randomized shortest-path attempts a mutation may spend before the
    /// individual is marked invalid.
    pub max_repair_attempts: usize,

    /// Edge times are scaled by a factor drawn from
    /// `[1 - perturbation, 1 + perturbation]` when sampling random paths.
    pub perturbation: f64,

    /// Whether the initial population starts from the baseline sweep.
    pub seed_with_baseline: bool,

    /// Whether to evaluate offspring with rayon. Only honoured with the
    /// `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a fresh seed, reported back in the result.
    pub seed: Option<u64>,

    /// Objectives and constraints.
    pub objectives: ObjectiveConfig,

    /// λ sweep used to seed the population.
    pub baseline: BaselineConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 30,
            crossover_rate: 0.6,
            mutation_rate: 0.3,
            tournament_size: 2,
            max_repair_attempts: 8,
            perturbation: 0.5,
            seed_with_baseline: true,
            parallel: false,
            seed: None,
            objectives: ObjectiveConfig::default(),
            baseline: BaselineConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the mutation repair budget.
    pub fn with_max_repair_attempts(mut self, attempts: usize) -> Self {
        self.max_repair_attempts = attempts;
        self
    }

    /// Sets the random path perturbation, clamped to `[0, 0.95]`.
    pub fn with_perturbation(mut self, perturbation: f64) -> Self {
        self.perturbation = perturbation.clamp(0.0, 0.95);
        self
    }

    /// Enables or disables baseline seeding.
    pub fn with_baseline_seeding(mut self, enabled: bool) -> Self {
        self.seed_with_baseline = enabled;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the objective configuration.
    pub fn with_objectives(mut self, objectives: ObjectiveConfig) -> Self {
        self.objectives = objectives;
        self
    }

    /// Sets the baseline sweep used for seeding.
    pub fn with_baseline(mut self, baseline: BaselineConfig) -> Self {
        self.baseline = baseline;
        self
    }

    /// Preset for quick answers: 30 individuals over 15 generations.
    pub fn fast() -> Self {
        Self {
            population_size: 30,
            max_generations: 15,
            ..Self::default()
        }
    }

    /// Preset matching the defaults: 50 individuals over 30 generations.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset for wide fronts: 100 individuals over 60 generations with a
    /// finer λ sweep for seeding.
    pub fn quality() -> Self {
        Self {
            population_size: 100,
            max_generations: 60,
            baseline: BaselineConfig::default().with_lambda_step(0.025),
            ..Self::default()
        }
    }

    /// Selects a preset from the graph size.
    ///
    /// - `node_count < 1_000` → [`fast()`](Self::fast)
    /// - `1_000 ≤ node_count < 10_000` → [`balanced()`](Self::balanced)
    /// - `node_count ≥ 10_000` → [`quality()`](Self::quality)
    pub fn auto_select(node_count: usize) -> Self {
        if node_count < 1_000 {
            Self::fast()
        } else if node_count < 10_000 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration, including the nested objective and
    /// baseline settings.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(RoutingError::InvalidConfig(
                "population_size must be at least 2".into(),
            ));
        }
        if self.max_generations == 0 {
            return Err(RoutingError::InvalidConfig(
                "max_generations must be at least 1".into(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(RoutingError::InvalidConfig(
                "tournament_size must be at least 1".into(),
            ));
        }
        if self.max_repair_attempts == 0 {
            return Err(RoutingError::InvalidConfig(
                "max_repair_attempts must be at least 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.perturbation) {
            return Err(RoutingError::InvalidConfig(
                "perturbation must be in [0, 1)".into(),
            ));
        }
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(RoutingError::InvalidConfig(format!(
                    "{name} must be in [0, 1]"
                )));
            }
        }
        self.objectives.validate()?;
        self.baseline.validate()
    }
}

//! Multi-objective evolutionary route search (NSGA-II).
//!
//! An individual is a connected node sequence from origin to destination.
//! The loop is built from plain functions over explicit types:
//!
//! - [`Individual`] / [`Population`]: candidate routes with cached objectives
//! - [`operators`]: randomized shortest paths, splice crossover, tail regeneration
//! - [`crowded_tournament`] / [`survivors`]: crowded-comparison selection
//! - [`SearchRunner`]: seeds from the weighted-sum baseline, then evolves
//!   for a fixed number of generations
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*

mod config;
mod multi_objective;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::SearchConfig;
pub use multi_objective::{crowding_distance, non_dominated_sort, NondominatedSortResult};
pub use operators::{random_path, regenerate_tail, splice_crossover};
pub use runner::{SearchResult, SearchRunner};
pub use selection::{assign_rank_and_crowding, crowded_cmp, crowded_tournament, survivors};
pub use types::{Individual, Population, Solution};

//! Weighted-sum baseline.
//!
//! Sweeps λ over `[0, 1]` and runs one deterministic shortest-path query per
//! value on the blended edge cost
//! `λ·time/max_time + (1−λ)·emissions/max_emissions`. The distinct paths
//! found form a reference front for judging the evolutionary search.

mod config;
mod runner;

pub use config::BaselineConfig;
pub use runner::{BaselineRunner, BaselineSolution, Extreme};

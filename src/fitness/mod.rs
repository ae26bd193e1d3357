//! Fitness evaluation.
//!
//! An [`Evaluator`] turns a path into a minimization vector: time and
//! emissions, then optionally a signed walking distance and the fare.
//! Paths that break a hard limit get [`PENALTY`] in every objective.

mod config;
mod evaluator;

pub use config::{ObjectiveConfig, WalkPolicy};
pub use evaluator::{Assessment, Evaluator, Feasibility, PENALTY};

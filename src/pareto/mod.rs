//! Pareto dominance, filtering and hypervolume.
//!
//! All objectives are minimized. Walking objectives that reward distance
//! are already negated by the [`fitness`](crate::fitness) module, so no
//! sign handling happens here.

mod dominance;
mod hypervolume;

pub use dominance::{count_dominated, dominance_cmp, dominates, pareto_filter, Dominance, ParetoSet};
pub use hypervolume::{
    compare_fronts, hypervolume_2d, is_valid_reference, pareto_filter_2d, reference_point,
    FrontComparison, Point2, DEFAULT_MARGIN,
};

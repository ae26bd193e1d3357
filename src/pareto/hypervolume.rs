//! Two-dimensional hypervolume over (time, emissions).
//!
//! Used to compare result sets offline; the search never consults it.

use super::dominance::{count_dominated, dominates};

/// A `[time, emissions]` point.
pub type Point2 = [f64; 2];

/// Default inflation applied to the reference point.
pub const DEFAULT_MARGIN: f64 = 1.10;

/// Non-dominated subset of `points`, sorted by ascending time.
/// Duplicates collapse to one point.
pub fn pareto_filter_2d(points: &[Point2]) -> Vec<Point2> {
    let mut sorted: Vec<Point2> = points.to_vec();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));

    let mut front = Vec::new();
    let mut best_y = f64::INFINITY;
    for p in sorted {
        if p[1] < best_y {
            best_y = p[1];
            front.push(p);
        }
    }
    front
}

/// Area dominated by `points` and bounded by `reference`.
///
/// Points beyond the reference in either coordinate are ignored.
///
/// # Examples
///
/// ```
/// use u_multimodal::pareto::hypervolume_2d;
///
/// let hv = hypervolume_2d(&[[2.0, 3.0]], [10.0, 10.0]);
/// assert_eq!(hv, 8.0 * 7.0);
/// ```
pub fn hypervolume_2d(points: &[Point2], reference: Point2) -> f64 {
    let [rx, ry] = reference;
    let mut hv = 0.0;
    let mut prev_y = ry;
    for [x, y] in pareto_filter_2d(points) {
        if x > rx || y > ry {
            continue;
        }
        hv += (rx - x) * (prev_y - y);
        prev_y = y;
    }
    hv.max(0.0)
}

/// Componentwise maximum over both sets, inflated by `margin`.
///
/// A coordinate whose maximum is not positive is set to 1.0, as is every
/// coordinate when both sets are empty.
pub fn reference_point(a: &[Point2], b: &[Point2], margin: f64) -> Point2 {
    let mut reference = [1.0, 1.0];
    for (axis, slot) in reference.iter_mut().enumerate() {
        let max = a
            .iter()
            .chain(b.iter())
            .map(|p| p[axis])
            .fold(f64::NEG_INFINITY, f64::max);
        if max > 0.0 {
            *slot = max * margin;
        }
    }
    reference
}

/// Side-by-side quality of a baseline front and a search front.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrontComparison {
    pub reference: Point2,
    pub baseline_hypervolume: f64,
    pub search_hypervolume: f64,
    /// Baseline points dominated by at least one search point.
    pub baseline_dominated: usize,
    pub baseline_total: usize,
}

impl FrontComparison {
    /// Search hypervolume minus baseline hypervolume.
    pub fn hypervolume_gain(&self) -> f64 {
        self.search_hypervolume - self.baseline_hypervolume
    }
}

/// Compares two fronts under a shared reference point.
pub fn compare_fronts(baseline: &[Point2], search: &[Point2], margin: f64) -> FrontComparison {
    let reference = reference_point(baseline, search, margin);
    let to_vecs = |pts: &[Point2]| pts.iter().map(|p| p.to_vec()).collect::<Vec<_>>();
    FrontComparison {
        reference,
        baseline_hypervolume: hypervolume_2d(baseline, reference),
        search_hypervolume: hypervolume_2d(search, reference),
        baseline_dominated: count_dominated(&to_vecs(search), &to_vecs(baseline)),
        baseline_total: baseline.len(),
    }
}

/// True when `reference` is dominated by every point of `front`.
pub fn is_valid_reference(front: &[Point2], reference: Point2) -> bool {
    front.iter().all(|p| dominates(p, &reference))
}

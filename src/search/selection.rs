//! Crowded-comparison selection.
//!
//! An individual is preferred when it has a lower rank, or the same rank
//! and a larger crowding distance. Parents are drawn by tournament under
//! that order; survivors are the best `n` of parents plus offspring.

use std::cmp::Ordering;

use rand::Rng;

use super::multi_objective::{crowding_distance, non_dominated_sort};
use super::types::Individual;

/// `Less` when `a` is preferred over `b`.
pub fn crowded_cmp(a: &Individual, b: &Individual) -> Ordering {
    a.rank
        .cmp(&b.rank)
        .then_with(|| b.crowding.total_cmp(&a.crowding))
}

/// Sorts the individuals into fronts and stores each one's rank and
/// crowding distance. Returns the fronts as index lists.
pub fn assign_rank_and_crowding(individuals: &mut [Individual]) -> Vec<Vec<usize>> {
    let objectives: Vec<Vec<f64>> = individuals.iter().map(|i| i.objectives.clone()).collect();
    let sorted = non_dominated_sort(&objectives);

    for (rank, front) in sorted.fronts.iter().enumerate() {
        let front_objectives: Vec<Vec<f64>> =
            front.iter().map(|&i| objectives[i].clone()).collect();
        for (&i, distance) in front.iter().zip(crowding_distance(&front_objectives)) {
            individuals[i].rank = rank;
            individuals[i].crowding = distance;
        }
    }
    sorted.fronts
}

/// Tournament of `k` random contestants under [`crowded_cmp`]; the
/// earliest drawn contestant wins ties.
///
/// # Panics
/// Panics if `population` is empty.
pub fn crowded_tournament<R: Rng>(population: &[Individual], k: usize, rng: &mut R) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let n = population.len();

    let mut best = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let idx = rng.random_range(0..n);
        if crowded_cmp(&population[idx], &population[best]) == Ordering::Less {
            best = idx;
        }
    }
    best
}

/// (μ+λ) survival: keeps whole fronts while they fit, then fills the
/// remainder from the next front by descending crowding distance, lower
/// index first on ties.
///
/// Survivors keep the rank and crowding computed over the combined pool.
pub fn survivors(mut combined: Vec<Individual>, size: usize) -> Vec<Individual> {
    let fronts = assign_rank_and_crowding(&mut combined);

    let mut keep: Vec<usize> = Vec::with_capacity(size);
    for front in fronts {
        if keep.len() + front.len() <= size {
            keep.extend(front);
            continue;
        }
        let mut rest = front;
        rest.sort_by(|&a, &b| {
            combined[b]
                .crowding
                .total_cmp(&combined[a].crowding)
                .then(a.cmp(&b))
        });
        keep.extend(rest.into_iter().take(size - keep.len()));
        break;
    }
    keep.sort_unstable();

    let mut slots: Vec<Option<Individual>> = combined.into_iter().map(Some).collect();
    keep.into_iter().filter_map(|i| slots[i].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Path;
    use crate::random::create_rng;

    fn ind(objectives: Vec<f64>) -> Individual {
        let mut i = Individual::new(Path::new(vec![0, 1]));
        i.objectives = objectives;
        i
    }

    // ---- ranking ----

    #[test]
    fn test_assign_rank_and_crowding() {
        let mut pop = vec![
            ind(vec![1.0, 5.0]),
            ind(vec![3.0, 3.0]),
            ind(vec![5.0, 1.0]),
            ind(vec![4.0, 4.0]),
        ];
        let fronts = assign_rank_and_crowding(&mut pop);
        assert_eq!(fronts, vec![vec![0, 1, 2], vec![3]]);
        assert_eq!(pop[3].rank, 1);
        assert!(pop[0].crowding.is_infinite());
        assert!(pop[1].crowding.is_finite());
    }

    #[test]
    fn test_crowded_cmp() {
        let mut a = ind(vec![0.0]);
        let mut b = ind(vec![0.0]);
        a.rank = 0;
        b.rank = 1;
        a.crowding = 0.1;
        b.crowding = f64::INFINITY;
        assert_eq!(crowded_cmp(&a, &b), Ordering::Less);
        b.rank = 0;
        assert_eq!(crowded_cmp(&a, &b), Ordering::Greater);
    }

    // ---- tournament ----

    #[test]
    fn test_tournament_prefers_front() {
        let mut pop = vec![ind(vec![1.0, 1.0]), ind(vec![9.0, 9.0])];
        assign_rank_and_crowding(&mut pop);
        let mut rng = create_rng(42);
        let wins = (0..200)
            .filter(|_| crowded_tournament(&pop, 2, &mut rng) == 0)
            .count();
        // Index 1 only wins when drawn twice: about a quarter of the time.
        assert!(wins > 120, "front member won only {wins} of 200");
    }

    #[test]
    fn test_tournament_size_one_is_uniform() {
        let mut pop = vec![ind(vec![1.0, 1.0]), ind(vec![9.0, 9.0])];
        assign_rank_and_crowding(&mut pop);
        let mut rng = create_rng(7);
        let picks: Vec<usize> = (0..100)
            .map(|_| crowded_tournament(&pop, 1, &mut rng))
            .collect();
        assert!(picks.contains(&0) && picks.contains(&1));
    }

    // ---- survival ----

    #[test]
    fn test_survivors_keep_whole_fronts_first() {
        let combined = vec![
            ind(vec![9.0, 9.0]),
            ind(vec![1.0, 5.0]),
            ind(vec![5.0, 1.0]),
            ind(vec![6.0, 6.0]),
        ];
        let kept = survivors(combined, 3);
        let objs: Vec<Vec<f64>> = kept.iter().map(|i| i.objectives.clone()).collect();
        assert_eq!(objs, vec![vec![1.0, 5.0], vec![5.0, 1.0], vec![6.0, 6.0]]);
    }

    #[test]
    fn test_survivors_truncate_by_crowding() {
        let combined = vec![
            ind(vec![0.0, 4.0]),
            ind(vec![1.0, 3.0]),
            ind(vec![1.1, 2.9]),
            ind(vec![3.0, 1.0]),
            ind(vec![4.0, 0.0]),
        ];
        let kept = survivors(combined, 4);
        let objs: Vec<Vec<f64>> = kept.iter().map(|i| i.objectives.clone()).collect();
        // (1.0, 3.0) is boxed in by (0, 4) and (1.1, 2.9) and is dropped.
        assert!(!objs.contains(&vec![1.0, 3.0]));
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn test_survivors_ties_keep_lower_index() {
        let combined = vec![
            ind(vec![2.0, 2.0]),
            ind(vec![2.0, 2.0]),
            ind(vec![2.0, 2.0]),
            ind(vec![2.0, 2.0]),
        ];
        let kept = survivors(combined, 2);
        assert_eq!(kept.len(), 2);
        // Both boundaries are infinite; index order breaks the tie.
        assert!(kept.iter().all(|i| i.crowding.is_infinite()));
    }
}

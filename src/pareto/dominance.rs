//! Pareto dominance (minimization).

/// Dominance relation between two objective vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other (incomparable or equal).
    Neither,
}

/// Compares two objective vectors; lower is better in every objective.
pub fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// True when `a` is no worse than `b` everywhere and strictly better somewhere.
///
/// # Examples
///
/// ```
/// use u_multimodal::pareto::dominates;
///
/// assert!(dominates(&[30.0, 50.0], &[35.0, 50.0]));
/// assert!(dominates(&[30.0, 50.0], &[30.0, 60.0]));
/// assert!(!dominates(&[30.0, 60.0], &[30.0, 50.0]));
/// assert!(!dominates(&[30.0, 50.0], &[30.0, 50.0]));
/// ```
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance_cmp(a, b) == Dominance::Left
}

/// Indices of the non-dominated vectors, in input order.
///
/// Among exactly equal vectors only the first is kept.
pub fn pareto_filter(objectives: &[Vec<f64>]) -> Vec<usize> {
    (0..objectives.len())
        .filter(|&i| {
            objectives.iter().enumerate().all(|(j, other)| {
                j == i
                    || !(dominates(other, &objectives[i]) || (j < i && other == &objectives[i]))
            })
        })
        .collect()
}

/// Number of `reference` vectors dominated by at least one `candidate`.
pub fn count_dominated(candidates: &[Vec<f64>], reference: &[Vec<f64>]) -> usize {
    reference
        .iter()
        .filter(|r| candidates.iter().any(|c| dominates(c, r)))
        .count()
}

/// Items keyed by objective vectors, no member dominating another.
///
/// # Examples
///
/// ```
/// use u_multimodal::pareto::ParetoSet;
///
/// let mut set = ParetoSet::new();
/// assert!(set.insert(vec![10.0, 5.0], "a"));
/// assert!(set.insert(vec![5.0, 10.0], "b"));
/// assert!(!set.insert(vec![12.0, 6.0], "dominated"));
/// assert!(set.insert(vec![4.0, 4.0], "c")); // evicts a and b
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParetoSet<T> {
    members: Vec<(Vec<f64>, T)>,
}

impl<T> Default for ParetoSet<T> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
        }
    }
}

impl<T> ParetoSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item` unless an existing member dominates or equals it.
    /// Members dominated by the newcomer are removed. Returns whether the
    /// item was inserted.
    pub fn insert(&mut self, objectives: Vec<f64>, item: T) -> bool {
        if self
            .members
            .iter()
            .any(|(o, _)| *o == objectives || dominates(o, &objectives))
        {
            return false;
        }
        self.members.retain(|(o, _)| !dominates(&objectives, o));
        self.members.push((objectives, item));
        true
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[f64], &T)> {
        self.members.iter().map(|(o, t)| (o.as_slice(), t))
    }

    pub fn objectives(&self) -> Vec<Vec<f64>> {
        self.members.iter().map(|(o, _)| o.clone()).collect()
    }

    pub fn into_items(self) -> Vec<T> {
        self.members.into_iter().map(|(_, t)| t).collect()
    }
}

impl<T> FromIterator<(Vec<f64>, T)> for ParetoSet<T> {
    fn from_iter<I: IntoIterator<Item = (Vec<f64>, T)>>(iter: I) -> Self {
        let mut set = ParetoSet::new();
        for (objectives, item) in iter {
            set.insert(objectives, item);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- dominance ----

    #[test]
    fn test_dominance_cmp() {
        assert_eq!(dominance_cmp(&[1.0, 1.0], &[2.0, 2.0]), Dominance::Left);
        assert_eq!(dominance_cmp(&[2.0, 2.0], &[1.0, 1.0]), Dominance::Right);
        assert_eq!(dominance_cmp(&[1.0, 3.0], &[3.0, 1.0]), Dominance::Neither);
        assert_eq!(dominance_cmp(&[2.0, 2.0], &[2.0, 2.0]), Dominance::Neither);
    }

    #[test]
    fn test_equal_time_worse_emissions_is_dominated() {
        assert!(dominates(&[30.0, 50.0], &[30.0, 60.0]));
        assert!(!dominates(&[30.0, 60.0], &[30.0, 50.0]));
    }

    // ---- filter ----

    #[test]
    fn test_pareto_filter() {
        let objs = vec![
            vec![1.0, 5.0],
            vec![3.0, 3.0],
            vec![4.0, 4.0],
            vec![5.0, 1.0],
        ];
        assert_eq!(pareto_filter(&objs), vec![0, 1, 3]);
    }

    #[test]
    fn test_pareto_filter_collapses_duplicates() {
        let objs = vec![vec![2.0, 2.0], vec![1.0, 3.0], vec![2.0, 2.0]];
        assert_eq!(pareto_filter(&objs), vec![0, 1]);
    }

    #[test]
    fn test_pareto_filter_empty() {
        assert!(pareto_filter(&[]).is_empty());
    }

    #[test]
    fn test_count_dominated() {
        let search = vec![vec![1.0, 1.0]];
        let baseline = vec![vec![2.0, 2.0], vec![0.5, 3.0], vec![1.0, 1.0]];
        assert_eq!(count_dominated(&search, &baseline), 1);
    }

    // ---- set ----

    #[test]
    fn test_set_rejects_duplicates() {
        let mut set = ParetoSet::new();
        assert!(set.insert(vec![1.0, 2.0], 0));
        assert!(!set.insert(vec![1.0, 2.0], 1));
        assert_eq!(set.into_items(), vec![0]);
    }

    #[test]
    fn test_set_from_iter_is_mutually_non_dominated() {
        let set: ParetoSet<usize> = vec![
            (vec![3.0, 3.0], 0),
            (vec![1.0, 5.0], 1),
            (vec![2.0, 2.0], 2),
            (vec![5.0, 1.0], 3),
        ]
        .into_iter()
        .collect();
        let objs = set.objectives();
        for a in &objs {
            for b in &objs {
                assert!(!dominates(a, b));
            }
        }
        assert_eq!(set.len(), 3);
    }
}

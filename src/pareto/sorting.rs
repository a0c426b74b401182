//! Non-dominated sorting and crowding distance.
//!
//! # Algorithms
//!
//! - [`non_dominated_sort`]: fast non-dominated sorting (two-pass counting)
//!   from `u-metaheur`, with ascending indices inside each front
//! - [`crowding_distance`]: crowding distance within one front, from `u-metaheur`
//! - [`crowding_by_front`]: crowding distance for a whole ranked population
//! - [`sort_by_crowding`]: deterministic ordering by descending distance
//!
//! All objectives are **minimized**.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use serde::{Deserialize, Serialize};
use u_metaheur::ga::multi_objective;

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    /// Indices within a front are ascending.
    pub fronts: Vec<Vec<usize>>,
}

impl From<multi_objective::NondominatedSortResult> for NondominatedSortResult {
    fn from(result: multi_objective::NondominatedSortResult) -> Self {
        let mut fronts = result.fronts;
        for front in &mut fronts {
            front.sort_unstable();
        }
        Self {
            ranks: result.ranks,
            fronts,
        }
    }
}

/// Fast non-dominated sorting (Deb et al., 2002), O(m * n²).
///
/// Delegates to [`u_metaheur::ga::multi_objective::non_dominated_sort`];
/// empty input yields an empty result.
///
/// # Example
///
/// ```
/// use u_fjsp::pareto::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],  // Solution A
///     vec![3.0, 3.0],  // Solution B
///     vec![5.0, 1.0],  // Solution C
///     vec![4.0, 4.0],  // Solution D — dominated by B
/// ];
///
/// let result = non_dominated_sort(&objectives);
/// assert_eq!(result.fronts, vec![vec![0, 1, 2], vec![3]]);
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    if objectives.is_empty() {
        return NondominatedSortResult::default();
    }
    multi_objective::non_dominated_sort(objectives).into()
}

/// Crowding distance of the members of one front.
///
/// Per objective: stable sort of the members by value, both extremes get
/// `+∞`, each interior member adds `(next - prev) / range`. An objective
/// with zero range adds nothing to interior members. Fronts with at most
/// two members are all `+∞`.
///
/// # Example
///
/// ```
/// use u_fjsp::pareto::crowding_distance;
///
/// let distances = crowding_distance(&[vec![1.0, 5.0], vec![3.0, 3.0], vec![5.0, 1.0]]);
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!((distances[1] - 2.0).abs() < 1e-12);
/// ```
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    multi_objective::crowding_distance(objectives)
}

/// Crowding distance of every individual, computed front by front.
///
/// `result[i]` is the distance of individual `i` within its own front.
pub fn crowding_by_front(objectives: &[Vec<f64>], sorted: &NondominatedSortResult) -> Vec<f64> {
    let mut distances = vec![0.0; objectives.len()];
    for front in &sorted.fronts {
        let members: Vec<Vec<f64>> = front.iter().map(|&i| objectives[i].clone()).collect();
        for (&i, d) in front.iter().zip(crowding_distance(&members)) {
            distances[i] = d;
        }
    }
    distances
}

/// Orders indices by descending crowding distance; equal distances keep
/// ascending index order.
///
/// `distances` is indexed by the values in `indices`.
pub fn sort_by_crowding(indices: &[usize], distances: &[f64]) -> Vec<usize> {
    let mut ordered = indices.to_vec();
    ordered.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]).then(a.cmp(&b)));
    ordered
}

//! Quality indicators over a front snapshot.
//!
//! | Indicator | Meaning | Better |
//! |-----------|---------|--------|
//! | [`hypervolume`] | Volume dominated by the front up to a reference point | higher |
//! | [`spacing`] | Std. deviation of nearest-neighbour distances | lower |
//! | [`spread`] | Mean per-objective extent of the front | higher |
//!
//! All functions are read-only and take minimize-oriented vectors.
//!
//! # References
//! - Zitzler & Thiele (1999), "Multiobjective evolutionary algorithms: a comparative case study"
//! - Schott (1995), "Fault tolerant design using single and multicriteria genetic algorithm optimization"

use serde::{Deserialize, Serialize};

use super::dominance::dominates;
use crate::models::mean_std;

/// Hypervolume of a front relative to a reference point.
///
/// Points that are not strictly better than the reference in every
/// objective contribute nothing. Two objectives use a sweep; more use
/// recursive slicing on the last objective.
///
/// # Example
/// ```
/// use u_fjsp::pareto::hypervolume;
///
/// let front = vec![vec![1.0, 3.0], vec![2.0, 2.0], vec![3.0, 1.0]];
/// assert!((hypervolume(&front, &[4.0, 4.0]) - 6.0).abs() < 1e-12);
/// ```
pub fn hypervolume(front: &[Vec<f64>], reference: &[f64]) -> f64 {
    let points: Vec<Vec<f64>> = front
        .iter()
        .filter(|p| p.len() == reference.len() && p.iter().zip(reference).all(|(v, r)| v < r))
        .cloned()
        .collect();
    if points.is_empty() || reference.is_empty() {
        return 0.0;
    }
    match reference.len() {
        2 => hv_2d(points, reference),
        _ => hv_recursive(&points, reference),
    }
}

fn hv_2d(mut points: Vec<Vec<f64>>, reference: &[f64]) -> f64 {
    points.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    let mut volume = 0.0;
    let mut ceiling = reference[1];
    for p in &points {
        if p[1] < ceiling {
            volume += (reference[0] - p[0]) * (ceiling - p[1]);
            ceiling = p[1];
        }
    }
    volume
}

/// Recursive hypervolume via slicing on the last objective.
///
/// All points are strictly better than `reference`.
fn hv_recursive(points: &[Vec<f64>], reference: &[f64]) -> f64 {
    let d = reference.len();

    if d == 1 {
        let best = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
        return (reference[0] - best).max(0.0);
    }

    if points.len() == 1 {
        return points[0]
            .iter()
            .zip(reference)
            .map(|(&p, &r)| (r - p).max(0.0))
            .product();
    }

    let mut sorted: Vec<&Vec<f64>> = points.iter().collect();
    sorted.sort_by(|a, b| a[d - 1].total_cmp(&b[d - 1]));

    let sub_reference = &reference[..d - 1];
    let mut volume = 0.0;

    for i in 0..sorted.len() {
        let upper = sorted.get(i + 1).map_or(reference[d - 1], |p| p[d - 1]);
        let height = upper - sorted[i][d - 1];
        if height <= 0.0 {
            continue;
        }

        let projected: Vec<Vec<f64>> = sorted[..=i].iter().map(|p| p[..d - 1].to_vec()).collect();
        let slab = non_dominated(projected);
        volume += height
            * if d - 1 == 2 {
                hv_2d(slab, sub_reference)
            } else {
                hv_recursive(&slab, sub_reference)
            };
    }

    volume
}

/// Non-dominated subset; exact duplicates are kept once.
fn non_dominated(points: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    let mut kept: Vec<Vec<f64>> = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        let dominated = points.iter().any(|q| dominates(q, p));
        let repeated = points[..i].iter().any(|q| q == p);
        if !dominated && !repeated {
            kept.push(p.clone());
        }
    }
    kept
}

/// Spacing: population standard deviation of each member's Euclidean
/// distance to its nearest neighbour. 0 for fewer than two members.
pub fn spacing(front: &[Vec<f64>]) -> f64 {
    if front.len() < 2 {
        return 0.0;
    }
    let nearest: Vec<f64> = front
        .iter()
        .enumerate()
        .map(|(i, a)| {
            front
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, b)| euclidean(a, b))
                .fold(f64::INFINITY, f64::min)
        })
        .collect();
    mean_std(&nearest).1
}

/// Spread: Σ over objectives of (max - min), divided by the objective
/// count. 0 for an empty front.
pub fn spread(front: &[Vec<f64>]) -> f64 {
    let Some(first) = front.first() else {
        return 0.0;
    };
    let m = first.len();
    if m == 0 {
        return 0.0;
    }
    let total: f64 = (0..m)
        .map(|k| {
            let (lo, hi) = front.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[k]), hi.max(p[k]))
            });
            hi - lo
        })
        .sum();
    total / m as f64
}

/// Default hypervolume reference point: the worst value of every
/// objective scaled by `margin`.
///
/// When the worst value is not positive, scaling would not move it away
/// from the front, so `margin - 1` is added instead. Returns an empty
/// vector for an empty front.
///
/// # Example
/// ```
/// use u_fjsp::pareto::reference_point;
///
/// let r = reference_point(&[vec![10.0, -2.0], vec![20.0, -5.0]], 1.1);
/// assert!((r[0] - 22.0).abs() < 1e-12);
/// assert!((r[1] - (-1.9)).abs() < 1e-12);
/// ```
pub fn reference_point(front: &[Vec<f64>], margin: f64) -> Vec<f64> {
    let Some(first) = front.first() else {
        return Vec::new();
    };
    (0..first.len())
        .map(|k| {
            let worst = front.iter().map(|p| p[k]).fold(f64::NEG_INFINITY, f64::max);
            if worst > 0.0 {
                worst * margin
            } else {
                worst + (margin - 1.0)
            }
        })
        .collect()
}

/// Summary statistics of one objective over a front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSummary {
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Mean value.
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
}

/// Per-objective summary statistics of a front (empty for an empty front).
pub fn summarize(front: &[Vec<f64>]) -> Vec<ObjectiveSummary> {
    let Some(first) = front.first() else {
        return Vec::new();
    };
    (0..first.len())
        .map(|k| {
            let column: Vec<f64> = front.iter().map(|p| p[k]).collect();
            let (mean, std) = mean_std(&column);
            ObjectiveSummary {
                min: column.iter().copied().fold(f64::INFINITY, f64::min),
                max: column.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                mean,
                std,
            }
        })
        .collect()
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

//! Pareto dominance on minimize-oriented objective vectors.
//!
//! `a` dominates `b` iff `a[i] <= b[i]` for every objective and
//! `a[i] < b[i]` for at least one. Equal vectors do not dominate each
//! other.

use serde::{Deserialize, Serialize};

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other (incomparable or equal).
    Neither,
}

/// Compares two objective vectors of equal length for Pareto dominance.
pub fn compare(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "objective vectors must have equal length");

    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
        if a_better_in_some && b_better_in_some {
            return Dominance::Neither;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Whether `a` dominates `b`.
#[inline]
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    compare(a, b) == Dominance::Left
}

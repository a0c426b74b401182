//! Bounded Pareto archive.
//!
//! Stores mutually non-dominated `(solution, objectives)` pairs.
//!
//! # Insertion
//!
//! 1. Reject the newcomer if any entry dominates it.
//! 2. Remove every entry the newcomer dominates and append the newcomer.
//! 3. While over capacity, evict the entry with the smallest crowding
//!    distance; ties go to the earliest inserted entry.
//!
//! Entries with identical objective vectors do not dominate each other and
//! are both kept; crowding eviction thins them out once the archive is
//! full.
//!
//! Mutation takes `&mut self`, so a generation's updates are serialized on
//! the coordinating thread.

use serde::{Deserialize, Serialize};

use super::dominance::{compare, Dominance};
use super::sorting::crowding_distance;
use crate::error::ConfigurationError;

/// An archived solution with its objective vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry<S> {
    /// The stored solution.
    pub solution: S,
    /// Minimize-oriented objective vector.
    pub objectives: Vec<f64>,
    /// Insertion sequence number (monotonic per archive).
    pub sequence: u64,
}

/// Result of [`ParetoArchive::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertOutcome {
    /// An existing entry dominates the newcomer; the archive is unchanged.
    Rejected,
    /// The newcomer was added.
    Inserted {
        /// Entries removed because the newcomer dominates them.
        removed: usize,
        /// Entries evicted to restore capacity (may include the newcomer).
        evicted: usize,
        /// Whether the newcomer is still in the archive.
        retained: bool,
        /// Whether an entry with an identical objective vector already existed.
        duplicate: bool,
    },
}

impl InsertOutcome {
    /// Whether the newcomer is in the archive after insertion.
    pub fn is_retained(&self) -> bool {
        matches!(self, Self::Inserted { retained: true, .. })
    }

    /// Whether the archive now covers a point it did not cover before:
    /// the newcomer survived and is not a duplicate of an existing entry.
    pub fn is_improvement(&self) -> bool {
        matches!(
            self,
            Self::Inserted {
                retained: true,
                duplicate: false,
                ..
            }
        )
    }
}

/// Bounded-capacity Pareto archive.
///
/// # Example
/// ```
/// use u_fjsp::pareto::{InsertOutcome, ParetoArchive};
///
/// let mut archive = ParetoArchive::new(10).unwrap();
/// archive.insert("a", vec![1.0, 5.0]);
/// archive.insert("b", vec![5.0, 1.0]);
/// assert_eq!(archive.insert("c", vec![6.0, 6.0]), InsertOutcome::Rejected);
///
/// // "d" dominates both
/// archive.insert("d", vec![0.5, 0.5]);
/// assert_eq!(archive.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParetoArchive<S> {
    capacity: usize,
    entries: Vec<ArchiveEntry<S>>,
    next_sequence: u64,
}

impl<S> ParetoArchive<S> {
    /// Creates an empty archive.
    ///
    /// # Errors
    /// [`ConfigurationError::InvalidArchiveCapacity`] if `capacity == 0`.
    pub fn new(capacity: usize) -> Result<Self, ConfigurationError> {
        if capacity == 0 {
            return Err(ConfigurationError::InvalidArchiveCapacity(capacity));
        }
        Ok(Self {
            capacity,
            entries: Vec::new(),
            next_sequence: 0,
        })
    }

    /// Offers a solution to the archive.
    pub fn insert(&mut self, solution: S, objectives: Vec<f64>) -> InsertOutcome {
        let mut duplicate = false;
        for entry in &self.entries {
            if compare(&entry.objectives, &objectives) == Dominance::Left {
                return InsertOutcome::Rejected;
            }
            duplicate |= entry.objectives == objectives;
        }

        let before = self.entries.len();
        self.entries
            .retain(|e| compare(&objectives, &e.objectives) != Dominance::Left);
        let removed = before - self.entries.len();

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(ArchiveEntry {
            solution,
            objectives,
            sequence,
        });

        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            self.evict_most_crowded();
            evicted += 1;
        }

        InsertOutcome::Inserted {
            removed,
            evicted,
            retained: self.entries.iter().any(|e| e.sequence == sequence),
            duplicate,
        }
    }

    fn evict_most_crowded(&mut self) {
        let objectives: Vec<Vec<f64>> = self.entries.iter().map(|e| e.objectives.clone()).collect();
        let distances = crowding_distance(&objectives);
        let victim = distances
            .iter()
            .enumerate()
            .min_by(|&(a, da), &(b, db)| {
                da.total_cmp(db)
                    .then(self.entries[a].sequence.cmp(&self.entries[b].sequence))
            })
            .map(|(i, _)| i);
        if let Some(i) = victim {
            self.entries.remove(i);
        }
    }

    /// Current entries (mutually non-dominated), in insertion order.
    pub fn front(&self) -> &[ArchiveEntry<S>] {
        &self.entries
    }

    /// Alias of [`front`](Self::front).
    pub fn entries(&self) -> &[ArchiveEntry<S>] {
        &self.entries
    }

    /// Objective vectors of the current entries.
    pub fn objectives(&self) -> Vec<Vec<f64>> {
        self.entries.iter().map(|e| e.objectives.clone()).collect()
    }

    /// Iterates over entries.
    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveEntry<S>> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Consumes the archive, returning its entries.
    pub fn into_entries(self) -> Vec<ArchiveEntry<S>> {
        self.entries
    }
}

impl<'a, S> IntoIterator for &'a ParetoArchive<S> {
    type Item = &'a ArchiveEntry<S>;
    type IntoIter = std::slice::Iter<'a, ArchiveEntry<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pareto::dominance::dominates;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn assert_mutually_non_dominated<S>(archive: &ParetoArchive<S>) {
        for a in archive.iter() {
            for b in archive.iter() {
                assert!(!dominates(&a.objectives, &b.objectives));
            }
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            ParetoArchive::<()>::new(0).unwrap_err(),
            ConfigurationError::InvalidArchiveCapacity(0)
        );
    }

    #[test]
    fn test_dominated_insert_leaves_archive_unchanged() {
        let mut archive = ParetoArchive::new(10).unwrap();
        archive.insert(0, vec![1.0, 4.0]);
        archive.insert(1, vec![4.0, 1.0]);
        let before: Vec<(i32, Vec<f64>)> = archive
            .iter()
            .map(|e| (e.solution, e.objectives.clone()))
            .collect();

        assert_eq!(archive.insert(2, vec![5.0, 5.0]), InsertOutcome::Rejected);
        let after: Vec<(i32, Vec<f64>)> = archive
            .iter()
            .map(|e| (e.solution, e.objectives.clone()))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_dominating_insert_removes_exactly_dominated() {
        let mut archive = ParetoArchive::new(10).unwrap();
        archive.insert("a", vec![1.0, 9.0]);
        archive.insert("b", vec![4.0, 6.0]);
        archive.insert("c", vec![5.0, 5.0]);
        archive.insert("d", vec![9.0, 1.0]);

        let outcome = archive.insert("e", vec![3.0, 4.0]);
        assert_eq!(
            outcome,
            InsertOutcome::Inserted {
                removed: 2,
                evicted: 0,
                retained: true,
                duplicate: false
            }
        );
        let names: Vec<&str> = archive.iter().map(|e| e.solution).collect();
        assert_eq!(names, vec!["a", "d", "e"]);
    }

    #[test]
    fn test_duplicates_are_kept_but_not_improvements() {
        let mut archive = ParetoArchive::new(10).unwrap();
        assert!(archive.insert(0, vec![2.0, 2.0]).is_improvement());
        let outcome = archive.insert(1, vec![2.0, 2.0]);
        assert!(outcome.is_retained());
        assert!(!outcome.is_improvement());
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_capacity_evicts_most_crowded() {
        let mut archive = ParetoArchive::new(3).unwrap();
        archive.insert("left", vec![0.0, 10.0]);
        archive.insert("mid", vec![5.0, 5.0]);
        archive.insert("right", vec![10.0, 0.0]);
        // lands close to "mid": the two interior points crowd each other
        let outcome = archive.insert("near-mid", vec![5.5, 4.0]);
        assert!(matches!(outcome, InsertOutcome::Inserted { evicted: 1, .. }));
        assert_eq!(archive.len(), 3);
        let names: Vec<&str> = archive.iter().map(|e| e.solution).collect();
        assert!(names.contains(&"left") && names.contains(&"right"));
    }

    #[test]
    fn test_eviction_tie_breaks_by_earliest_insertion() {
        let mut archive = ParetoArchive::new(1).unwrap();
        archive.insert("first", vec![1.0, 2.0]);
        // two-member front: both infinite → earliest goes
        let outcome = archive.insert("second", vec![2.0, 1.0]);
        assert!(outcome.is_retained());
        assert_eq!(archive.front()[0].solution, "second");
    }

    #[test]
    fn test_random_inserts_keep_invariants() {
        let mut rng = SmallRng::seed_from_u64(42);
        for capacity in [1, 3, 8] {
            let mut archive = ParetoArchive::new(capacity).unwrap();
            for i in 0..300 {
                let objs: Vec<f64> = (0..3).map(|_| rng.random_range(0..20) as f64).collect();
                archive.insert(i, objs);
                assert!(archive.len() <= capacity);
                assert_mutually_non_dominated(&archive);
            }
            assert!(!archive.is_empty());
        }
    }

    #[test]
    fn test_sequence_numbers_monotonic() {
        let mut archive = ParetoArchive::new(5).unwrap();
        archive.insert('a', vec![1.0, 3.0]);
        archive.insert('b', vec![3.0, 1.0]);
        archive.insert('c', vec![2.0, 2.0]);
        let seqs: Vec<u64> = archive.iter().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(archive.capacity(), 5);
        assert_eq!(archive.objectives().len(), 3);
    }
}

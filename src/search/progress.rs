//! Progress reporting, run results and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::population::Solution;
use super::state::TerminationReason;
use crate::pareto::{hypervolume, spacing, ArchiveEntry, ParetoArchive};

/// Cooperative cancellation flag, checked between generations.
///
/// Clones share the same flag.
///
/// # Example
/// ```
/// use u_fjsp::search::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Per-generation payload handed to the progress hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Generation index (0 = initial population).
    pub generation: usize,
    /// Rank-0 members of the current population.
    pub front_size: usize,
    /// Archive entries.
    pub archive_size: usize,
    /// Per-objective minimum over the archive (minimize-oriented).
    pub best: Vec<f64>,
    /// Archive hypervolume against the run's reference point.
    pub hypervolume: Option<f64>,
    /// Archive spacing.
    pub spacing: Option<f64>,
}

impl ProgressReport {
    pub(crate) fn snapshot(
        generation: usize,
        front_size: usize,
        archive: &ParetoArchive<Solution>,
        reference: Option<&[f64]>,
        indicators: bool,
    ) -> Self {
        let objectives = archive.objectives();
        let best = objectives.first().map_or_else(Vec::new, |first| {
            (0..first.len())
                .map(|k| objectives.iter().map(|o| o[k]).fold(f64::INFINITY, f64::min))
                .collect()
        });
        let (hypervolume, spacing) = if indicators {
            (
                reference.map(|r| hypervolume(&objectives, r)),
                Some(spacing(&objectives)),
            )
        } else {
            (None, None)
        };
        Self {
            generation,
            front_size,
            archive_size: archive.len(),
            best,
            hypervolume,
            spacing,
        }
    }
}

/// Result of a solver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    /// Final archive content.
    pub front: Vec<ArchiveEntry<Solution>>,
    /// Generations completed after the initial population.
    pub generations: usize,
    /// Why the run stopped.
    pub termination: TerminationReason,
    /// One report per generation, including generation 0.
    pub history: Vec<ProgressReport>,
    /// Schedules decoded and evaluated.
    pub evaluations: usize,
    /// Reference point used for the hypervolume history, if any.
    pub reference_point: Option<Vec<f64>>,
}

impl SolveReport {
    /// Objective vectors of the front.
    pub fn objectives(&self) -> Vec<Vec<f64>> {
        self.front.iter().map(|e| e.objectives.clone()).collect()
    }

    /// Front entry with the smallest value of objective `k`.
    pub fn best_by(&self, k: usize) -> Option<&ArchiveEntry<Solution>> {
        self.front
            .iter()
            .filter(|e| k < e.objectives.len())
            .min_by(|a, b| a.objectives[k].total_cmp(&b.objectives[k]))
    }

    /// Hypervolume reported for the last generation.
    pub fn final_hypervolume(&self) -> Option<f64> {
        self.history.last().and_then(|r| r.hypervolume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Chromosome;
    use crate::models::Schedule;

    fn solution() -> Solution {
        Solution {
            chromosome: Chromosome::new(vec![0], vec![0]),
            schedule: Schedule::new(),
        }
    }

    #[test]
    fn test_token_shared_between_clones() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_snapshot_best_and_indicators() {
        let mut archive = ParetoArchive::new(10).unwrap();
        archive.insert(solution(), vec![1.0, 3.0]);
        archive.insert(solution(), vec![3.0, 1.0]);

        let report = ProgressReport::snapshot(4, 2, &archive, Some(&[4.0, 4.0]), true);
        assert_eq!(report.generation, 4);
        assert_eq!(report.archive_size, 2);
        assert_eq!(report.best, vec![1.0, 1.0]);
        // 3×1 + 1×2
        assert_eq!(report.hypervolume, Some(5.0));
        assert_eq!(report.spacing, Some(0.0));

        let quiet = ProgressReport::snapshot(4, 2, &archive, Some(&[4.0, 4.0]), false);
        assert_eq!(quiet.hypervolume, None);
        assert_eq!(quiet.spacing, None);
    }

    #[test]
    fn test_snapshot_empty_archive() {
        let archive: ParetoArchive<Solution> = ParetoArchive::new(3).unwrap();
        let report = ProgressReport::snapshot(0, 0, &archive, None, true);
        assert!(report.best.is_empty());
        assert_eq!(report.hypervolume, None);
        assert_eq!(report.spacing, Some(0.0));
    }
}

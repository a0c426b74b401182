//! Mutable state of one run, owned by the coordinating thread.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::config::SearchConfig;
use super::population::{Individual, Solution};
use super::progress::{CancellationToken, ProgressReport, SolveReport};
use super::state::{SearchState, TerminationReason};
use crate::error::ConfigurationError;
use crate::pareto::{
    crowding_by_front, non_dominated_sort, reference_point, sort_by_crowding, ParetoArchive,
};

/// Margin applied to the worst initial values when no reference point is configured.
pub(crate) const REFERENCE_MARGIN: f64 = 1.1;

/// Population, ranking buffers, archive and counters of a run.
///
/// Created per run and dropped into a [`SolveReport`]; nothing outlives it.
pub(crate) struct SearchContext {
    pub(crate) state: SearchState,
    pub(crate) population: Vec<Individual>,
    /// Pareto rank of each population member within the pool it survived from.
    pub(crate) ranks: Vec<usize>,
    /// Crowding distance of each population member within its front.
    pub(crate) crowding: Vec<f64>,
    pub(crate) archive: ParetoArchive<Solution>,
    pub(crate) reference: Option<Vec<f64>>,
    pub(crate) generation: usize,
    /// Consecutive generations without an archive improvement.
    pub(crate) stagnant: usize,
    pub(crate) evaluations: usize,
    pub(crate) history: Vec<ProgressReport>,
    pub(crate) rng: SmallRng,
}

impl SearchContext {
    pub(crate) fn new(config: &SearchConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            state: SearchState::Initialized,
            population: Vec::with_capacity(config.population_size),
            ranks: Vec::new(),
            crowding: Vec::new(),
            archive: ParetoArchive::new(config.archive_capacity)?,
            reference: config.reference_point.clone(),
            generation: 0,
            stagnant: 0,
            evaluations: 0,
            history: Vec::new(),
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    pub(crate) fn transition(&mut self, next: SearchState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        log::trace!("generation {}: {:?} -> {:?}", self.generation, self.state, next);
        self.state = next;
    }

    /// Fixes the hypervolume reference point from the first evaluated batch
    /// unless one was configured.
    pub(crate) fn ensure_reference(&mut self, batch: &[Individual]) {
        if self.reference.is_none() {
            let objectives: Vec<Vec<f64>> = batch.iter().map(|i| i.objectives.clone()).collect();
            let reference = reference_point(&objectives, REFERENCE_MARGIN);
            log::debug!("derived hypervolume reference point {reference:?}");
            self.reference = Some(reference);
        }
    }

    /// Offers every individual to the archive in order. Returns whether any
    /// of them was an improvement.
    pub(crate) fn update_archive(&mut self, batch: &[Individual]) -> bool {
        let mut improved = false;
        for individual in batch {
            let outcome = self
                .archive
                .insert(individual.to_solution(), individual.objectives.clone());
            improved |= outcome.is_improvement();
        }
        self.evaluations += batch.len();
        if !improved {
            log::debug!(
                "generation {}: archive rejected all {} candidates",
                self.generation,
                batch.len()
            );
        }
        improved
    }

    /// Merges the current population with `offspring` and keeps `size`
    /// survivors: whole fronts in rank order, then the partially fitting
    /// front by descending crowding distance.
    pub(crate) fn survive(&mut self, offspring: Vec<Individual>, size: usize) {
        let mut merged = std::mem::take(&mut self.population);
        merged.extend(offspring);

        let objectives: Vec<Vec<f64>> = merged.iter().map(|i| i.objectives.clone()).collect();
        let sorted = non_dominated_sort(&objectives);
        let crowding = crowding_by_front(&objectives, &sorted);

        let mut chosen: Vec<usize> = Vec::with_capacity(size);
        for front in &sorted.fronts {
            let room = size.saturating_sub(chosen.len());
            if room == 0 {
                break;
            }
            if front.len() <= room {
                chosen.extend_from_slice(front);
            } else {
                chosen.extend(sort_by_crowding(front, &crowding).into_iter().take(room));
            }
        }

        self.ranks = chosen.iter().map(|&i| sorted.ranks[i]).collect();
        self.crowding = chosen.iter().map(|&i| crowding[i]).collect();
        let mut slots: Vec<Option<Individual>> = merged.into_iter().map(Some).collect();
        self.population = chosen.iter().filter_map(|&i| slots[i].take()).collect();
    }

    /// Replaces the population with `batch`, ranked on its own.
    pub(crate) fn rank_batch(&mut self, batch: Vec<Individual>) {
        self.population.clear();
        let size = batch.len();
        self.survive(batch, size);
    }

    /// Number of rank-0 members in the population.
    pub(crate) fn front_size(&self) -> usize {
        self.ranks.iter().filter(|&&r| r == 0).count()
    }

    /// Tournament on (rank ascending, crowding descending); the first
    /// contestant wins ties.
    pub(crate) fn tournament(&mut self, size: usize) -> usize {
        let n = self.population.len();
        let mut best = self.rng.random_range(0..n);
        for _ in 1..size {
            let challenger = self.rng.random_range(0..n);
            if self.beats(challenger, best) {
                best = challenger;
            }
        }
        best
    }

    fn beats(&self, a: usize, b: usize) -> bool {
        self.ranks[a] < self.ranks[b]
            || (self.ranks[a] == self.ranks[b] && self.crowding[a] > self.crowding[b])
    }

    /// Stop condition checked at a generation boundary.
    pub(crate) fn stop_reason(
        &self,
        config: &SearchConfig,
        cancel: &CancellationToken,
    ) -> Option<TerminationReason> {
        if cancel.is_cancelled() {
            Some(TerminationReason::Cancelled)
        } else if self.generation >= config.max_generations {
            Some(TerminationReason::MaxGenerations)
        } else if config
            .stagnation_limit
            .is_some_and(|limit| self.stagnant >= limit)
        {
            Some(TerminationReason::Stagnation)
        } else {
            None
        }
    }

    /// Builds the report for the current generation and hands it to `hook`.
    pub(crate) fn report(&mut self, indicators: bool, hook: &mut dyn FnMut(&ProgressReport)) {
        let report = ProgressReport::snapshot(
            self.generation,
            self.front_size(),
            &self.archive,
            self.reference.as_deref(),
            indicators,
        );
        log::debug!(
            "generation {}: front {}, archive {}, best {:?}, hypervolume {:?}",
            report.generation,
            report.front_size,
            report.archive_size,
            report.best,
            report.hypervolume
        );
        hook(&report);
        self.history.push(report);
    }

    pub(crate) fn into_report(self, termination: TerminationReason) -> SolveReport {
        SolveReport {
            front: self.archive.into_entries(),
            generations: self.generation,
            termination,
            history: self.history,
            evaluations: self.evaluations,
            reference_point: self.reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Chromosome;
    use crate::models::Schedule;

    fn individual(objectives: Vec<f64>) -> Individual {
        Individual {
            chromosome: Chromosome::new(Vec::new(), Vec::new()),
            schedule: Schedule::new(),
            objectives,
        }
    }

    fn context() -> SearchContext {
        SearchContext::new(&SearchConfig::default()).unwrap()
    }

    #[test]
    fn test_survive_fills_front_by_front() {
        let mut ctx = context();
        ctx.rank_batch(vec![
            individual(vec![1.0, 5.0]),
            individual(vec![5.0, 1.0]),
            individual(vec![6.0, 6.0]),
        ]);
        ctx.survive(
            vec![
                individual(vec![3.0, 3.0]),
                individual(vec![2.0, 4.0]),
                individual(vec![7.0, 7.0]),
            ],
            4,
        );
        // front 0 has four members: all fit exactly
        assert_eq!(ctx.population.len(), 4);
        assert!(ctx.ranks.iter().all(|&r| r == 0));
        assert!(ctx
            .population
            .iter()
            .all(|i| i.objectives != vec![6.0, 6.0] && i.objectives != vec![7.0, 7.0]));
    }

    #[test]
    fn test_survive_truncates_partial_front_by_crowding() {
        let mut ctx = context();
        ctx.rank_batch(vec![
            individual(vec![0.0, 10.0]),
            individual(vec![4.0, 6.0]),
            individual(vec![5.0, 5.0]),
            individual(vec![10.0, 0.0]),
        ]);
        ctx.survive(Vec::new(), 3);
        let kept: Vec<Vec<f64>> = ctx.population.iter().map(|i| i.objectives.clone()).collect();
        // extremes are infinite; (4,6) is 1.0 crowded vs (5,5) at 1.2
        assert_eq!(kept, vec![vec![0.0, 10.0], vec![10.0, 0.0], vec![5.0, 5.0]]);
    }

    #[test]
    fn test_tournament_prefers_lower_rank() {
        let mut ctx = context();
        ctx.rank_batch(vec![individual(vec![1.0, 1.0]), individual(vec![2.0, 2.0])]);
        // with every member entered many times the rank-0 one always wins
        for _ in 0..20 {
            assert_eq!(ctx.tournament(64), 0);
        }
    }

    #[test]
    fn test_stop_reason_order() {
        let config = SearchConfig::default()
            .with_max_generations(5)
            .with_stagnation_limit(Some(2));
        let cancel = CancellationToken::new();
        let mut ctx = context();
        assert_eq!(ctx.stop_reason(&config, &cancel), None);
        ctx.stagnant = 2;
        assert_eq!(ctx.stop_reason(&config, &cancel), Some(TerminationReason::Stagnation));
        ctx.generation = 5;
        assert_eq!(ctx.stop_reason(&config, &cancel), Some(TerminationReason::MaxGenerations));
        cancel.cancel();
        assert_eq!(ctx.stop_reason(&config, &cancel), Some(TerminationReason::Cancelled));
    }

    #[test]
    fn test_update_archive_reports_improvement() {
        let mut ctx = context();
        assert!(ctx.update_archive(&[individual(vec![2.0, 2.0])]));
        assert!(!ctx.update_archive(&[individual(vec![3.0, 3.0]), individual(vec![2.0, 2.0])]));
        assert!(ctx.update_archive(&[individual(vec![1.0, 3.0])]));
        assert_eq!(ctx.evaluations, 4);
    }
}

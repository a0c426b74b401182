//! Random-sampling baseline.
//!
//! Every generation draws a fresh batch of random chromosomes; only the
//! archive carries information across generations. Useful as a reference
//! when judging what the evolutionary operators contribute.

use super::config::SearchConfig;
use super::context::SearchContext;
use super::engine::check_reference;
use super::population::Evaluator;
use super::progress::{CancellationToken, ProgressReport, SolveReport};
use super::solver::Solver;
use super::state::{SearchState, TerminationReason};
use crate::decoder::ScheduleDecoder;
use crate::encoding::Chromosome;
use crate::error::{DecodeError, Result};
use crate::evaluation::ObjectiveSet;
use crate::graph::DisjunctiveGraph;
use crate::models::Instance;

/// Random search with the same stop conditions and reporting as
/// [`Nsga2`](super::Nsga2).
///
/// Uses `population_size` as the batch size; the crossover, mutation and
/// tournament settings are ignored.
#[derive(Debug)]
pub struct RandomSearch<'a> {
    instance: &'a Instance,
    graph: DisjunctiveGraph,
    objectives: ObjectiveSet,
    config: SearchConfig,
}

impl<'a> RandomSearch<'a> {
    /// Validates the configuration and builds the disjunctive graph.
    pub fn new(instance: &'a Instance, objectives: ObjectiveSet, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        check_reference(&config, &objectives)?;
        let graph = DisjunctiveGraph::build(instance)?;
        Ok(Self {
            instance,
            graph,
            objectives,
            config,
        })
    }

    fn execute(
        &self,
        ctx: &mut SearchContext,
        cancel: &CancellationToken,
        hook: &mut dyn FnMut(&ProgressReport),
    ) -> std::result::Result<TerminationReason, DecodeError> {
        let config = &self.config;
        let evaluator = Evaluator::new(
            ScheduleDecoder::new(self.instance, &self.graph),
            &self.objectives,
            config.parallel,
        );

        ctx.transition(SearchState::Evaluating);
        loop {
            let batch: Vec<Chromosome> = (0..config.population_size)
                .map(|_| Chromosome::random(self.instance, &mut ctx.rng))
                .collect();
            let batch = evaluator.evaluate(batch)?;
            ctx.ensure_reference(&batch);
            let improved = ctx.update_archive(&batch);

            ctx.transition(SearchState::Ranking);
            ctx.rank_batch(batch);
            // the first batch is generation 0
            if !ctx.history.is_empty() {
                ctx.generation += 1;
                ctx.stagnant = if improved { 0 } else { ctx.stagnant + 1 };
            }
            ctx.report(config.indicators, hook);

            if let Some(reason) = ctx.stop_reason(config, cancel) {
                ctx.transition(SearchState::Terminated(reason));
                return Ok(reason);
            }
            ctx.transition(SearchState::Selecting);
            ctx.transition(SearchState::Varying);
            ctx.transition(SearchState::Evaluating);
        }
    }
}

impl Solver for RandomSearch<'_> {
    fn name(&self) -> &str {
        "random"
    }

    fn solve(
        &mut self,
        cancel: &CancellationToken,
        hook: &mut dyn FnMut(&ProgressReport),
    ) -> Result<SolveReport> {
        let mut ctx = SearchContext::new(&self.config)?;
        log::info!(
            "random search on '{}': batch {}, max generations {}",
            self.instance.name(),
            self.config.population_size,
            self.config.max_generations
        );
        let termination = self.execute(&mut ctx, cancel, hook)?;
        log::info!(
            "random search finished after {} generations ({termination}): archive {}",
            ctx.generation,
            ctx.archive.len()
        );
        Ok(ctx.into_report(termination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pareto::dominates;

    fn instance() -> Instance {
        Instance::from_options(
            "pair",
            2,
            vec![
                vec![vec![(0, 3), (1, 5)], vec![(0, 2), (1, 6)]],
                vec![vec![(0, 4), (1, 2)], vec![(0, 6), (1, 3)]],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_random_search_budget_and_front() {
        let instance = instance();
        let config = SearchConfig::default()
            .with_population_size(6)
            .with_max_generations(4)
            .with_stagnation_limit(None);
        let mut solver =
            RandomSearch::new(&instance, ObjectiveSet::makespan_and_flow_time(), config).unwrap();
        assert_eq!(solver.name(), "random");

        let mut calls = 0;
        let report = solver
            .solve(&CancellationToken::new(), &mut |_| calls += 1)
            .unwrap();
        assert_eq!(calls, 5);
        assert_eq!(report.generations, 4);
        assert_eq!(report.evaluations, 30);
        assert_eq!(report.termination, TerminationReason::MaxGenerations);
        for a in &report.front {
            assert!(a.solution.schedule.is_feasible(&instance));
            assert!(report.front.iter().all(|b| !dominates(&a.objectives, &b.objectives)));
        }
    }

    #[test]
    fn test_random_search_cancellation() {
        let instance = instance();
        let mut solver = RandomSearch::new(
            &instance,
            ObjectiveSet::makespan_and_flow_time(),
            SearchConfig::default().with_population_size(4),
        )
        .unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let report = solver.solve(&cancel, &mut |_| {}).unwrap();
        assert_eq!(report.termination, TerminationReason::Cancelled);
        assert_eq!(report.generations, 0);
    }
}

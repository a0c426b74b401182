//! NSGA-II over the OSV/MAV encoding.
//!
//! # Generation
//!
//! 1. Binary tournament on (rank, crowding) picks parent pairs
//! 2. Two-layer crossover with `crossover_rate`, two-layer mutation with
//!    `mutation_rate`
//! 3. Offspring are decoded and evaluated (rayon when `parallel`)
//! 4. The archive is updated serially from the offspring
//! 5. Parents + offspring are sorted; survivors fill the next population
//!    front by front, the partial front by descending crowding distance
//!
//! # Reference
//! Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"

use rand::Rng;

use super::config::SearchConfig;
use super::context::SearchContext;
use super::population::Evaluator;
use super::progress::{CancellationToken, ProgressReport, SolveReport};
use super::solver::Solver;
use super::state::{SearchState, TerminationReason};
use crate::decoder::ScheduleDecoder;
use crate::encoding::Chromosome;
use crate::error::{ConfigurationError, DecodeError, Result};
use crate::evaluation::ObjectiveSet;
use crate::graph::DisjunctiveGraph;
use crate::models::Instance;

/// NSGA-II solver bound to one instance.
///
/// # Example
/// ```
/// use u_fjsp::evaluation::ObjectiveSet;
/// use u_fjsp::models::Instance;
/// use u_fjsp::search::{Nsga2, SearchConfig, TerminationReason};
///
/// let instance = Instance::from_options(
///     "tiny",
///     2,
///     vec![
///         vec![vec![(0, 3), (1, 5)], vec![(0, 2), (1, 6)]],
///         vec![vec![(0, 4), (1, 2)], vec![(0, 6), (1, 3)]],
///     ],
/// )
/// .unwrap();
///
/// let config = SearchConfig::default()
///     .with_population_size(10)
///     .with_max_generations(5)
///     .with_stagnation_limit(None);
/// let mut nsga2 = Nsga2::new(&instance, ObjectiveSet::makespan_and_flow_time(), config).unwrap();
/// let report = nsga2.run().unwrap();
///
/// assert_eq!(report.termination, TerminationReason::MaxGenerations);
/// assert_eq!(report.history.len(), 6);
/// assert!(report.front.iter().all(|e| e.solution.schedule.is_feasible(&instance)));
/// ```
#[derive(Debug)]
pub struct Nsga2<'a> {
    instance: &'a Instance,
    graph: DisjunctiveGraph,
    objectives: ObjectiveSet,
    config: SearchConfig,
    state: SearchState,
}

impl<'a> Nsga2<'a> {
    /// Validates the configuration and builds the disjunctive graph.
    ///
    /// # Errors
    /// [`Error::Configuration`](crate::Error::Configuration) for invalid
    /// parameters or a reference point whose dimension differs from the
    /// objective count.
    pub fn new(instance: &'a Instance, objectives: ObjectiveSet, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        check_reference(&config, &objectives)?;
        let graph = DisjunctiveGraph::build(instance)?;
        Ok(Self {
            instance,
            graph,
            objectives,
            config,
            state: SearchState::Initialized,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Registered objectives.
    pub fn objectives(&self) -> &ObjectiveSet {
        &self.objectives
    }

    /// Graph shared by all decodes.
    pub fn graph(&self) -> &DisjunctiveGraph {
        &self.graph
    }

    /// State reached by the last run (`Initialized` before any run).
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Runs without cancellation or progress hook.
    pub fn run(&mut self) -> Result<SolveReport> {
        self.run_with(&CancellationToken::new(), |_| {})
    }

    /// Runs until a stop condition, calling `hook` after ranking and archive
    /// update of every generation (generation 0 is the initial population).
    ///
    /// # Errors
    /// [`Error::Decode`](crate::Error::Decode) if any candidate fails to
    /// decode; the run is aborted and no partial front is returned.
    pub fn run_with<F>(&mut self, cancel: &CancellationToken, mut hook: F) -> Result<SolveReport>
    where
        F: FnMut(&ProgressReport),
    {
        let mut ctx = SearchContext::new(&self.config)?;
        log::info!(
            "nsga2 on '{}': {} jobs, {} operations, {} machines, objectives {:?}, population {}, max generations {}",
            self.instance.name(),
            self.instance.job_count(),
            self.instance.operation_count(),
            self.instance.machine_count(),
            self.objectives.names(),
            self.config.population_size,
            self.config.max_generations
        );

        let outcome = self.execute(&mut ctx, cancel, &mut hook);
        self.state = ctx.state;
        let termination = match outcome {
            Ok(reason) => reason,
            Err(err) => {
                log::error!("nsga2 aborted at generation {}: {err}", ctx.generation);
                return Err(err.into());
            }
        };

        log::info!(
            "nsga2 finished after {} generations ({termination}): archive {}, {} evaluations",
            ctx.generation,
            ctx.archive.len(),
            ctx.evaluations
        );
        Ok(ctx.into_report(termination))
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
        let initial = self.initial_population(ctx);
        let population = evaluator.evaluate(initial)?;
        ctx.ensure_reference(&population);
        ctx.update_archive(&population);

        ctx.transition(SearchState::Ranking);
        ctx.rank_batch(population);
        ctx.report(config.indicators, hook);

        loop {
            if let Some(reason) = ctx.stop_reason(config, cancel) {
                ctx.transition(SearchState::Terminated(reason));
                return Ok(reason);
            }

            ctx.transition(SearchState::Selecting);
            let pairs: Vec<(usize, usize)> = (0..config.population_size.div_ceil(2))
                .map(|_| {
                    (
                        ctx.tournament(config.tournament_size),
                        ctx.tournament(config.tournament_size),
                    )
                })
                .collect();

            ctx.transition(SearchState::Varying);
            let offspring = self.vary(ctx, &pairs);

            ctx.transition(SearchState::Evaluating);
            let offspring = evaluator.evaluate(offspring)?;
            let improved = ctx.update_archive(&offspring);

            ctx.transition(SearchState::Ranking);
            ctx.survive(offspring, config.population_size);
            ctx.generation += 1;
            ctx.stagnant = if improved { 0 } else { ctx.stagnant + 1 };
            ctx.report(config.indicators, hook);
        }
    }

    /// First member assigns every operation to its fastest machine; the
    /// rest are half random, half load-balanced.
    fn initial_population(&self, ctx: &mut SearchContext) -> Vec<Chromosome> {
        (0..self.config.population_size)
            .map(|i| {
                if i == 0 {
                    Chromosome::fastest(self.instance, &mut ctx.rng)
                } else if ctx.rng.random_bool(0.5) {
                    Chromosome::random(self.instance, &mut ctx.rng)
                } else {
                    Chromosome::load_balanced(self.instance, &mut ctx.rng)
                }
            })
            .collect()
    }

    fn vary(&self, ctx: &mut SearchContext, pairs: &[(usize, usize)]) -> Vec<Chromosome> {
        let config = &self.config;
        let operators = config.operators;
        let mut offspring = Vec::with_capacity(config.population_size);

        for &(a, b) in pairs {
            let p1 = &ctx.population[a].chromosome;
            let p2 = &ctx.population[b].chromosome;
            let (c1, c2) = if ctx.rng.random_bool(config.crossover_rate) {
                operators.crossover(p1, p2, self.instance, &mut ctx.rng)
            } else {
                (p1.clone(), p2.clone())
            };

            for mut child in [c1, c2] {
                if offspring.len() == config.population_size {
                    break;
                }
                if ctx.rng.random_bool(config.mutation_rate) {
                    operators.mutate(&mut child, self.instance, &mut ctx.rng);
                }
                offspring.push(child);
            }
        }
        offspring
    }
}

impl Solver for Nsga2<'_> {
    fn name(&self) -> &str {
        "nsga2"
    }

    fn solve(
        &mut self,
        cancel: &CancellationToken,
        hook: &mut dyn FnMut(&ProgressReport),
    ) -> Result<SolveReport> {
        self.run_with(cancel, hook)
    }
}

pub(crate) fn check_reference(
    config: &SearchConfig,
    objectives: &ObjectiveSet,
) -> std::result::Result<(), ConfigurationError> {
    match &config.reference_point {
        Some(reference) if reference.len() != objectives.len() => {
            Err(ConfigurationError::ReferencePointDimension {
                expected: objectives.len(),
                found: reference.len(),
            })
        }
        _ => Ok(()),
    }
}

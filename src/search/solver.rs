//! Interchangeable solver contract.

use super::progress::{CancellationToken, ProgressReport, SolveReport};
use crate::error::Result;

/// A multi-objective FJSP solver.
///
/// Implementations own their instance view, objectives and configuration;
/// a run only needs a cancellation token and a progress hook.
///
/// # Example
/// ```
/// use u_fjsp::evaluation::ObjectiveSet;
/// use u_fjsp::models::Instance;
/// use u_fjsp::search::{CancellationToken, Nsga2, RandomSearch, SearchConfig, Solver};
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
/// let config = SearchConfig::default().with_population_size(8).with_max_generations(3);
///
/// let mut solvers: Vec<Box<dyn Solver + '_>> = vec![
///     Box::new(Nsga2::new(&instance, ObjectiveSet::makespan_and_flow_time(), config.clone()).unwrap()),
///     Box::new(RandomSearch::new(&instance, ObjectiveSet::makespan_and_flow_time(), config).unwrap()),
/// ];
/// for solver in &mut solvers {
///     let report = solver.solve(&CancellationToken::new(), &mut |_| {}).unwrap();
///     assert!(!report.front.is_empty());
/// }
/// ```
pub trait Solver {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Runs to termination, invoking `hook` once per generation on the
    /// calling thread.
    fn solve(
        &mut self,
        cancel: &CancellationToken,
        hook: &mut dyn FnMut(&ProgressReport),
    ) -> Result<SolveReport>;
}

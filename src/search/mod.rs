//! Multi-objective evolutionary search.
//!
//! # Submodules
//!
//! - [`SearchConfig`]: parameters (serde, builder, validation)
//! - [`Nsga2`]: NSGA-II engine with stagnation and cancellation
//! - [`RandomSearch`]: random-sampling baseline
//! - [`Solver`]: the contract both implement
//!
//! # Concurrency
//!
//! One generational loop runs on the calling thread. Offspring are decoded
//! and evaluated on the rayon pool when `parallel` is set; the instance,
//! graph and objectives are shared read-only. The archive and ranking
//! buffers are touched only after the parallel batch has been collected.
//! The progress hook runs synchronously on the calling thread, so a slow
//! hook delays the next generation. Cancellation is checked only between
//! generations.

mod config;
mod context;
mod engine;
mod population;
mod progress;
mod random;
mod solver;
mod state;

pub use config::SearchConfig;
pub use engine::Nsga2;
pub use population::{Individual, Solution};
pub use progress::{CancellationToken, ProgressReport, SolveReport};
pub use random::RandomSearch;
pub use solver::Solver;
pub use state::{SearchState, TerminationReason};

//! Multi-objective machinery on minimize-oriented vectors.
//!
//! # Submodules
//!
//! - [`dominance`]: Pareto dominance test
//! - [`sorting`]: non-dominated sorting and crowding distance
//! - [`archive`]: bounded archive of non-dominated solutions
//! - [`indicators`]: hypervolume, spacing and spread

pub mod archive;
pub mod dominance;
pub mod indicators;
pub mod sorting;

pub use archive::{ArchiveEntry, InsertOutcome, ParetoArchive};
pub use dominance::{compare, dominates, Dominance};
pub use indicators::{
    hypervolume, reference_point, spacing, spread, summarize, ObjectiveSummary,
};
pub use sorting::{
    crowding_by_front, crowding_distance, non_dominated_sort, sort_by_crowding,
    NondominatedSortResult,
};

//! Chromosome encoding and variation operators.
//!
//! Uses the OSV/MAV dual-vector encoding.
//!
//! # Encoding
//!
//! - **OSV** (Operation Sequence Vector): permutation with repetition of job
//!   indices. The k-th occurrence of job j = j's k-th operation.
//! - **MAV** (Machine Assignment Vector): machine for each operation id.
//!
//! # Submodules
//!
//! - [`operators`]: Runtime-selectable crossover and mutation strategies
//!
//! # Reference
//! - Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"
//! - Bierwirth (1995), "A generalized permutation approach to JSSP"

mod chromosome;
pub mod operators;

pub(crate) use chromosome::check_assignment;
pub use chromosome::{
    insert_mutation, invert_mutation, lox_crossover, pox_crossover, resample_mutation,
    swap_assignment_mutation, swap_mutation, two_point_assignment_crossover,
    uniform_assignment_crossover, Chromosome,
};
pub use operators::GeneticOperators;

//! Configurable genetic operators for FJSP chromosomes.
//!
//! Provides runtime-selectable crossover and mutation strategies for both
//! chromosome layers via [`GeneticOperators`].
//!
//! # Usage
//!
//! ```
//! use u_fjsp::encoding::operators::{
//!     AssignmentCrossover, GeneticOperators, SequenceCrossover, SequenceMutation,
//! };
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.sequence_crossover, SequenceCrossover::Pox);
//! assert_eq!(ops.assignment_crossover, AssignmentCrossover::Uniform);
//! assert_eq!(ops.sequence_mutation, SequenceMutation::Swap);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::{
    insert_mutation, invert_mutation, lox_crossover, pox_crossover, resample_mutation,
    swap_assignment_mutation, swap_mutation, two_point_assignment_crossover,
    uniform_assignment_crossover, Chromosome,
};
use crate::models::Instance;

/// Crossover strategy for the sequencing (OSV) layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceCrossover {
    /// Precedence Operation Crossover (Bierwirth et al., 1996).
    Pox,
    /// Linear Order Crossover (Falkenauer & Bouffouix, 1991).
    Lox,
}

/// Crossover strategy for the machine-assignment (MAV) layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentCrossover {
    /// Exchange each gene with probability 0.5.
    Uniform,
    /// Exchange the genes between two cut points.
    TwoPoint,
}

/// Mutation strategy for the sequencing (OSV) layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceMutation {
    /// Swap two random positions.
    Swap,
    /// Remove and reinsert at a random position.
    Insert,
    /// Reverse a random segment.
    Invert,
}

/// Mutation strategy for the machine-assignment (MAV) layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentMutation {
    /// Move one operation to another candidate machine.
    Resample,
    /// Exchange the machines of two operations when both stay eligible.
    Swap,
}

/// Runtime-selectable genetic operators.
///
/// Every combination preserves OSV occurrence counts and candidate-machine
/// membership, so offspring always decode.
///
/// # Example
///
/// ```
/// use u_fjsp::encoding::operators::{
///     AssignmentCrossover, AssignmentMutation, GeneticOperators, SequenceCrossover,
///     SequenceMutation,
/// };
///
/// let ops = GeneticOperators {
///     sequence_crossover: SequenceCrossover::Lox,
///     assignment_crossover: AssignmentCrossover::TwoPoint,
///     sequence_mutation: SequenceMutation::Invert,
///     assignment_mutation: AssignmentMutation::Swap,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticOperators {
    /// OSV crossover strategy.
    pub sequence_crossover: SequenceCrossover,
    /// MAV crossover strategy.
    pub assignment_crossover: AssignmentCrossover,
    /// OSV mutation strategy.
    pub sequence_mutation: SequenceMutation,
    /// MAV mutation strategy.
    pub assignment_mutation: AssignmentMutation,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            sequence_crossover: SequenceCrossover::Pox,
            assignment_crossover: AssignmentCrossover::Uniform,
            sequence_mutation: SequenceMutation::Swap,
            assignment_mutation: AssignmentMutation::Resample,
        }
    }
}

impl GeneticOperators {
    /// Two-layer crossover: OSV first, then MAV between the resulting children.
    pub fn crossover<R: Rng>(
        &self,
        p1: &Chromosome,
        p2: &Chromosome,
        instance: &Instance,
        rng: &mut R,
    ) -> (Chromosome, Chromosome) {
        let job_count = instance.job_count();
        let (mut c1, mut c2) = match self.sequence_crossover {
            SequenceCrossover::Pox => pox_crossover(p1, p2, job_count, rng),
            SequenceCrossover::Lox => lox_crossover(p1, p2, job_count, rng),
        };
        match self.assignment_crossover {
            AssignmentCrossover::Uniform => uniform_assignment_crossover(&mut c1, &mut c2, rng),
            AssignmentCrossover::TwoPoint => two_point_assignment_crossover(&mut c1, &mut c2, rng),
        }
        (c1, c2)
    }

    /// Two-layer mutation: one OSV move and one MAV move.
    pub fn mutate<R: Rng>(&self, chromosome: &mut Chromosome, instance: &Instance, rng: &mut R) {
        match self.sequence_mutation {
            SequenceMutation::Swap => swap_mutation(chromosome, rng),
            SequenceMutation::Insert => insert_mutation(chromosome, rng),
            SequenceMutation::Invert => invert_mutation(chromosome, rng),
        }
        match self.assignment_mutation {
            AssignmentMutation::Resample => resample_mutation(chromosome, instance, rng),
            AssignmentMutation::Swap => swap_assignment_mutation(chromosome, instance, rng),
        }
    }
}

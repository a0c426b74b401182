//! OSV/MAV dual-vector chromosome for FJSP.
//!
//! # Encoding
//!
//! The chromosome consists of two vectors:
//! - **OSV** (`sequence`): permutation with repetition of job indices. The
//!   k-th occurrence of job `j` stands for operation `(j, k)`.
//! - **MAV** (`assignment`): one machine per global operation id, always
//!   drawn from that operation's candidate set.
//!
//! The per-machine sequencing layers are derived from both vectors: walking
//! the OSV, every operation is appended to the layer of its assigned
//! machine. Layers derived this way are always consistent with job
//! precedence, so decoding them never deadlocks.
//!
//! Every operator in this module preserves the OSV occurrence counts and
//! MAV candidate membership.
//!
//! # Reference
//! Bierwirth (1995), "A generalized permutation approach to JSSP";
//! Zhang et al. (2011), "An effective genetic algorithm for the flexible job-shop scheduling problem"

use rand::prelude::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::models::{Instance, OperationId};

/// OSV/MAV dual-vector chromosome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chromosome {
    /// Operation Sequence Vector: job indices in dispatch order.
    pub sequence: Vec<usize>,
    /// Machine Assignment Vector: machine per operation id.
    pub assignment: Vec<usize>,
}

impl Chromosome {
    /// Creates a chromosome from raw vectors without checking them.
    pub fn new(sequence: Vec<usize>, assignment: Vec<usize>) -> Self {
        Self {
            sequence,
            assignment,
        }
    }

    /// Creates a random chromosome (shuffled OSV, uniform candidate per operation).
    pub fn random<R: Rng>(instance: &Instance, rng: &mut R) -> Self {
        let sequence = random_sequence(instance, rng);
        let assignment = instance
            .operations()
            .map(|(_, op)| op.options.choose(rng).map_or(0, |o| o.machine))
            .collect();
        Self {
            sequence,
            assignment,
        }
    }

    /// Creates a load-balanced chromosome: random OSV, and every operation
    /// (in id order) goes to the candidate whose accumulated load plus the
    /// operation's duration is smallest.
    pub fn load_balanced<R: Rng>(instance: &Instance, rng: &mut R) -> Self {
        let sequence = random_sequence(instance, rng);
        let mut load = vec![0i64; instance.machine_count()];
        let assignment = instance
            .operations()
            .map(|(_, op)| {
                let best = op
                    .options
                    .iter()
                    .min_by_key(|o| load[o.machine] + o.duration)
                    .map_or(0, |o| o.machine);
                load[best] += op.duration_on(best).unwrap_or(0) + op.setup_time;
                best
            })
            .collect();
        Self {
            sequence,
            assignment,
        }
    }

    /// Creates a chromosome with random OSV that assigns every operation
    /// to its fastest candidate.
    pub fn fastest<R: Rng>(instance: &Instance, rng: &mut R) -> Self {
        let sequence = random_sequence(instance, rng);
        let assignment = instance
            .operations()
            .map(|(_, op)| op.fastest_option().map_or(0, |o| o.machine))
            .collect();
        Self {
            sequence,
            assignment,
        }
    }

    /// Resolves the OSV into global operation ids, in dispatch order.
    ///
    /// # Errors
    /// [`DecodeError::SequenceLength`], [`DecodeError::UnknownJob`] or
    /// [`DecodeError::JobOverflow`] when the OSV does not contain every job
    /// exactly as often as it has operations.
    pub fn operation_order(&self, instance: &Instance) -> Result<Vec<OperationId>, DecodeError> {
        let n = instance.operation_count();
        if self.sequence.len() != n {
            return Err(DecodeError::SequenceLength {
                expected: n,
                found: self.sequence.len(),
            });
        }

        let mut next = vec![0usize; instance.job_count()];
        let mut order = Vec::with_capacity(n);
        for &job in &self.sequence {
            let count = next.get_mut(job).ok_or(DecodeError::UnknownJob(job))?;
            let operations = instance.job(job).operation_count();
            if *count >= operations {
                return Err(DecodeError::JobOverflow { job, operations });
            }
            order.push(instance.operation_id(job, *count));
            *count += 1;
        }
        Ok(order)
    }

    /// Derives the per-machine sequencing layers.
    ///
    /// `layers[m]` lists the operations assigned to machine `m` in the order
    /// they appear in the OSV.
    ///
    /// # Errors
    /// Any OSV error of [`operation_order`](Self::operation_order),
    /// [`DecodeError::AssignmentLength`], or
    /// [`DecodeError::IneligibleMachine`] for an assignment outside the
    /// operation's candidate set.
    pub fn machine_sequences(
        &self,
        instance: &Instance,
    ) -> Result<Vec<Vec<OperationId>>, DecodeError> {
        check_assignment(&self.assignment, instance)?;
        let order = self.operation_order(instance)?;
        let mut layers = vec![Vec::new(); instance.machine_count()];
        for op in order {
            layers[self.assignment[op]].push(op);
        }
        Ok(layers)
    }

    /// Whether the chromosome is consistent with the instance.
    pub fn is_valid(&self, instance: &Instance) -> bool {
        check_assignment(&self.assignment, instance).is_ok()
            && self.operation_order(instance).is_ok()
    }
}

/// Checks MAV length and candidate membership.
pub(crate) fn check_assignment(assignment: &[usize], instance: &Instance) -> Result<(), DecodeError> {
    let n = instance.operation_count();
    if assignment.len() != n {
        return Err(DecodeError::AssignmentLength {
            expected: n,
            found: assignment.len(),
        });
    }
    for (op, &machine) in assignment.iter().enumerate() {
        if !instance.operation(op).is_eligible(machine) {
            return Err(DecodeError::IneligibleMachine {
                operation: op,
                machine,
            });
        }
    }
    Ok(())
}

fn random_sequence<R: Rng>(instance: &Instance, rng: &mut R) -> Vec<usize> {
    let mut sequence: Vec<usize> = instance.operations().map(|(_, op)| op.job).collect();
    sequence.shuffle(rng);
    sequence
}

// ======================== Sequencing crossover ========================

/// Performs POX (Precedence Operation Crossover) on the OSV layer.
///
/// Selects a random non-empty proper subset of jobs; their genes keep their
/// positions from the first parent, remaining positions are filled with the
/// other parent's remaining genes in order. Children inherit the MAV of the
/// parent that donated the fixed genes.
///
/// # Reference
/// Bierwirth et al. (1996), "On permutation representations for scheduling problems"
pub fn pox_crossover<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    job_count: usize,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    if job_count < 2 {
        return (p1.clone(), p2.clone());
    }

    let jobs: Vec<usize> = (0..job_count).collect();
    let set_size = rng.random_range(1..job_count);
    let mut selected = vec![false; job_count];
    for &j in jobs.choose_multiple(rng, set_size) {
        selected[j] = true;
    }
    let keep = |job: usize| selected.get(job).copied().unwrap_or(false);

    let child1 = Chromosome {
        sequence: pox_build_child(&p1.sequence, &p2.sequence, keep),
        assignment: p1.assignment.clone(),
    };
    let child2 = Chromosome {
        sequence: pox_build_child(&p2.sequence, &p1.sequence, keep),
        assignment: p2.assignment.clone(),
    };
    (child1, child2)
}

fn pox_build_child(template: &[usize], donor: &[usize], keep: impl Fn(usize) -> bool) -> Vec<usize> {
    let mut donor_iter = donor.iter().copied().filter(|&j| !keep(j));
    template
        .iter()
        .map(|&j| {
            if keep(j) {
                j
            } else {
                donor_iter.next().unwrap_or(j)
            }
        })
        .collect()
}

/// Performs LOX (Linear Order Crossover) on the OSV layer.
///
/// A random segment of the first parent is kept in place; the remaining
/// positions are filled, left to right, with the other parent's genes after
/// removing one occurrence per gene of the kept segment (multiset removal).
///
/// # Reference
/// Falkenauer & Bouffouix (1991), "A genetic algorithm for job shop"
pub fn lox_crossover<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    job_count: usize,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let len = p1.sequence.len();
    if len < 2 {
        return (p1.clone(), p2.clone());
    }
    let mut a = rng.random_range(0..len);
    let mut b = rng.random_range(0..len);
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }

    let child1 = Chromosome {
        sequence: lox_build_child(&p1.sequence, &p2.sequence, a, b, job_count),
        assignment: p1.assignment.clone(),
    };
    let child2 = Chromosome {
        sequence: lox_build_child(&p2.sequence, &p1.sequence, a, b, job_count),
        assignment: p2.assignment.clone(),
    };
    (child1, child2)
}

fn lox_build_child(
    template: &[usize],
    donor: &[usize],
    a: usize,
    b: usize,
    job_count: usize,
) -> Vec<usize> {
    let mut reserved = vec![0usize; job_count];
    for &j in &template[a..=b] {
        if let Some(r) = reserved.get_mut(j) {
            *r += 1;
        }
    }
    let mut fill = donor.iter().copied().filter(|&j| match reserved.get_mut(j) {
        Some(r) if *r > 0 => {
            *r -= 1;
            false
        }
        _ => true,
    });

    let mut child = Vec::with_capacity(template.len());
    for i in 0..template.len() {
        if (a..=b).contains(&i) {
            child.push(template[i]);
        } else {
            child.push(fill.next().unwrap_or(template[i]));
        }
    }
    child
}

// ======================== Assignment crossover ========================

/// Uniform crossover on the MAV layer: each gene is exchanged between the
/// two children with probability 0.5.
pub fn uniform_assignment_crossover<R: Rng>(c1: &mut Chromosome, c2: &mut Chromosome, rng: &mut R) {
    let len = c1.assignment.len().min(c2.assignment.len());
    for i in 0..len {
        if rng.random_bool(0.5) {
            std::mem::swap(&mut c1.assignment[i], &mut c2.assignment[i]);
        }
    }
}

/// Two-point crossover on the MAV layer: genes between two random cut
/// points are exchanged between the children.
pub fn two_point_assignment_crossover<R: Rng>(
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    rng: &mut R,
) {
    let len = c1.assignment.len().min(c2.assignment.len());
    if len < 2 {
        return;
    }
    let mut a = rng.random_range(0..len);
    let mut b = rng.random_range(0..len);
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    c1.assignment[a..=b].swap_with_slice(&mut c2.assignment[a..=b]);
}

// ======================== Mutation operators ========================

/// Swap mutation: exchanges two random positions in the OSV.
pub fn swap_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) {
    let len = chromosome.sequence.len();
    if len < 2 {
        return;
    }
    let i = rng.random_range(0..len);
    let j = rng.random_range(0..len);
    chromosome.sequence.swap(i, j);
}

/// Insert mutation: removes an element and reinserts it at a random position.
pub fn insert_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) {
    let len = chromosome.sequence.len();
    if len < 2 {
        return;
    }
    let from = rng.random_range(0..len);
    let to = rng.random_range(0..len);
    let item = chromosome.sequence.remove(from);
    chromosome.sequence.insert(to, item);
}

/// Invert mutation: reverses a random segment of the OSV.
pub fn invert_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) {
    let len = chromosome.sequence.len();
    if len < 2 {
        return;
    }
    let mut i = rng.random_range(0..len);
    let mut j = rng.random_range(0..len);
    if i > j {
        std::mem::swap(&mut i, &mut j);
    }
    chromosome.sequence[i..=j].reverse();
}

/// Resample mutation: moves one random operation to a different candidate
/// machine (no-op when the drawn operation has a single candidate).
pub fn resample_mutation<R: Rng>(chromosome: &mut Chromosome, instance: &Instance, rng: &mut R) {
    let n = chromosome.assignment.len().min(instance.operation_count());
    if n == 0 {
        return;
    }
    let op = rng.random_range(0..n);
    let current = chromosome.assignment[op];
    let others: Vec<usize> = instance
        .operation(op)
        .options
        .iter()
        .map(|o| o.machine)
        .filter(|&m| m != current)
        .collect();
    if let Some(&m) = others.choose(rng) {
        chromosome.assignment[op] = m;
    }
}

/// Swap-assignment mutation: exchanges the machines of two random
/// operations when each is eligible on the other's machine.
pub fn swap_assignment_mutation<R: Rng>(
    chromosome: &mut Chromosome,
    instance: &Instance,
    rng: &mut R,
) {
    let n = chromosome.assignment.len().min(instance.operation_count());
    if n < 2 {
        return;
    }
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    let (ma, mb) = (chromosome.assignment[a], chromosome.assignment[b]);
    if instance.operation(a).is_eligible(mb) && instance.operation(b).is_eligible(ma) {
        chromosome.assignment.swap(a, b);
    }
}

//! Semi-active schedule decoder.
//!
//! Turns an encoded solution (machine assignment + per-machine operation
//! order) into concrete start and end times.
//!
//! # Algorithm
//!
//! Each machine keeps a head pointer into its sequencing layer. Machines are
//! swept in index order; a machine's head advances while the operation under
//! it has its job predecessor already placed. The operation starts at
//! `max(job-ready, machine-ready, release)` and ends at
//! `start + setup + duration(machine)`, where machine-ready is the end of the
//! last interval placed on that machine. Layers are never reordered, so the
//! result is the unique semi-active schedule of the encoding, whatever the
//! sweep order. A full sweep that places nothing means the layer order and
//! the job routings wait on each other: [`DecodeError::Deadlock`].
//!
//! Inconsistent encodings are reported, never repaired.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 7.1

use crate::encoding::{check_assignment, Chromosome};
use crate::error::DecodeError;
use crate::graph::DisjunctiveGraph;
use crate::models::{Instance, OperationId, Schedule, ScheduledOperation};

/// Decodes chromosomes of one instance.
///
/// Holds only shared references, so one decoder can serve every worker
/// thread of a generation.
///
/// # Example
/// ```
/// use u_fjsp::decoder::ScheduleDecoder;
/// use u_fjsp::encoding::Chromosome;
/// use u_fjsp::graph::DisjunctiveGraph;
/// use u_fjsp::models::Instance;
///
/// let instance = Instance::from_options(
///     "tiny",
///     2,
///     vec![
///         vec![vec![(0, 3), (1, 5)], vec![(0, 2), (1, 4)]],
///         vec![vec![(0, 4), (1, 2)], vec![(0, 6), (1, 3)]],
///     ],
/// )
/// .unwrap();
/// let graph = DisjunctiveGraph::build(&instance).unwrap();
/// let decoder = ScheduleDecoder::new(&instance, &graph);
///
/// let chromosome = Chromosome::new(vec![0, 1, 1, 0], vec![0, 1, 1, 0]);
/// let schedule = decoder.decode(&chromosome).unwrap();
/// assert_eq!(schedule.makespan(), 9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScheduleDecoder<'a> {
    instance: &'a Instance,
    graph: &'a DisjunctiveGraph,
}

impl<'a> ScheduleDecoder<'a> {
    /// Creates a decoder over an instance and its graph.
    pub fn new(instance: &'a Instance, graph: &'a DisjunctiveGraph) -> Self {
        Self { instance, graph }
    }

    /// The decoded instance.
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Decodes a chromosome.
    ///
    /// Equivalent to [`decode_layers`](Self::decode_layers) on the layers
    /// derived by [`Chromosome::machine_sequences`].
    pub fn decode(&self, chromosome: &Chromosome) -> Result<Schedule, DecodeError> {
        let layers = chromosome.machine_sequences(self.instance)?;
        self.decode_layers(&chromosome.assignment, &layers)
    }

    /// Decodes an explicit machine assignment and per-machine sequences.
    ///
    /// # Errors
    /// - assignment length or candidate membership violations
    /// - [`DecodeError::LayerCount`] if `layers.len()` differs from the machine count
    /// - [`DecodeError::MisplacedOperation`] for an operation listed on a machine
    ///   it is not assigned to (or an unknown id)
    /// - [`DecodeError::DuplicateOperation`] / [`DecodeError::MissingOperation`]
    /// - [`DecodeError::Deadlock`]
    pub fn decode_layers(
        &self,
        assignment: &[usize],
        layers: &[Vec<OperationId>],
    ) -> Result<Schedule, DecodeError> {
        let instance = self.instance;
        let n = instance.operation_count();
        let machine_count = instance.machine_count();

        check_assignment(assignment, instance)?;
        if layers.len() != machine_count {
            return Err(DecodeError::LayerCount {
                expected: machine_count,
                found: layers.len(),
            });
        }

        let mut seen = vec![false; n];
        for (machine, layer) in layers.iter().enumerate() {
            for &op in layer {
                if op >= n || assignment[op] != machine {
                    return Err(DecodeError::MisplacedOperation {
                        operation: op,
                        machine,
                    });
                }
                if seen[op] {
                    return Err(DecodeError::DuplicateOperation(op));
                }
                seen[op] = true;
            }
        }
        if let Some(op) = seen.iter().position(|&s| !s) {
            return Err(DecodeError::MissingOperation(op));
        }

        let mut entries: Vec<Option<ScheduledOperation>> = vec![None; n];
        let mut heads = vec![0usize; machine_count];
        let mut machine_ready = vec![0i64; machine_count];
        let mut placed = 0usize;

        while placed < n {
            let before = placed;
            for (machine, layer) in layers.iter().enumerate() {
                while let Some(&op) = layer.get(heads[machine]) {
                    let job_ready = match self.graph.job_predecessor(op) {
                        None => 0,
                        Some(pred) => match entries[pred] {
                            Some(e) => e.end,
                            None => break,
                        },
                    };

                    let operation = instance.operation(op);
                    let duration = operation
                        .duration_on(machine)
                        .ok_or(DecodeError::IneligibleMachine {
                            operation: op,
                            machine,
                        })?;
                    let start = job_ready
                        .max(machine_ready[machine])
                        .max(operation.release_time);
                    let end = start + operation.setup_time + duration;

                    entries[op] = Some(ScheduledOperation {
                        operation: op,
                        job: operation.job,
                        position: operation.position,
                        machine,
                        start,
                        end,
                        setup: operation.setup_time,
                    });
                    machine_ready[machine] = end;
                    heads[machine] += 1;
                    placed += 1;
                }
            }
            if placed == before {
                return Err(DecodeError::Deadlock { placed, total: n });
            }
        }

        Ok(Schedule::from_operations(
            entries.into_iter().flatten().collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, Operation};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn two_by_two() -> Instance {
        Instance::from_options(
            "two-by-two",
            2,
            vec![
                vec![vec![(0, 3), (1, 5)], vec![(0, 2), (1, 4)]],
                vec![vec![(0, 4), (1, 2)], vec![(0, 6), (1, 3)]],
            ],
        )
        .unwrap()
    }

    fn times(schedule: &Schedule) -> Vec<(usize, i64, i64)> {
        schedule
            .operations
            .iter()
            .map(|o| (o.machine, o.start, o.end))
            .collect()
    }

    #[test]
    fn test_hand_worked_two_by_two() {
        let inst = two_by_two();
        let graph = DisjunctiveGraph::build(&inst).unwrap();
        let decoder = ScheduleDecoder::new(&inst, &graph);

        // OSV: J0, J1, J1, J0  → O(0,0), O(1,0), O(1,1), O(0,1)
        // MAV: O(0,0)→M0, O(0,1)→M1, O(1,0)→M1, O(1,1)→M0
        // M0: [O(0,0), O(1,1)], M1: [O(1,0), O(0,1)]
        let ch = Chromosome::new(vec![0, 1, 1, 0], vec![0, 1, 1, 0]);
        let s = decoder.decode(&ch).unwrap();

        // O(0,0): M0 [0, 3)
        // O(1,0): M1 [0, 2)
        // O(1,1): M0 [max(2, 3), 3 + 6) = [3, 9)
        // O(0,1): M1 [max(3, 2), 3 + 4) = [3, 7)
        assert_eq!(times(&s), vec![(0, 0, 3), (1, 3, 7), (1, 0, 2), (0, 3, 9)]);
        assert_eq!(s.makespan(), 9);
        assert!(s.verify(&inst).is_empty());
    }

    #[test]
    fn test_hand_worked_fast_assignment() {
        let inst = two_by_two();
        let graph = DisjunctiveGraph::build(&inst).unwrap();
        let decoder = ScheduleDecoder::new(&inst, &graph);

        // M0: [O(0,0), O(0,1)], M1: [O(1,0), O(1,1)]
        let s = decoder
            .decode_layers(&[0, 0, 1, 1], &[vec![0, 1], vec![2, 3]])
            .unwrap();
        assert_eq!(times(&s), vec![(0, 0, 3), (0, 3, 5), (1, 0, 2), (1, 2, 5)]);
        assert_eq!(s.makespan(), 5);
    }

    #[test]
    fn test_machine_waits_for_job_predecessor() {
        let inst = two_by_two();
        let graph = DisjunctiveGraph::build(&inst).unwrap();
        let decoder = ScheduleDecoder::new(&inst, &graph);

        // M0 runs O(1,1) first, which needs O(1,0) on M1 to finish.
        let s = decoder
            .decode_layers(&[0, 1, 1, 0], &[vec![3, 0], vec![2, 1]])
            .unwrap();
        // O(1,0) M1 [0,2); O(1,1) M0 [2,8); O(0,0) M0 [8,11); O(0,1) M1 [11,15)
        assert_eq!(times(&s), vec![(0, 8, 11), (1, 11, 15), (1, 0, 2), (0, 2, 8)]);
        assert!(s.verify(&inst).is_empty());
    }

    #[test]
    fn test_deadlock_detected() {
        let inst = two_by_two();
        let graph = DisjunctiveGraph::build(&inst).unwrap();
        let decoder = ScheduleDecoder::new(&inst, &graph);

        // M0 waits on O(0,1) (needs O(0,0), last on M1); M1 waits on O(1,1) (needs O(1,0), last on M0).
        let result = decoder.decode_layers(&[1, 0, 0, 1], &[vec![1, 2], vec![3, 0]]);
        assert_eq!(result, Err(DecodeError::Deadlock { placed: 0, total: 4 }));
    }

    #[test]
    fn test_inconsistent_layers_rejected() {
        let inst = two_by_two();
        let graph = DisjunctiveGraph::build(&inst).unwrap();
        let decoder = ScheduleDecoder::new(&inst, &graph);
        let assignment = [0, 0, 1, 1];

        assert_eq!(
            decoder.decode_layers(&assignment, &[vec![0, 1]]),
            Err(DecodeError::LayerCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            decoder.decode_layers(&assignment, &[vec![0, 1, 2], vec![3]]),
            Err(DecodeError::MisplacedOperation {
                operation: 2,
                machine: 0
            })
        );
        assert_eq!(
            decoder.decode_layers(&assignment, &[vec![0, 1, 0], vec![2, 3]]),
            Err(DecodeError::DuplicateOperation(0))
        );
        assert_eq!(
            decoder.decode_layers(&assignment, &[vec![0], vec![2, 3]]),
            Err(DecodeError::MissingOperation(1))
        );
        assert_eq!(
            decoder.decode_layers(&assignment, &[vec![0, 1], vec![2, 9]]),
            Err(DecodeError::MisplacedOperation {
                operation: 9,
                machine: 1
            })
        );
        assert!(matches!(
            decoder.decode_layers(&[0, 0, 1], &[vec![0, 1], vec![2]]),
            Err(DecodeError::AssignmentLength { .. })
        ));
    }

    #[test]
    fn test_setup_and_release() {
        let inst = Instance::new(
            "setup",
            1,
            vec![
                Job::new("J0").with_operation(
                    Operation::new(0, 0)
                        .with_option(0, 4)
                        .with_setup(2)
                        .with_release(5),
                ),
                Job::new("J1").with_operation(Operation::new(1, 0).with_option(0, 3)),
            ],
        )
        .unwrap();
        let graph = DisjunctiveGraph::build(&inst).unwrap();
        let decoder = ScheduleDecoder::new(&inst, &graph);

        let s = decoder.decode(&Chromosome::new(vec![0, 1], vec![0, 0])).unwrap();
        assert_eq!(times(&s), vec![(0, 5, 11), (0, 11, 14)]);
        assert_eq!(s.operations[0].setup, 2);
        assert!(s.verify(&inst).is_empty());
    }

    #[test]
    fn test_decode_is_deterministic_and_feasible() {
        let inst = Instance::from_options(
            "random",
            3,
            vec![
                vec![vec![(0, 3), (1, 5)], vec![(1, 4)], vec![(0, 2), (2, 2)]],
                vec![vec![(0, 2), (2, 6)], vec![(1, 3)]],
                vec![vec![(2, 4)], vec![(0, 1), (1, 1), (2, 1)], vec![(1, 7)]],
            ],
        )
        .unwrap();
        let graph = DisjunctiveGraph::build(&inst).unwrap();
        let decoder = ScheduleDecoder::new(&inst, &graph);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..100 {
            let ch = Chromosome::random(&inst, &mut rng);
            let a = decoder.decode(&ch).unwrap();
            let b = decoder.decode(&ch).unwrap();
            assert_eq!(a, b);
            assert!(a.verify(&inst).is_empty());
            assert!(a.makespan() >= graph.lower_bound());

            let layers = ch.machine_sequences(&inst).unwrap();
            assert_eq!(decoder.decode_layers(&ch.assignment, &layers).unwrap(), a);
        }
    }
}

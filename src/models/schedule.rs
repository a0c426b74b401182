//! Schedule (decoded solution) model.
//!
//! A schedule resolves every operation to a (machine, start, end) triple.
//! Schedules are produced by the decoder; [`Schedule::verify`] re-checks the
//! feasibility invariants and reports violations instead of panicking.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

use super::{Instance, OperationId};

/// A complete schedule, one entry per operation, indexed by operation id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Scheduled operations. `operations[id]` belongs to operation `id`.
    pub operations: Vec<ScheduledOperation>,
}

/// An operation placed on a machine during a time interval.
///
/// The interval `[start, end)` includes the setup portion
/// `[start, start + setup)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledOperation {
    /// Global operation id.
    pub operation: OperationId,
    /// Parent job (denormalized for query convenience).
    pub job: usize,
    /// Position within the job.
    pub position: usize,
    /// Assigned machine.
    pub machine: usize,
    /// Start time.
    pub start: i64,
    /// End time.
    pub end: i64,
    /// Setup portion of the interval.
    pub setup: i64,
}

/// A feasibility violation found by [`Schedule::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Operation the violation was detected on.
    pub operation: OperationId,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Schedule does not cover exactly the instance's operations.
    Coverage,
    /// Operation placed on a machine outside its candidate set.
    IneligibleMachine,
    /// `end != start + setup + duration(machine)`.
    DurationMismatch,
    /// Recorded setup differs from the operation's setup time.
    SetupMismatch,
    /// Operation started before its job predecessor finished.
    PrecedenceViolation,
    /// Two operations overlap on the same machine.
    MachineOverlap,
    /// Operation started before its release time.
    ReleaseViolation,
}

impl ScheduledOperation {
    /// Occupied duration (end - start).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Processing duration excluding setup.
    #[inline]
    pub fn process_time(&self) -> i64 {
        self.duration() - self.setup
    }
}

impl Violation {
    fn new(violation_type: ViolationType, operation: OperationId, message: String) -> Self {
        Self {
            violation_type,
            operation,
            message,
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schedule from entries ordered by operation id.
    pub fn from_operations(operations: Vec<ScheduledOperation>) -> Self {
        Self { operations }
    }

    /// Makespan: latest end time (0 for an empty schedule).
    pub fn makespan(&self) -> i64 {
        self.operations.iter().map(|o| o.end).max().unwrap_or(0)
    }

    /// Entry of an operation.
    pub fn get(&self, op: OperationId) -> Option<&ScheduledOperation> {
        self.operations.get(op)
    }

    /// Completion time of a job (latest end of its operations).
    pub fn job_completion(&self, job: usize) -> Option<i64> {
        self.operations
            .iter()
            .filter(|o| o.job == job)
            .map(|o| o.end)
            .max()
    }

    /// Completion time of every job in `0..job_count` (0 for jobs without entries).
    pub fn job_completions(&self, job_count: usize) -> Vec<i64> {
        let mut completion = vec![0i64; job_count];
        for o in &self.operations {
            if let Some(c) = completion.get_mut(o.job) {
                *c = (*c).max(o.end);
            }
        }
        completion
    }

    /// Entries on a machine, sorted by start time.
    pub fn machine_timeline(&self, machine: usize) -> Vec<&ScheduledOperation> {
        let mut entries: Vec<&ScheduledOperation> = self
            .operations
            .iter()
            .filter(|o| o.machine == machine)
            .collect();
        entries.sort_by_key(|o| (o.start, o.operation));
        entries
    }

    /// Busy time (processing + setup) of every machine in `0..machine_count`.
    pub fn machine_busy_times(&self, machine_count: usize) -> Vec<i64> {
        let mut busy = vec![0i64; machine_count];
        for o in &self.operations {
            if let Some(b) = busy.get_mut(o.machine) {
                *b += o.duration();
            }
        }
        busy
    }

    /// Busy time divided by makespan for every machine.
    ///
    /// Returns all zeros when the makespan is zero.
    pub fn machine_utilizations(&self, machine_count: usize) -> Vec<f64> {
        let horizon = self.makespan();
        self.machine_busy_times(machine_count)
            .into_iter()
            .map(|b| if horizon > 0 { b as f64 / horizon as f64 } else { 0.0 })
            .collect()
    }

    /// Total setup time over all operations.
    pub fn total_setup(&self) -> i64 {
        self.operations.iter().map(|o| o.setup).sum()
    }

    /// Number of scheduled operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the schedule has no entries.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Checks every feasibility invariant against the instance.
    ///
    /// Returns an empty list for a feasible schedule.
    pub fn verify(&self, instance: &Instance) -> Vec<Violation> {
        let mut violations = Vec::new();

        if self.operations.len() != instance.operation_count() {
            violations.push(Violation::new(
                ViolationType::Coverage,
                0,
                format!(
                    "schedule has {} entries, instance has {} operations",
                    self.operations.len(),
                    instance.operation_count()
                ),
            ));
            return violations;
        }

        for (id, entry) in self.operations.iter().enumerate() {
            let op = instance.operation(id);
            if entry.operation != id || (entry.job, entry.position) != instance.location(id) {
                violations.push(Violation::new(
                    ViolationType::Coverage,
                    id,
                    format!("entry {id} describes operation {}", entry.operation),
                ));
                continue;
            }

            match op.duration_on(entry.machine) {
                None => violations.push(Violation::new(
                    ViolationType::IneligibleMachine,
                    id,
                    format!("machine {} is not a candidate", entry.machine),
                )),
                Some(d) => {
                    if entry.end != entry.start + entry.setup + d {
                        violations.push(Violation::new(
                            ViolationType::DurationMismatch,
                            id,
                            format!(
                                "interval [{}, {}) does not match setup {} + duration {d}",
                                entry.start, entry.end, entry.setup
                            ),
                        ));
                    }
                }
            }

            if entry.setup != op.setup_time {
                violations.push(Violation::new(
                    ViolationType::SetupMismatch,
                    id,
                    format!("setup {} but operation requires {}", entry.setup, op.setup_time),
                ));
            }

            if entry.start < op.release_time {
                violations.push(Violation::new(
                    ViolationType::ReleaseViolation,
                    id,
                    format!("starts at {} before release {}", entry.start, op.release_time),
                ));
            }

            if entry.position > 0 {
                let prev = &self.operations[id - 1];
                if prev.end > entry.start {
                    violations.push(Violation::new(
                        ViolationType::PrecedenceViolation,
                        id,
                        format!(
                            "starts at {} before predecessor ends at {}",
                            entry.start, prev.end
                        ),
                    ));
                }
            }
        }

        for m in 0..instance.machine_count() {
            let timeline = self.machine_timeline(m);
            for pair in timeline.windows(2) {
                if pair[0].end > pair[1].start {
                    violations.push(Violation::new(
                        ViolationType::MachineOverlap,
                        pair[1].operation,
                        format!(
                            "overlaps operation {} on machine {m}",
                            pair[0].operation
                        ),
                    ));
                }
            }
        }

        violations
    }

    /// Whether [`verify`](Self::verify) finds no violations.
    pub fn is_feasible(&self, instance: &Instance) -> bool {
        self.verify(instance).is_empty()
    }
}

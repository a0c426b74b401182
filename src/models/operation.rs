//! Operation model.
//!
//! An operation is the smallest schedulable unit of work. It belongs to
//! exactly one job at a fixed position and can be processed on any machine
//! from its candidate set, with a machine-dependent processing time.
//!
//! # Duration Model
//!
//! The occupied interval of an operation on its machine is
//! `setup_time + duration(machine)`. Setup is sequence-independent.
//!
//! # Reference
//! Brandimarte (1993), "Routing and scheduling in a flexible job shop by tabu search"

use serde::{Deserialize, Serialize};

/// One (machine, processing time) alternative of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineOption {
    /// Machine index in `[0, machine_count)`.
    pub machine: usize,
    /// Processing time on that machine.
    pub duration: i64,
}

/// An operation (processing step of a job).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Parent job index.
    pub job: usize,
    /// Position within the job (0-indexed).
    pub position: usize,
    /// Candidate machines with their processing times. Never empty in a valid instance.
    pub options: Vec<MachineOption>,
    /// Setup time added in front of processing.
    pub setup_time: i64,
    /// Earliest start time.
    pub release_time: i64,
    /// Desired completion time. `None` = no due date.
    pub due_date: Option<i64>,
}

impl Operation {
    /// Creates an operation with no candidate machines yet.
    pub fn new(job: usize, position: usize) -> Self {
        Self {
            job,
            position,
            options: Vec::new(),
            setup_time: 0,
            release_time: 0,
            due_date: None,
        }
    }

    /// Adds a candidate machine.
    pub fn with_option(mut self, machine: usize, duration: i64) -> Self {
        self.options.push(MachineOption { machine, duration });
        self
    }

    /// Adds several candidate machines at once.
    pub fn with_options(mut self, options: impl IntoIterator<Item = (usize, i64)>) -> Self {
        self.options.extend(
            options
                .into_iter()
                .map(|(machine, duration)| MachineOption { machine, duration }),
        );
        self
    }

    /// Sets the setup time.
    pub fn with_setup(mut self, setup_time: i64) -> Self {
        self.setup_time = setup_time;
        self
    }

    /// Sets the release time.
    pub fn with_release(mut self, release_time: i64) -> Self {
        self.release_time = release_time;
        self
    }

    /// Sets the due date.
    pub fn with_due_date(mut self, due_date: i64) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Processing time on `machine`, or `None` if it is not a candidate.
    pub fn duration_on(&self, machine: usize) -> Option<i64> {
        self.options
            .iter()
            .find(|o| o.machine == machine)
            .map(|o| o.duration)
    }

    /// Whether `machine` is in the candidate set.
    pub fn is_eligible(&self, machine: usize) -> bool {
        self.options.iter().any(|o| o.machine == machine)
    }

    /// Candidate machine indices, in declaration order.
    pub fn candidate_machines(&self) -> Vec<usize> {
        self.options.iter().map(|o| o.machine).collect()
    }

    /// Shortest processing time over all candidates (0 if there are none).
    pub fn min_duration(&self) -> i64 {
        self.options.iter().map(|o| o.duration).min().unwrap_or(0)
    }

    /// Candidate with the shortest processing time (first wins on ties).
    pub fn fastest_option(&self) -> Option<MachineOption> {
        self.options.iter().copied().min_by_key(|o| o.duration)
    }

    /// Number of candidate machines.
    pub fn flexibility(&self) -> usize {
        self.options.len()
    }
}

//! Problem instance.
//!
//! An [`Instance`] bundles jobs and machines and is validated once at
//! construction; afterwards it is read-only for the whole run and can be
//! shared across worker threads without locking.
//!
//! Operations are numbered globally, job-major and position-minor:
//! `OperationId = offset(job) + position`. Every other module (graph,
//! encoding, decoder, schedule) indexes operations by this id.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::{Job, Machine, Operation};
use crate::error::{Error, Result};
use crate::validation::validate_instance;

/// Global operation index (job-major, position-minor).
pub type OperationId = usize;

/// A validated FJSP instance.
///
/// # Example
/// ```
/// use u_fjsp::models::Instance;
///
/// // 2 jobs × 2 operations, every operation eligible on both machines.
/// let instance = Instance::from_options(
///     "tiny",
///     2,
///     vec![
///         vec![vec![(0, 3), (1, 5)], vec![(0, 2), (1, 4)]],
///         vec![vec![(0, 4), (1, 2)], vec![(0, 6), (1, 3)]],
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(instance.job_count(), 2);
/// assert_eq!(instance.operation_count(), 4);
/// assert_eq!(instance.operation_id(1, 0), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InstanceData", into = "InstanceData")]
pub struct Instance {
    name: String,
    jobs: Vec<Job>,
    machines: Vec<Machine>,
    offsets: Vec<usize>,
    locations: Vec<(usize, usize)>,
}

/// Unvalidated wire form of an [`Instance`].
///
/// Deserializing an `Instance` goes through this type and runs the same
/// validation as [`Instance::with_machines`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceData {
    /// Instance name.
    pub name: String,
    /// Machines, indexed by position.
    pub machines: Vec<Machine>,
    /// Jobs, indexed by position.
    pub jobs: Vec<Job>,
}

/// Scalar descriptors of an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceFeatures {
    /// Number of jobs.
    pub num_jobs: usize,
    /// Number of machines.
    pub num_machines: usize,
    /// Number of operations.
    pub total_operations: usize,
    /// Mean number of candidate machines per operation.
    pub avg_flexibility: f64,
    /// Standard deviation of candidate machines per operation.
    pub std_flexibility: f64,
    /// `avg_flexibility / num_machines`.
    pub flexibility_ratio: f64,
    /// Mean over all (operation, machine) processing times.
    pub processing_time_mean: f64,
    /// Standard deviation of all processing times.
    pub processing_time_std: f64,
    /// Smallest processing time.
    pub processing_time_min: i64,
    /// Largest processing time.
    pub processing_time_max: i64,
}

impl Instance {
    /// Creates an instance with `machine_count` default machines.
    pub fn new(name: impl Into<String>, machine_count: usize, jobs: Vec<Job>) -> Result<Self> {
        Self::with_machines(name, Machine::numbered(machine_count), jobs)
    }

    /// Creates an instance with explicit machine definitions.
    ///
    /// # Errors
    /// [`Error::Validation`] listing every structural problem found.
    pub fn with_machines(
        name: impl Into<String>,
        machines: Vec<Machine>,
        jobs: Vec<Job>,
    ) -> Result<Self> {
        validate_instance(&machines, &jobs).map_err(Error::Validation)?;

        let mut offsets = Vec::with_capacity(jobs.len());
        let mut locations = Vec::new();
        for (j, job) in jobs.iter().enumerate() {
            offsets.push(locations.len());
            locations.extend((0..job.operations.len()).map(|p| (j, p)));
        }

        Ok(Self {
            name: name.into(),
            jobs,
            machines,
            offsets,
            locations,
        })
    }

    /// Builds an instance from a nested table: `jobs[j][p]` lists the
    /// `(machine, duration)` candidates of operation `p` of job `j`.
    pub fn from_options(
        name: impl Into<String>,
        machine_count: usize,
        table: Vec<Vec<Vec<(usize, i64)>>>,
    ) -> Result<Self> {
        let jobs = table
            .into_iter()
            .enumerate()
            .map(|(j, ops)| {
                ops.into_iter()
                    .enumerate()
                    .fold(Job::new(format!("J{j}")), |job, (p, options)| {
                        job.with_operation(Operation::new(j, p).with_options(options))
                    })
            })
            .collect();
        Self::new(name, machine_count, jobs)
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All jobs.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Job by index.
    pub fn job(&self, job: usize) -> &Job {
        &self.jobs[job]
    }

    /// All machines.
    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Number of machines.
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Total number of operations.
    pub fn operation_count(&self) -> usize {
        self.locations.len()
    }

    /// Global id of operation `position` of `job`.
    pub fn operation_id(&self, job: usize, position: usize) -> OperationId {
        self.offsets[job] + position
    }

    /// `(job, position)` of a global operation id.
    pub fn location(&self, op: OperationId) -> (usize, usize) {
        self.locations[op]
    }

    /// Operation by global id.
    pub fn operation(&self, op: OperationId) -> &Operation {
        let (j, p) = self.locations[op];
        &self.jobs[j].operations[p]
    }

    /// Global id range covered by a job's operations.
    pub fn operations_of(&self, job: usize) -> Range<OperationId> {
        let start = self.offsets[job];
        start..start + self.jobs[job].operations.len()
    }

    /// Iterates over `(id, operation)` pairs in id order.
    pub fn operations(&self) -> impl Iterator<Item = (OperationId, &Operation)> + '_ {
        self.jobs
            .iter()
            .flat_map(|j| j.operations.iter())
            .enumerate()
    }

    /// Computes scalar descriptors of the instance.
    pub fn features(&self) -> InstanceFeatures {
        let n_ops = self.operation_count();
        let flex: Vec<f64> = self
            .operations()
            .map(|(_, o)| o.flexibility() as f64)
            .collect();
        let times: Vec<f64> = self
            .operations()
            .flat_map(|(_, o)| o.options.iter().map(|c| c.duration as f64))
            .collect();

        let (avg_flexibility, std_flexibility) = mean_std(&flex);
        let (processing_time_mean, processing_time_std) = mean_std(&times);
        let all_durations = || {
            self.operations()
                .flat_map(|(_, o)| o.options.iter().map(|c| c.duration))
        };

        InstanceFeatures {
            num_jobs: self.job_count(),
            num_machines: self.machine_count(),
            total_operations: n_ops,
            avg_flexibility,
            std_flexibility,
            flexibility_ratio: if self.machine_count() == 0 {
                0.0
            } else {
                avg_flexibility / self.machine_count() as f64
            },
            processing_time_mean,
            processing_time_std,
            processing_time_min: all_durations().min().unwrap_or(0),
            processing_time_max: all_durations().max().unwrap_or(0),
        }
    }
}

/// Population mean and standard deviation (0, 0 for empty input).
pub(crate) fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

impl TryFrom<InstanceData> for Instance {
    type Error = Error;

    fn try_from(data: InstanceData) -> Result<Self> {
        Self::with_machines(data.name, data.machines, data.jobs)
    }
}

impl From<Instance> for InstanceData {
    fn from(instance: Instance) -> Self {
        Self {
            name: instance.name,
            machines: instance.machines,
            jobs: instance.jobs,
        }
    }
}

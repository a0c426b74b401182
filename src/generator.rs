//! Random FJSP instance generation.
//!
//! Each job gets a uniform number of operations in
//! `[min_operations, max_operations]`. Each operation is eligible on
//! `max(1, floor(machines × flexibility))` distinct machines drawn uniformly,
//! with an independent uniform duration per machine.

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::models::{Instance, Job, Operation};

/// Generator parameters.
///
/// # Example
/// ```
/// use u_fjsp::generator::{generate, GeneratorConfig};
///
/// let instance = generate(&GeneratorConfig::new(5, 3).with_flexibility(0.7)).unwrap();
/// assert_eq!(instance.job_count(), 5);
/// assert_eq!(instance.machine_count(), 3);
/// // floor(3 × 0.7) = 2 candidates per operation
/// assert!(instance.operations().all(|(_, op)| op.options.len() == 2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of jobs (≥ 1).
    pub jobs: usize,
    /// Number of machines (≥ 1).
    pub machines: usize,
    /// Fewest operations per job (≥ 1).
    pub min_operations: usize,
    /// Most operations per job.
    pub max_operations: usize,
    /// Shortest processing time (≥ 0).
    pub min_duration: i64,
    /// Longest processing time.
    pub max_duration: i64,
    /// Fraction of machines eligible per operation, in `(0, 1]`.
    pub flexibility: f64,
    /// When set, each job's last operation is due at this factor times the
    /// job's minimum total work.
    pub due_date_factor: Option<f64>,
    /// RNG seed.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            jobs: 10,
            machines: 5,
            min_operations: 1,
            max_operations: 5,
            min_duration: 1,
            max_duration: 10,
            flexibility: 0.5,
            due_date_factor: None,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    /// Default parameters with the given dimensions.
    pub fn new(jobs: usize, machines: usize) -> Self {
        Self {
            jobs,
            machines,
            ..Self::default()
        }
    }

    /// Sets the operations-per-job range.
    pub fn with_operations(mut self, min: usize, max: usize) -> Self {
        self.min_operations = min;
        self.max_operations = max;
        self
    }

    /// Sets the processing-time range.
    pub fn with_durations(mut self, min: i64, max: i64) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }

    /// Sets the flexibility ratio.
    pub fn with_flexibility(mut self, flexibility: f64) -> Self {
        self.flexibility = flexibility;
        self
    }

    /// Enables due dates.
    pub fn with_due_date_factor(mut self, factor: f64) -> Self {
        self.due_date_factor = Some(factor);
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        let invalid = |parameter, reason| Err(ConfigurationError::InvalidParameter { parameter, reason });
        if self.jobs == 0 {
            return invalid("jobs", "must be at least 1");
        }
        if self.machines == 0 {
            return invalid("machines", "must be at least 1");
        }
        if self.min_operations == 0 {
            return invalid("min_operations", "must be at least 1");
        }
        if self.max_operations < self.min_operations {
            return invalid("max_operations", "must not be below min_operations");
        }
        if self.min_duration < 0 {
            return invalid("min_duration", "must not be negative");
        }
        if self.max_duration < self.min_duration {
            return invalid("max_duration", "must not be below min_duration");
        }
        if !(self.flexibility > 0.0 && self.flexibility <= 1.0) {
            return Err(ConfigurationError::InvalidProbability {
                parameter: "flexibility",
                value: self.flexibility,
            });
        }
        if let Some(factor) = self.due_date_factor {
            if !(factor.is_finite() && factor > 0.0) {
                return invalid("due_date_factor", "must be positive");
            }
        }
        Ok(())
    }

    /// Candidate machines per operation.
    pub fn candidates_per_operation(&self) -> usize {
        ((self.machines as f64 * self.flexibility).floor() as usize).clamp(1, self.machines.max(1))
    }
}

/// Generates a validated instance. Equal configurations give equal instances.
///
/// # Errors
/// [`Error::Configuration`](crate::Error::Configuration) for out-of-range
/// parameters.
pub fn generate(config: &GeneratorConfig) -> Result<Instance> {
    config.validate()?;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let machines: Vec<usize> = (0..config.machines).collect();
    let per_operation = config.candidates_per_operation();

    let jobs: Vec<Job> = (0..config.jobs)
        .map(|j| {
            let count = rng.random_range(config.min_operations..=config.max_operations);
            let mut job = Job::new(format!("J{j}"));
            for p in 0..count {
                let mut eligible: Vec<usize> = machines
                    .choose_multiple(&mut rng, per_operation)
                    .copied()
                    .collect();
                eligible.sort_unstable();
                let options: Vec<(usize, i64)> = eligible
                    .into_iter()
                    .map(|m| (m, rng.random_range(config.min_duration..=config.max_duration)))
                    .collect();
                job = job.with_operation(Operation::new(j, p).with_options(options));
            }
            if let Some(factor) = config.due_date_factor {
                let due = (job.min_total_work() as f64 * factor).ceil() as i64;
                if let Some(last) = job.operations.last_mut() {
                    last.due_date = Some(due);
                }
            }
            job
        })
        .collect();

    let name = format!("random_{}x{}_s{}", config.jobs, config.machines, config.seed);
    log::debug!(
        "generated '{name}': {} operations, {per_operation} candidates each",
        jobs.iter().map(Job::operation_count).sum::<usize>()
    );
    Instance::new(name, config.machines, jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_generated_instance_respects_bounds() {
        let config = GeneratorConfig::new(8, 4)
            .with_operations(2, 4)
            .with_durations(3, 9)
            .with_flexibility(0.5);
        let instance = generate(&config).unwrap();

        assert_eq!(instance.job_count(), 8);
        for job in instance.jobs() {
            assert!((2..=4).contains(&job.operation_count()));
        }
        for (_, op) in instance.operations() {
            assert_eq!(op.options.len(), 2);
            let mut machines = op.candidate_machines();
            machines.dedup();
            assert_eq!(machines.len(), 2);
            assert!(op.options.iter().all(|o| (3..=9).contains(&o.duration) && o.machine < 4));
        }
    }

    #[test]
    fn test_same_seed_same_instance() {
        let config = GeneratorConfig::new(6, 3).with_seed(9);
        let a = generate(&config).unwrap();
        let b = generate(&config).unwrap();
        assert_eq!(a.jobs(), b.jobs());
        let c = generate(&config.clone().with_seed(10)).unwrap();
        assert_ne!(a.jobs(), c.jobs());
    }

    #[test]
    fn test_low_flexibility_keeps_one_candidate() {
        let instance = generate(&GeneratorConfig::new(3, 4).with_flexibility(0.1)).unwrap();
        assert!(instance.operations().all(|(_, op)| op.options.len() == 1));
    }

    #[test]
    fn test_full_flexibility() {
        let instance = generate(&GeneratorConfig::new(3, 4).with_flexibility(1.0)).unwrap();
        assert!(instance.operations().all(|(_, op)| op.candidate_machines() == vec![0, 1, 2, 3]));
    }

    #[test]
    fn test_due_dates() {
        let config = GeneratorConfig::new(4, 3).with_due_date_factor(1.5);
        let instance = generate(&config).unwrap();
        for job in instance.jobs() {
            let due = job.due_date().unwrap();
            assert!(due >= job.min_total_work());
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            generate(&GeneratorConfig::new(0, 3)),
            Err(Error::Configuration(ConfigurationError::InvalidParameter {
                parameter: "jobs",
                ..
            }))
        ));
        assert!(GeneratorConfig::new(2, 2).with_operations(3, 2).validate().is_err());
        assert!(GeneratorConfig::new(2, 2).with_durations(-1, 2).validate().is_err());
        assert!(matches!(
            GeneratorConfig::new(2, 2).with_flexibility(0.0).validate(),
            Err(ConfigurationError::InvalidProbability {
                parameter: "flexibility",
                ..
            })
        ));
    }

    #[test]
    fn test_generated_instances_always_validate() {
        for seed in 0..25 {
            let config = GeneratorConfig::new(1 + seed as usize % 7, 1 + seed as usize % 4)
                .with_flexibility(0.3 + (seed % 7) as f64 * 0.1)
                .with_durations(0, 5)
                .with_seed(seed);
            assert!(generate(&config).is_ok());
        }
    }
}

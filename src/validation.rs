//! Input validation for FJSP instances.
//!
//! Checks structural integrity of jobs, operations, and machines before any
//! search state is created. Detects:
//! - Missing machines or empty jobs
//! - Operations with no candidate machine
//! - Candidate machines outside `[0, machine_count)`
//! - Non-contiguous operation positions within a job
//! - Negative durations, setup or release times
//!
//! Every problem is collected; validation never stops at the first one.

use serde::{Deserialize, Serialize};

use crate::models::{Job, Machine};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// The instance declares no machines.
    NoMachines,
    /// A job has no operations.
    EmptyJob,
    /// An operation has an empty candidate-machine set.
    EmptyCandidates,
    /// A candidate references a machine outside `[0, machine_count)`.
    MachineOutOfRange,
    /// An operation's position does not match its index in the job.
    NonContiguousPosition,
    /// An operation's job index does not match the job holding it.
    MismatchedJob,
    /// The same machine appears twice in a candidate set.
    DuplicateCandidate,
    /// A duration, setup time or release time is negative.
    NegativeTime,
    /// A machine power level is negative or not finite.
    InvalidPower,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates machines and jobs of an instance.
///
/// Checks:
/// 1. At least one machine exists, with finite non-negative power levels
/// 2. Every job has at least one operation
/// 3. `operations[p].position == p` and `operations[p].job == j` for job `j`
/// 4. Every operation has at least one candidate, none repeated
/// 5. Every candidate machine is in range
/// 6. No negative durations, setup or release times
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(machines: &[Machine], jobs: &[Job]) -> ValidationResult {
    let mut errors = Vec::new();
    let machine_count = machines.len();

    if machines.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoMachines,
            "Instance declares no machines",
        ));
    }

    for (m, machine) in machines.iter().enumerate() {
        let valid = |p: f64| p.is_finite() && p >= 0.0;
        if !valid(machine.processing_power) || !valid(machine.idle_power) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPower,
                format!(
                    "Machine {m} ('{}') has invalid power levels ({}, {})",
                    machine.name, machine.processing_power, machine.idle_power
                ),
            ));
        }
    }

    for (j, job) in jobs.iter().enumerate() {
        if job.operations.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyJob,
                format!("Job {j} ('{}') has no operations", job.name),
            ));
        }

        for (p, op) in job.operations.iter().enumerate() {
            if op.position != p {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonContiguousPosition,
                    format!("Job {j}: operation at index {p} declares position {}", op.position),
                ));
            }
            if op.job != j {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MismatchedJob,
                    format!("Job {j}: operation {p} declares job {}", op.job),
                ));
            }

            if op.options.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::EmptyCandidates,
                    format!("Operation ({j}, {p}) has no candidate machine"),
                ));
            }

            for (i, option) in op.options.iter().enumerate() {
                if option.machine >= machine_count {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::MachineOutOfRange,
                        format!(
                            "Operation ({j}, {p}) references machine {} but only {machine_count} exist",
                            option.machine
                        ),
                    ));
                }
                if op.options[..i].iter().any(|o| o.machine == option.machine) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DuplicateCandidate,
                        format!(
                            "Operation ({j}, {p}) lists machine {} more than once",
                            option.machine
                        ),
                    ));
                }
                if option.duration < 0 {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::NegativeTime,
                        format!(
                            "Operation ({j}, {p}) has negative duration {} on machine {}",
                            option.duration, option.machine
                        ),
                    ));
                }
            }

            if op.setup_time < 0 || op.release_time < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeTime,
                    format!(
                        "Operation ({j}, {p}) has negative setup {} or release {}",
                        op.setup_time, op.release_time
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;

    fn sample_jobs() -> Vec<Job> {
        vec![
            Job::new("J0")
                .with_operation(Operation::new(0, 0).with_options([(0, 3), (1, 5)]))
                .with_operation(Operation::new(0, 1).with_option(1, 4)),
            Job::new("J1").with_operation(Operation::new(1, 0).with_option(0, 2)),
        ]
    }

    fn has(errors: &[ValidationError], kind: ValidationErrorKind) -> bool {
        errors.iter().any(|e| e.kind == kind)
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_instance(&Machine::numbered(2), &sample_jobs()).is_ok());
    }

    #[test]
    fn test_no_machines() {
        let errors = validate_instance(&[], &sample_jobs()).unwrap_err();
        assert!(has(&errors, ValidationErrorKind::NoMachines));
        // every candidate is now out of range as well
        assert!(has(&errors, ValidationErrorKind::MachineOutOfRange));
    }

    #[test]
    fn test_empty_job() {
        let jobs = vec![Job::new("empty")];
        let errors = validate_instance(&Machine::numbered(1), &jobs).unwrap_err();
        assert!(has(&errors, ValidationErrorKind::EmptyJob));
    }

    #[test]
    fn test_empty_candidates() {
        let jobs = vec![Job::new("J0").with_operation(Operation::new(0, 0))];
        let errors = validate_instance(&Machine::numbered(2), &jobs).unwrap_err();
        assert!(has(&errors, ValidationErrorKind::EmptyCandidates));
    }

    #[test]
    fn test_non_contiguous_positions() {
        let jobs = vec![Job::new("J0")
            .with_operation(Operation::new(0, 0).with_option(0, 1))
            .with_operation(Operation::new(0, 2).with_option(0, 1))];
        let errors = validate_instance(&Machine::numbered(1), &jobs).unwrap_err();
        assert!(has(&errors, ValidationErrorKind::NonContiguousPosition));
    }

    #[test]
    fn test_mismatched_job() {
        let jobs = vec![Job::new("J0").with_operation(Operation::new(3, 0).with_option(0, 1))];
        let errors = validate_instance(&Machine::numbered(1), &jobs).unwrap_err();
        assert!(has(&errors, ValidationErrorKind::MismatchedJob));
    }

    #[test]
    fn test_duplicate_candidate_and_negative_time() {
        let jobs = vec![Job::new("J0").with_operation(
            Operation::new(0, 0)
                .with_options([(0, 2), (0, -1)])
                .with_release(-5),
        )];
        let errors = validate_instance(&Machine::numbered(1), &jobs).unwrap_err();
        assert!(has(&errors, ValidationErrorKind::DuplicateCandidate));
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::NegativeTime)
                .count(),
            2
        );
    }

    #[test]
    fn test_invalid_power() {
        let machines = vec![Machine::new("M0").with_power(f64::NAN, 0.0)];
        let errors = validate_instance(&machines, &sample_jobs()[1..]).unwrap_err();
        assert!(has(&errors, ValidationErrorKind::InvalidPower));
    }

    #[test]
    fn test_multiple_errors() {
        let jobs = vec![
            Job::new("empty"),
            Job::new("J1").with_operation(Operation::new(1, 0).with_option(7, 1)),
        ];
        let errors = validate_instance(&Machine::numbered(2), &jobs).unwrap_err();
        assert!(errors.len() >= 2);
        assert!(has(&errors, ValidationErrorKind::EmptyJob));
        assert!(has(&errors, ValidationErrorKind::MachineOutOfRange));
    }
}

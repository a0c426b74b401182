//! Job model.
//!
//! A job is an ordered chain of operations: operation `i` cannot start
//! before operation `i - 1` has finished on its assigned machine.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use serde::{Deserialize, Serialize};

use super::Operation;

/// A job to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Human-readable name.
    pub name: String,
    /// Operations in processing order.
    pub operations: Vec<Operation>,
}

impl Job {
    /// Creates an empty job.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
        }
    }

    /// Appends an operation.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Release time of the job: release time of its first operation.
    pub fn release_time(&self) -> i64 {
        self.operations.first().map(|o| o.release_time).unwrap_or(0)
    }

    /// Due date of the job.
    ///
    /// The last operation's due date if set, otherwise the latest due date
    /// declared on any of its operations.
    pub fn due_date(&self) -> Option<i64> {
        self.operations
            .last()
            .and_then(|o| o.due_date)
            .or_else(|| self.operations.iter().filter_map(|o| o.due_date).max())
    }

    /// Sum of the shortest processing times (plus setups) of all operations.
    pub fn min_total_work(&self) -> i64 {
        self.operations
            .iter()
            .map(|o| o.min_duration() + o.setup_time)
            .sum()
    }

    /// Number of operations.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Whether this job has any operations.
    pub fn has_operations(&self) -> bool {
        !self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_builder() {
        let job = Job::new("J1")
            .with_operation(Operation::new(0, 0).with_option(0, 3).with_release(5))
            .with_operation(Operation::new(0, 1).with_options([(0, 4), (1, 2)]).with_setup(1));

        assert_eq!(job.name, "J1");
        assert_eq!(job.operation_count(), 2);
        assert!(job.has_operations());
        assert_eq!(job.release_time(), 5);
        assert_eq!(job.min_total_work(), 3 + 2 + 1);
    }

    #[test]
    fn test_due_date_prefers_last_operation() {
        let job = Job::new("J")
            .with_operation(Operation::new(0, 0).with_option(0, 1).with_due_date(50))
            .with_operation(Operation::new(0, 1).with_option(0, 1).with_due_date(30));
        assert_eq!(job.due_date(), Some(30));
    }

    #[test]
    fn test_due_date_falls_back_to_latest() {
        let job = Job::new("J")
            .with_operation(Operation::new(0, 0).with_option(0, 1).with_due_date(20))
            .with_operation(Operation::new(0, 1).with_option(0, 1).with_due_date(25))
            .with_operation(Operation::new(0, 2).with_option(0, 1));
        assert_eq!(job.due_date(), Some(25));
    }

    #[test]
    fn test_job_empty() {
        let job = Job::new("empty");
        assert_eq!(job.release_time(), 0);
        assert_eq!(job.due_date(), None);
        assert!(!job.has_operations());
    }
}

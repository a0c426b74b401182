//! Schedule quality metrics (KPIs).
//!
//! Computes standard scheduling performance indicators from a decoded
//! schedule and its instance. The built-in objectives read their values
//! from this report, so every metric is computed in one pass.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest end time |
//! | Total / Mean Flow Time | Sum / mean of (completion - release) per job |
//! | Total / Max Tardiness | Sum / max of max(0, completion - due date) per job |
//! | On-Time Rate | Fraction of jobs meeting their due date |
//! | Energy | Σ processing_power × busy + idle_power × (C_max - busy) |
//! | Setup | Σ setup time over operations |
//! | Total / Max Workload | Sum / max of busy time per machine |
//! | Utilization | busy / C_max per machine |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};

use crate::models::{Instance, Schedule};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Latest end time over all operations.
    pub makespan: i64,
    /// Completion time of each job.
    pub job_completions: Vec<i64>,
    /// Sum of job flow times.
    pub total_flow_time: i64,
    /// Mean job flow time.
    pub mean_flow_time: f64,
    /// Sum of job tardiness.
    pub total_tardiness: i64,
    /// Largest job tardiness.
    pub max_tardiness: i64,
    /// Fraction of jobs completing by their due date (jobs without one count as on time).
    pub on_time_rate: f64,
    /// Energy consumed over the makespan horizon.
    pub energy: f64,
    /// Sum of setup times.
    pub total_setup: i64,
    /// Busy time (processing + setup) of each machine.
    pub machine_busy: Vec<i64>,
    /// Sum of machine busy times.
    pub total_workload: i64,
    /// Largest machine busy time.
    pub max_workload: i64,
    /// Per-machine utilization (0.0..1.0).
    pub utilization_by_machine: Vec<f64>,
    /// Average machine utilization (0.0..1.0).
    pub avg_utilization: f64,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its instance.
    ///
    /// Never fails: zero-length schedules and zero durations simply yield
    /// zero-valued metrics.
    pub fn calculate(schedule: &Schedule, instance: &Instance) -> Self {
        let makespan = schedule.makespan();
        let job_completions = schedule.job_completions(instance.job_count());

        let mut total_flow_time = 0i64;
        let mut total_tardiness = 0i64;
        let mut max_tardiness = 0i64;
        let mut on_time = 0usize;

        for (job, &completion) in instance.jobs().iter().zip(&job_completions) {
            total_flow_time += completion - job.release_time();
            match job.due_date() {
                Some(due) if completion > due => {
                    let tardiness = completion - due;
                    total_tardiness += tardiness;
                    max_tardiness = max_tardiness.max(tardiness);
                }
                // No due date → considered on time
                _ => on_time += 1,
            }
        }

        let job_count = instance.job_count();
        let mean_flow_time = if job_count == 0 {
            0.0
        } else {
            total_flow_time as f64 / job_count as f64
        };
        let on_time_rate = if job_count == 0 {
            1.0
        } else {
            on_time as f64 / job_count as f64
        };

        let machine_busy = schedule.machine_busy_times(instance.machine_count());
        let energy = instance
            .machines()
            .iter()
            .zip(&machine_busy)
            .map(|(machine, &busy)| machine.energy(busy, makespan))
            .sum();
        let total_workload = machine_busy.iter().sum();
        let max_workload = machine_busy.iter().copied().max().unwrap_or(0);

        let utilization_by_machine = schedule.machine_utilizations(instance.machine_count());
        let avg_utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            utilization_by_machine.iter().sum::<f64>() / utilization_by_machine.len() as f64
        };

        Self {
            makespan,
            job_completions,
            total_flow_time,
            mean_flow_time,
            total_tardiness,
            max_tardiness,
            on_time_rate,
            energy,
            total_setup: schedule.total_setup(),
            machine_busy,
            total_workload,
            max_workload,
            utilization_by_machine,
            avg_utilization,
        }
    }
}

//! Objective evaluation.
//!
//! # Submodules
//!
//! - [`kpi`]: one-pass schedule performance report
//! - [`objective`]: objective registry producing minimize-oriented vectors

pub mod kpi;
pub mod objective;

pub use kpi::ScheduleKpi;
pub use objective::{ObjectiveDefinition, ObjectiveFn, ObjectiveKind, ObjectiveSet, Sense};

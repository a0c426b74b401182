//! Objective registration and evaluation.
//!
//! An [`ObjectiveSet`] is an ordered, validated list of objective
//! definitions. Evaluating a schedule against it yields an objective
//! vector in registration order, always minimize-oriented: values of
//! [`Sense::Maximize`] objectives are negated.
//!
//! Objectives are pure functions of `(Schedule, Instance)`; they never
//! fail. Misconfiguration is caught when the set is built.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::kpi::ScheduleKpi;
use crate::error::ConfigurationError;
use crate::models::{Instance, Schedule};

/// User-supplied objective function.
pub type ObjectiveFn = Arc<dyn Fn(&Schedule, &Instance) -> f64 + Send + Sync>;

/// Optimization direction of an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    /// Smaller is better.
    Minimize,
    /// Larger is better (negated at evaluation time).
    Maximize,
}

/// What an objective measures.
#[derive(Clone)]
pub enum ObjectiveKind {
    /// Latest end time.
    Makespan,
    /// Σ (completion - release) over jobs.
    TotalFlowTime,
    /// Mean of (completion - release) over jobs.
    MeanFlowTime,
    /// Σ max(0, completion - due) over jobs.
    TotalTardiness,
    /// max over jobs of max(0, completion - due).
    MaxTardiness,
    /// Processing plus idle energy over the makespan horizon.
    Energy,
    /// Σ setup time.
    SetupCost,
    /// Σ machine busy time.
    TotalWorkload,
    /// Largest machine busy time.
    MaxWorkload,
    /// Arbitrary pure function.
    Custom(ObjectiveFn),
}

impl fmt::Debug for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(_) => f.write_str("Custom(..)"),
            other => f.write_str(other.builtin_name().unwrap_or("?")),
        }
    }
}

impl ObjectiveKind {
    /// All built-in kinds, in canonical order.
    pub const BUILTINS: [ObjectiveKind; 9] = [
        Self::Makespan,
        Self::TotalFlowTime,
        Self::MeanFlowTime,
        Self::TotalTardiness,
        Self::MaxTardiness,
        Self::Energy,
        Self::SetupCost,
        Self::TotalWorkload,
        Self::MaxWorkload,
    ];

    /// Resolves a built-in objective by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::BUILTINS
            .iter()
            .find(|k| k.builtin_name() == Some(name))
            .cloned()
    }

    /// Canonical name of a built-in kind (`None` for custom objectives).
    pub fn builtin_name(&self) -> Option<&'static str> {
        Some(match self {
            Self::Makespan => "makespan",
            Self::TotalFlowTime => "total_flow_time",
            Self::MeanFlowTime => "mean_flow_time",
            Self::TotalTardiness => "total_tardiness",
            Self::MaxTardiness => "max_tardiness",
            Self::Energy => "energy",
            Self::SetupCost => "setup_cost",
            Self::TotalWorkload => "total_workload",
            Self::MaxWorkload => "max_workload",
            Self::Custom(_) => return None,
        })
    }

    /// Raw (unsigned) value of this objective.
    pub fn measure(&self, kpi: &ScheduleKpi, schedule: &Schedule, instance: &Instance) -> f64 {
        match self {
            Self::Makespan => kpi.makespan as f64,
            Self::TotalFlowTime => kpi.total_flow_time as f64,
            Self::MeanFlowTime => kpi.mean_flow_time,
            Self::TotalTardiness => kpi.total_tardiness as f64,
            Self::MaxTardiness => kpi.max_tardiness as f64,
            Self::Energy => kpi.energy,
            Self::SetupCost => kpi.total_setup as f64,
            Self::TotalWorkload => kpi.total_workload as f64,
            Self::MaxWorkload => kpi.max_workload as f64,
            Self::Custom(f) => f(schedule, instance),
        }
    }
}

/// A registered objective.
#[derive(Debug, Clone)]
pub struct ObjectiveDefinition {
    /// Unique, non-empty name.
    pub name: String,
    /// Optimization direction.
    pub sense: Sense,
    /// Measured quantity.
    pub kind: ObjectiveKind,
}

impl ObjectiveDefinition {
    /// Creates a definition.
    pub fn new(name: impl Into<String>, sense: Sense, kind: ObjectiveKind) -> Self {
        Self {
            name: name.into(),
            sense,
            kind,
        }
    }

    /// Minimizes a built-in kind under its canonical name.
    pub fn minimize(kind: ObjectiveKind) -> Self {
        let name = kind.builtin_name().unwrap_or("custom");
        Self::new(name, Sense::Minimize, kind)
    }

    /// Registers a custom objective function.
    pub fn custom<F>(name: impl Into<String>, sense: Sense, f: F) -> Self
    where
        F: Fn(&Schedule, &Instance) -> f64 + Send + Sync + 'static,
    {
        Self::new(name, sense, ObjectiveKind::Custom(Arc::new(f)))
    }
}

/// Ordered, validated objective registry.
///
/// # Example
/// ```
/// use u_fjsp::evaluation::ObjectiveSet;
///
/// let objectives = ObjectiveSet::from_names(["makespan", "total_tardiness"]).unwrap();
/// assert_eq!(objectives.len(), 2);
/// assert!(ObjectiveSet::from_names(["throughput"]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ObjectiveSet {
    definitions: Vec<ObjectiveDefinition>,
}

impl ObjectiveSet {
    /// Validates and registers definitions in order.
    ///
    /// # Errors
    /// [`ConfigurationError::NoObjectives`], [`ConfigurationError::EmptyObjectiveName`]
    /// or [`ConfigurationError::DuplicateObjective`].
    pub fn new(definitions: Vec<ObjectiveDefinition>) -> Result<Self, ConfigurationError> {
        if definitions.is_empty() {
            return Err(ConfigurationError::NoObjectives);
        }
        let mut names = HashSet::new();
        for def in &definitions {
            if def.name.trim().is_empty() {
                return Err(ConfigurationError::EmptyObjectiveName);
            }
            if !names.insert(def.name.as_str()) {
                return Err(ConfigurationError::DuplicateObjective(def.name.clone()));
            }
        }
        Ok(Self { definitions })
    }

    /// Registers built-in objectives (all minimized) by name.
    ///
    /// # Errors
    /// [`ConfigurationError::UnknownObjective`] for a name that is not a
    /// built-in, plus every error of [`new`](Self::new).
    pub fn from_names<I, S>(names: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let definitions = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                ObjectiveKind::from_name(name)
                    .map(ObjectiveDefinition::minimize)
                    .ok_or_else(|| ConfigurationError::UnknownObjective(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(definitions)
    }

    /// Makespan and total flow time, the usual bi-objective setting.
    pub fn makespan_and_flow_time() -> Self {
        Self {
            definitions: vec![
                ObjectiveDefinition::minimize(ObjectiveKind::Makespan),
                ObjectiveDefinition::minimize(ObjectiveKind::TotalFlowTime),
            ],
        }
    }

    /// Registered definitions, in order.
    pub fn definitions(&self) -> &[ObjectiveDefinition] {
        &self.definitions
    }

    /// Objective names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    /// Number of objectives.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Always `false`: a set holds at least one objective.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Evaluates a schedule into a minimize-oriented objective vector.
    pub fn evaluate(&self, instance: &Instance, schedule: &Schedule) -> Vec<f64> {
        let kpi = ScheduleKpi::calculate(schedule, instance);
        self.definitions
            .iter()
            .map(|def| {
                let value = def.kind.measure(&kpi, schedule, instance);
                match def.sense {
                    Sense::Minimize => value,
                    Sense::Maximize => -value,
                }
            })
            .collect()
    }

    /// Converts a minimize-oriented vector back to the objectives' own signs.
    pub fn to_natural(&self, objectives: &[f64]) -> Vec<f64> {
        self.definitions
            .iter()
            .zip(objectives)
            .map(|(def, &v)| match def.sense {
                Sense::Minimize => v,
                Sense::Maximize => -v,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, Operation, ScheduledOperation};

    fn fixture() -> (Instance, Schedule) {
        let inst = Instance::new(
            "eval",
            2,
            vec![
                Job::new("J0")
                    .with_operation(Operation::new(0, 0).with_options([(0, 3), (1, 5)]).with_setup(1))
                    .with_operation(
                        Operation::new(0, 1)
                            .with_options([(0, 2), (1, 4)])
                            .with_due_date(6),
                    ),
                Job::new("J1")
                    .with_operation(Operation::new(1, 0).with_options([(0, 4), (1, 2)]).with_release(1))
                    .with_operation(Operation::new(1, 1).with_options([(0, 6), (1, 3)])),
            ],
        )
        .unwrap();
        let op = |operation, job, position, machine, start, end, setup| ScheduledOperation {
            operation,
            job,
            position,
            machine,
            start,
            end,
            setup,
        };
        let schedule = Schedule::from_operations(vec![
            op(0, 0, 0, 0, 0, 4, 1),
            op(1, 0, 1, 1, 4, 8, 0),
            op(2, 1, 0, 1, 1, 3, 0),
            op(3, 1, 1, 0, 4, 10, 0),
        ]);
        (inst, schedule)
    }

    #[test]
    fn test_builtin_values() {
        let (inst, schedule) = fixture();
        assert!(schedule.verify(&inst).is_empty());
        let set = ObjectiveSet::from_names([
            "makespan",
            "total_flow_time",
            "mean_flow_time",
            "total_tardiness",
            "max_tardiness",
            "energy",
            "setup_cost",
            "total_workload",
            "max_workload",
        ])
        .unwrap();
        let v = set.evaluate(&inst, &schedule);
        // completions: J0 = 8, J1 = 10; releases 0 and 1 → flow 8 + 9
        // J0 due 6 → tardiness 2; J1 has no due date
        // busy: M0 = 4 + 6 = 10, M1 = 4 + 2 = 6; energy = 16 (idle power 0)
        assert_eq!(v, vec![10.0, 17.0, 8.5, 2.0, 2.0, 16.0, 1.0, 16.0, 10.0]);
    }

    #[test]
    fn test_maximize_is_negated() {
        let (inst, schedule) = fixture();
        let set = ObjectiveSet::new(vec![
            ObjectiveDefinition::minimize(ObjectiveKind::Makespan),
            ObjectiveDefinition::new("utilization", Sense::Maximize, ObjectiveKind::TotalWorkload),
        ])
        .unwrap();
        let v = set.evaluate(&inst, &schedule);
        assert_eq!(v, vec![10.0, -16.0]);
        assert_eq!(set.to_natural(&v), vec![10.0, 16.0]);
    }

    #[test]
    fn test_custom_objective() {
        let (inst, schedule) = fixture();
        let set = ObjectiveSet::new(vec![ObjectiveDefinition::custom(
            "operations",
            Sense::Minimize,
            |s: &Schedule, _: &Instance| s.len() as f64,
        )])
        .unwrap();
        assert_eq!(set.evaluate(&inst, &schedule), vec![4.0]);
        assert_eq!(format!("{:?}", set.definitions()[0].kind), "Custom(..)");
    }

    #[test]
    fn test_configuration_errors() {
        assert!(matches!(
            ObjectiveSet::new(vec![]),
            Err(ConfigurationError::NoObjectives)
        ));
        assert!(matches!(
            ObjectiveSet::new(vec![ObjectiveDefinition::new(
                " ",
                Sense::Minimize,
                ObjectiveKind::Makespan
            )]),
            Err(ConfigurationError::EmptyObjectiveName)
        ));
        assert_eq!(
            ObjectiveSet::from_names(["makespan", "makespan"]).unwrap_err(),
            ConfigurationError::DuplicateObjective("makespan".into())
        );
        assert_eq!(
            ObjectiveSet::from_names(["makespan", "profit"]).unwrap_err(),
            ConfigurationError::UnknownObjective("profit".into())
        );
        let empty: [&str; 0] = [];
        assert!(ObjectiveSet::from_names(empty).is_err());
    }

    #[test]
    fn test_builtin_names_round_trip() {
        for kind in ObjectiveKind::BUILTINS.iter() {
            let name = kind.builtin_name().unwrap();
            assert_eq!(ObjectiveKind::from_name(name).unwrap().builtin_name(), Some(name));
        }
        assert!(ObjectiveKind::from_name("custom").is_none());
    }

    #[test]
    fn test_empty_schedule_does_not_fail() {
        let (inst, _) = fixture();
        let set = ObjectiveSet::makespan_and_flow_time();
        let v = set.evaluate(&inst, &Schedule::new());
        assert_eq!(v[0], 0.0);
        assert_eq!(set.names(), vec!["makespan", "total_flow_time"]);
    }
}

//! Machine model.
//!
//! Machines are unary resources: at most one operation at a time. Each
//! machine carries a power profile used by the energy objective.

use serde::{Deserialize, Serialize};

/// A machine that can process operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// Human-readable name.
    pub name: String,
    /// Power drawn while processing (or setting up), per time unit.
    pub processing_power: f64,
    /// Power drawn while idle inside the schedule horizon, per time unit.
    pub idle_power: f64,
}

impl Machine {
    /// Creates a machine with processing power 1.0 and idle power 0.0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            processing_power: 1.0,
            idle_power: 0.0,
        }
    }

    /// Sets both power levels.
    pub fn with_power(mut self, processing_power: f64, idle_power: f64) -> Self {
        self.processing_power = processing_power;
        self.idle_power = idle_power;
        self
    }

    /// Default machine set `M0..M{count-1}`.
    pub fn numbered(count: usize) -> Vec<Machine> {
        (0..count).map(|i| Machine::new(format!("M{i}"))).collect()
    }

    /// Energy consumed over a horizon with the given busy time.
    ///
    /// Idle time is `horizon - busy`, clamped at zero.
    pub fn energy(&self, busy: i64, horizon: i64) -> f64 {
        let idle = (horizon - busy).max(0);
        self.processing_power * busy as f64 + self.idle_power * idle as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_defaults() {
        let m = Machine::new("M0");
        assert_eq!(m.name, "M0");
        assert!((m.processing_power - 1.0).abs() < 1e-10);
        assert!((m.idle_power - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_numbered() {
        let ms = Machine::numbered(3);
        assert_eq!(ms.len(), 3);
        assert_eq!(ms[2].name, "M2");
    }

    #[test]
    fn test_energy() {
        let m = Machine::new("M").with_power(2.0, 0.5);
        // busy 10 → 20, idle 6 → 3
        assert!((m.energy(10, 16) - 23.0).abs() < 1e-10);
        // busy beyond horizon never yields negative idle
        assert!((m.energy(10, 5) - 20.0).abs() < 1e-10);
    }
}

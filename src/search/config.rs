//! Search configuration.

use serde::{Deserialize, Serialize};

use crate::encoding::GeneticOperators;
use crate::error::ConfigurationError;

/// NSGA-II parameters.
///
/// Deserializable with every field optional (missing fields take their
/// defaults).
///
/// # Example
/// ```
/// use u_fjsp::search::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_population_size(40)
///     .with_max_generations(25)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// assert!(config.with_population_size(1).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Individuals per generation (≥ 2). Default 50.
    pub population_size: usize,
    /// Pareto archive capacity (≥ 1). Default 100.
    pub archive_capacity: usize,
    /// Generation budget (≥ 1). Default 100.
    pub max_generations: usize,
    /// Consecutive generations without an archive improvement that stop the
    /// run. `None` disables the check. Default `Some(30)`.
    pub stagnation_limit: Option<usize>,
    /// Probability that a parent pair is recombined. Default 0.9.
    pub crossover_rate: f64,
    /// Probability that a child is mutated. Default 0.2.
    pub mutation_rate: f64,
    /// Contestants per parent selection. Default 2 (binary tournament).
    pub tournament_size: usize,
    /// RNG seed. Default 42.
    pub seed: u64,
    /// Decode and evaluate offspring on the rayon pool. Default `true`.
    pub parallel: bool,
    /// Compute hypervolume and spacing for every progress report. Default `true`.
    pub indicators: bool,
    /// Variation operators.
    pub operators: GeneticOperators,
    /// Hypervolume reference point. When absent it is derived once from
    /// the initial population (worst value per objective, margin 1.1).
    pub reference_point: Option<Vec<f64>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            archive_capacity: 100,
            max_generations: 100,
            stagnation_limit: Some(30),
            crossover_rate: 0.9,
            mutation_rate: 0.2,
            tournament_size: 2,
            seed: 42,
            parallel: true,
            indicators: true,
            operators: GeneticOperators::default(),
            reference_point: None,
        }
    }
}

impl SearchConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the archive capacity.
    pub fn with_archive_capacity(mut self, capacity: usize) -> Self {
        self.archive_capacity = capacity;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets (or disables, with `None`) the stagnation limit.
    pub fn with_stagnation_limit(mut self, limit: Option<usize>) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables or disables per-generation indicators.
    pub fn with_indicators(mut self, indicators: bool) -> Self {
        self.indicators = indicators;
        self
    }

    /// Sets the variation operators.
    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }

    /// Sets a fixed hypervolume reference point.
    pub fn with_reference_point(mut self, reference: Vec<f64>) -> Self {
        self.reference_point = Some(reference);
        self
    }

    /// Checks parameter ranges.
    ///
    /// The reference point dimension is checked against the objective set
    /// when the solver is built.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.population_size < 2 {
            return Err(ConfigurationError::PopulationTooSmall(self.population_size));
        }
        if self.archive_capacity < 1 {
            return Err(ConfigurationError::InvalidArchiveCapacity(self.archive_capacity));
        }
        if self.max_generations < 1 {
            return Err(ConfigurationError::InvalidGenerationCount(self.max_generations));
        }
        if self.stagnation_limit == Some(0) {
            return Err(ConfigurationError::InvalidStagnationLimit(0));
        }
        if self.tournament_size < 1 {
            return Err(ConfigurationError::InvalidTournamentSize(self.tournament_size));
        }
        for (parameter, value) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::InvalidProbability { parameter, value });
            }
        }
        Ok(())
    }
}

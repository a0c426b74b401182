//! Evaluated individuals and the decode + evaluate step.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::decoder::ScheduleDecoder;
use crate::encoding::Chromosome;
use crate::error::DecodeError;
use crate::evaluation::ObjectiveSet;
use crate::models::Schedule;

/// A chromosome with its decoded schedule and objective vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    /// Encoded solution.
    pub chromosome: Chromosome,
    /// Decoded schedule.
    pub schedule: Schedule,
    /// Minimize-oriented objective vector.
    pub objectives: Vec<f64>,
}

/// What the archive stores: the encoding and its schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Encoded solution.
    pub chromosome: Chromosome,
    /// Decoded schedule.
    pub schedule: Schedule,
}

impl Individual {
    /// Copies the archived part of this individual.
    pub fn to_solution(&self) -> Solution {
        Solution {
            chromosome: self.chromosome.clone(),
            schedule: self.schedule.clone(),
        }
    }
}

/// Decodes and evaluates batches of chromosomes.
///
/// Workers share the instance, graph and objective set by reference; each
/// candidate gets its own schedule and vector. Output order matches input
/// order in both modes, so parallel and serial runs are identical.
#[derive(Clone, Copy)]
pub(crate) struct Evaluator<'a> {
    decoder: ScheduleDecoder<'a>,
    objectives: &'a ObjectiveSet,
    parallel: bool,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(
        decoder: ScheduleDecoder<'a>,
        objectives: &'a ObjectiveSet,
        parallel: bool,
    ) -> Self {
        Self {
            decoder,
            objectives,
            parallel,
        }
    }

    fn evaluate_one(&self, chromosome: Chromosome) -> Result<Individual, DecodeError> {
        let schedule = self.decoder.decode(&chromosome)?;
        let objectives = self.objectives.evaluate(self.decoder.instance(), &schedule);
        Ok(Individual {
            chromosome,
            schedule,
            objectives,
        })
    }

    /// Evaluates every chromosome; the first decode failure aborts the batch.
    pub(crate) fn evaluate(
        &self,
        chromosomes: Vec<Chromosome>,
    ) -> Result<Vec<Individual>, DecodeError> {
        if self.parallel {
            chromosomes
                .into_par_iter()
                .map(|c| self.evaluate_one(c))
                .collect()
        } else {
            chromosomes
                .into_iter()
                .map(|c| self.evaluate_one(c))
                .collect()
        }
    }
}

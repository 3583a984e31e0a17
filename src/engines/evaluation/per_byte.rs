//! Per-byte error fitness.
//!
//! Fitness is the sum of absolute differences between produced and expected
//! output bytes. This is not a numeric distance: a one-ulp change can flip a
//! sign or exponent byte and jump the score, which in turn shapes how the
//! search converges.

use crate::data::dataset::Dataset;
use crate::engines::generation::individual::Individual;
use crate::error::{GpsynthError, Result};
use crate::program::interpreter::Executor;
use crate::program::model::Program;
use crate::types::PrimitiveType;
use rayon::prelude::*;
use std::sync::Arc;

/// Fitness assigned to programs that fail to run or produce malformed output
pub const WORST_FITNESS: f64 = f64::MAX;

/// Sum of absolute byte differences; buffers must have equal length
pub fn per_byte_error(produced: &[u8], expected: &[u8]) -> f64 {
    produced
        .iter()
        .zip(expected)
        .map(|(&p, &e)| (p as i32 - e as i32).unsigned_abs() as u64)
        .sum::<u64>() as f64
}

pub struct Evaluator {
    executor: Arc<dyn Executor>,
    dataset: Arc<Dataset>,
    target: String,
    input_types: Vec<PrimitiveType>,
    output_types: Vec<PrimitiveType>,
    samples: usize,
}

impl Evaluator {
    /// Fails if the dataset does not match the target function's signature
    pub fn new(
        executor: Arc<dyn Executor>,
        dataset: Arc<Dataset>,
        seed: &Program,
        target: &str,
    ) -> Result<Self> {
        let function = seed.function(target).ok_or_else(|| {
            GpsynthError::Configuration(format!("Seed program lacks function {}", target))
        })?;
        let input_types = function.input_types();
        let output_types = function.output_types();
        let samples = dataset.sample_count(&input_types, &output_types)?;
        if samples == 0 {
            return Err(GpsynthError::Configuration(
                "Dataset holds no samples".to_string(),
            ));
        }

        Ok(Self {
            executor,
            dataset,
            target: target.to_string(),
            input_types,
            output_types,
            samples,
        })
    }

    pub fn sample_count(&self) -> usize {
        self.samples
    }

    /// Fitness of `program`; execution failures score `WORST_FITNESS`
    pub fn evaluate(&self, program: &Program) -> f64 {
        match self.try_evaluate(program) {
            Ok(fitness) => fitness,
            Err(e) => {
                log::debug!("Evaluation failed: {}", e);
                WORST_FITNESS
            }
        }
    }

    pub fn try_evaluate(&self, program: &Program) -> Result<f64> {
        let mut produced: Vec<Vec<u8>> = self
            .output_types
            .iter()
            .map(|ty| Vec::with_capacity(self.samples * ty.width()))
            .collect();

        let mut row: Vec<&[u8]> = Vec::with_capacity(self.input_types.len());
        for i in 0..self.samples {
            row.clear();
            for (buffer, ty) in self.dataset.inputs().iter().zip(&self.input_types) {
                let width = ty.width();
                row.push(&buffer[i * width..(i + 1) * width]);
            }

            let outputs = self.executor.execute(program, &self.target, &row)?;
            if outputs.len() != produced.len() {
                return Err(GpsynthError::Execution(format!(
                    "Expected {} output channels, got {}",
                    produced.len(),
                    outputs.len()
                )));
            }
            for ((channel, bytes), ty) in produced.iter_mut().zip(outputs).zip(&self.output_types) {
                if bytes.len() != ty.width() {
                    return Err(GpsynthError::Execution(format!(
                        "Expected {} output bytes, got {}",
                        ty.width(),
                        bytes.len()
                    )));
                }
                channel.extend_from_slice(&bytes);
            }
        }

        Ok(produced
            .iter()
            .zip(self.dataset.outputs())
            .map(|(p, e)| per_byte_error(p, e))
            .sum())
    }

    /// Score every individual lacking a fitness value.
    ///
    /// Returns once all of them are scored, so callers never observe a
    /// partially evaluated population.
    pub fn evaluate_population(&self, individuals: &mut [Individual], parallel: bool) -> usize {
        if parallel {
            individuals
                .par_iter_mut()
                .filter(|ind| !ind.is_evaluated())
                .map(|ind| {
                    let fitness = self.evaluate(ind.program());
                    ind.set_fitness(fitness);
                })
                .count()
        } else {
            individuals
                .iter_mut()
                .filter(|ind| !ind.is_evaluated())
                .map(|ind| {
                    let fitness = self.evaluate(ind.program());
                    ind.set_fitness(fitness);
                })
                .count()
        }
    }
}

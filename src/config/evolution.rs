use super::traits::ConfigSection;
use crate::error::GpsynthError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    /// Generation budget
    pub iterations: usize,
    /// Upper bound on expressions in a generated or recombined body
    pub expressions_count: usize,
    /// Evolution stops once the best fitness is at or below this value
    pub target_error: f64,
    pub mutation_rate: f64,
    pub selection_method: SelectionMethod,
    pub tournament_size: usize,
    /// Extra recombination attempts after a rejected child
    pub crossover_retries: usize,
    pub hall_of_fame_size: usize,
    pub parallel_evaluation: bool,
    /// Log progress every N generations
    pub log_interval: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    Uniform,
    Tournament,
    Roulette,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            iterations: 10000,
            expressions_count: 4,
            target_error: 0.1,
            mutation_rate: 0.1,
            selection_method: SelectionMethod::Uniform,
            tournament_size: 3,
            crossover_retries: 10,
            hall_of_fame_size: 5,
            parallel_evaluation: false,
            log_interval: 100,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GpsynthError> {
        if self.population_size == 0 {
            return Err(GpsynthError::Configuration(
                "Population size must be positive".to_string()
            ));
        }
        if self.iterations == 0 {
            return Err(GpsynthError::Configuration(
                "Iteration budget must be positive".to_string()
            ));
        }
        if self.expressions_count == 0 {
            return Err(GpsynthError::Configuration(
                "Expressions count must be positive".to_string()
            ));
        }
        if !self.target_error.is_finite() || self.target_error < 0.0 {
            return Err(GpsynthError::Configuration(
                "Target error must be a non-negative number".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GpsynthError::Configuration(
                "Mutation rate must be between 0 and 1".to_string()
            ));
        }
        if self.selection_method == SelectionMethod::Tournament && self.tournament_size == 0 {
            return Err(GpsynthError::Configuration(
                "Tournament size must be positive".to_string()
            ));
        }
        if self.hall_of_fame_size == 0 {
            return Err(GpsynthError::Configuration(
                "Hall of fame size must be positive".to_string()
            ));
        }
        Ok(())
    }
}

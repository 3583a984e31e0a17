//! Wires configuration into a complete evolutionary run.

use crate::config::manager::AppConfig;
use crate::data::dataset::DatasetEncoder;
use crate::engines::generation::population::{Population, RunResult};
use crate::engines::generation::progress::{LogProgressCallback, ProgressCallback};
use crate::error::Result;
use crate::functions::palette::FunctionPalette;
use crate::functions::registry::FunctionRegistry;
use crate::program::interpreter::Interpreter;
use crate::program::skeleton::build_initial_program;
use crate::types::PrimitiveType;
use std::sync::Arc;

/// Run with interval logging of progress
pub fn run(config: &AppConfig) -> Result<RunResult> {
    let mut callback = LogProgressCallback::new(config.evolution.log_interval);
    run_with_callback(config, &mut callback)
}

/// Validate `config`, build the seed program, palette and dataset it
/// describes, then evolve until convergence or exhaustion.
pub fn run_with_callback<C: ProgressCallback + ?Sized>(
    config: &AppConfig,
    callback: &mut C,
) -> Result<RunResult> {
    config.validate()?;
    let program = &config.program;

    let registry = Arc::new(FunctionRegistry::new());
    let mut palette = FunctionPalette::from_registry(&registry, &program.function_set)?;
    palette.set_target(&program.function_to_evolve);

    let seed = build_initial_program(
        &program.function_to_evolve,
        &program.input_signature,
        &program.output_signature,
    )?;

    let input_types = PrimitiveType::parse_signature(&program.input_signature)?;
    let output_types = PrimitiveType::parse_signature(&program.output_signature)?;
    let model = config.dataset.model;
    let dataset = DatasetEncoder::new(config.dataset.sample_size)
        .encode(&input_types, &output_types, |x| model.apply(x))?;

    log::info!(
        "Evolving {}({}) -> ({}) against {:?} with {} samples",
        program.function_to_evolve,
        program.input_signature.join(", "),
        program.output_signature.join(", "),
        model,
        config.dataset.sample_size
    );

    let executor = Arc::new(Interpreter::new(registry));
    let mut population = Population::new(config.evolution.clone());
    population.initialize(seed, Arc::new(palette), Arc::new(dataset), executor)?;
    population.evolve(callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::population::TerminationReason;
    use crate::error::GpsynthError;

    #[test]
    fn test_run_small_default_config() {
        let mut config = AppConfig::default();
        config.evolution.population_size = 10;
        config.evolution.iterations = 5;
        config.evolution.seed = Some(3);
        config.dataset.sample_size = 8;

        let result = run(&config).unwrap();
        assert!(result.generations <= 5);
        if result.termination == TerminationReason::Exhausted {
            assert_eq!(result.generations, 5);
        }
        assert!(result.best_program.function("polynomialFitting").is_some());
    }

    #[test]
    fn test_run_rejects_unknown_operator() {
        let mut config = AppConfig::default();
        config.program.function_set = vec!["f32.teleport".to_string()];
        assert!(matches!(run(&config), Err(GpsynthError::Configuration(_))));
    }
}

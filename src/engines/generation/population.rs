//! Generational evolution of one target function.
//!
//! A `Population` moves through `Uninitialized -> Initialized -> Evolving`
//! and ends in either `Converged` or `Exhausted`. Each generation scores
//! every unevaluated individual, records the best distinct programs in the
//! hall of fame, then replaces the population with the elite plus children
//! bred by crossover and mutation.

use crate::config::evolution::EvolutionConfig;
use crate::config::traits::ConfigSection;
use crate::data::dataset::Dataset;
use crate::engines::evaluation::Evaluator;
use crate::engines::generation::hall_of_fame::{EliteProgram, HallOfFame};
use crate::engines::generation::individual::Individual;
use crate::engines::generation::operators::{
    crossover, mutate, random_body, select_parent, OperatorLimits,
};
use crate::engines::generation::progress::ProgressCallback;
use crate::error::{GpsynthError, Result};
use crate::functions::palette::FunctionPalette;
use crate::program::interpreter::Executor;
use crate::program::model::Program;
use crate::program::validator::Scope;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationState {
    Uninitialized,
    Initialized,
    Evolving,
    Converged,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminationReason {
    Converged,
    Exhausted,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged => f.write_str("converged"),
            Self::Exhausted => f.write_str("exhausted"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub best_program: Program,
    pub fitness: f64,
    /// Generations actually executed
    pub generations: usize,
    pub termination: TerminationReason,
}

struct Attached {
    palette: Arc<FunctionPalette>,
    evaluator: Arc<Evaluator>,
    target: String,
}

pub struct Population {
    config: EvolutionConfig,
    rng: StdRng,
    state: PopulationState,
    individuals: Vec<Individual>,
    hall_of_fame: HallOfFame,
    attached: Option<Attached>,
    generation: usize,
}

impl Population {
    pub fn new(config: EvolutionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let hall_of_fame = HallOfFame::new(config.hall_of_fame_size);

        Self {
            config,
            rng,
            state: PopulationState::Uninitialized,
            individuals: Vec::new(),
            hall_of_fame,
            attached: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> PopulationState {
        self.state
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn hall_of_fame(&self) -> &HallOfFame {
        &self.hall_of_fame
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    fn limits(&self) -> OperatorLimits {
        OperatorLimits {
            expressions_count: self.config.expressions_count,
            retries: self.config.crossover_retries,
        }
    }

    fn expect_state(&self, expected: PopulationState) -> Result<()> {
        if self.state != expected {
            return Err(GpsynthError::InvalidState {
                expected: format!("{:?}", expected),
                actual: format!("{:?}", self.state),
            });
        }
        Ok(())
    }

    /// Attach the palette, dataset and executor and fill the population with
    /// random variations of `seed`.
    ///
    /// The evolved function is the one recorded as the palette's target.
    pub fn initialize(
        &mut self,
        seed: Program,
        palette: Arc<FunctionPalette>,
        dataset: Arc<Dataset>,
        executor: Arc<dyn Executor>,
    ) -> Result<()> {
        self.expect_state(PopulationState::Uninitialized)?;
        self.config.validate()?;

        let target = palette
            .target()
            .ok_or_else(|| {
                GpsynthError::Configuration("Palette has no target function".to_string())
            })?
            .to_string();
        let function = seed
            .function(&target)
            .ok_or_else(|| {
                GpsynthError::Configuration(format!("Seed program lacks function {}", target))
            })?
            .clone();

        if palette.is_empty() {
            return Err(GpsynthError::Configuration("Function palette is empty".to_string()));
        }
        let scope = Scope::new(&function);
        if !palette.entries().iter().any(|e| scope.has_type(e.operand_type)) {
            return Err(GpsynthError::Configuration(format!(
                "No palette entry accepts a parameter type of {}",
                target
            )));
        }

        let evaluator = Evaluator::new(executor, dataset, &seed, &target)?;

        let seed = Individual::new(seed);
        let mut individuals = Vec::with_capacity(self.config.population_size);
        for _ in 0..self.config.population_size {
            let body = random_body(&function, &palette, self.config.expressions_count, &mut self.rng)?;
            individuals.push(seed.with_body(&target, body)?);
        }

        log::info!(
            "Initialized population of {} for {} ({} samples, {} palette entries)",
            individuals.len(),
            target,
            evaluator.sample_count(),
            palette.len()
        );

        self.individuals = individuals;
        self.attached = Some(Attached {
            palette,
            evaluator: Arc::new(evaluator),
            target,
        });
        self.state = PopulationState::Initialized;
        Ok(())
    }

    /// Run generations until the best fitness reaches the target error or
    /// the iteration budget is spent.
    pub fn evolve<C: ProgressCallback + ?Sized>(&mut self, callback: &mut C) -> Result<RunResult> {
        self.expect_state(PopulationState::Initialized)?;
        let (palette, evaluator, target) = match &self.attached {
            Some(a) => (Arc::clone(&a.palette), Arc::clone(&a.evaluator), a.target.clone()),
            None => {
                return Err(GpsynthError::InvalidState {
                    expected: "attached dataset".to_string(),
                    actual: "none".to_string(),
                })
            }
        };

        self.state = PopulationState::Evolving;

        loop {
            let generation = self.generation;
            callback.on_generation_start(generation);

            let evaluated =
                evaluator.evaluate_population(&mut self.individuals, self.config.parallel_evaluation);
            callback.on_evaluation_complete(generation, evaluated);

            for individual in &self.individuals {
                if let Some(elite) = EliteProgram::from_individual(individual, &target) {
                    self.hall_of_fame.try_add(elite);
                }
            }
            let best = self.hall_of_fame.best().cloned().ok_or_else(|| {
                GpsynthError::InvalidState {
                    expected: "an evaluated individual".to_string(),
                    actual: "empty hall of fame".to_string(),
                }
            })?;

            callback.on_generation_complete(generation, best.fitness, self.hall_of_fame.len());
            self.generation += 1;

            let termination = if best.fitness <= self.config.target_error {
                Some(TerminationReason::Converged)
            } else if self.generation >= self.config.iterations {
                Some(TerminationReason::Exhausted)
            } else {
                None
            };

            if let Some(termination) = termination {
                self.state = match termination {
                    TerminationReason::Converged => PopulationState::Converged,
                    TerminationReason::Exhausted => PopulationState::Exhausted,
                };
                log::info!(
                    "Evolution {} after {} generations, best fitness {}",
                    termination,
                    self.generation,
                    best.fitness
                );
                return Ok(RunResult {
                    best_program: best.program,
                    fitness: best.fitness,
                    generations: self.generation,
                    termination,
                });
            }

            self.individuals = self.next_generation(&best, &palette, &target);
        }
    }

    /// Elite first, then children until the population size is restored
    fn next_generation(
        &mut self,
        best: &EliteProgram,
        palette: &FunctionPalette,
        target: &str,
    ) -> Vec<Individual> {
        let size = self.config.population_size;
        let limits = self.limits();
        let mut next = Vec::with_capacity(size);

        let mut elite = Individual::new(best.program.clone());
        elite.set_fitness(best.fitness);
        next.push(elite);

        while next.len() < size {
            let a = select_parent(
                &self.individuals,
                self.config.selection_method,
                self.config.tournament_size,
                &mut self.rng,
            );
            let b = select_parent(
                &self.individuals,
                self.config.selection_method,
                self.config.tournament_size,
                &mut self.rng,
            );
            let mut child = crossover(a, b, target, palette, limits, &mut self.rng);
            mutate(&mut child, target, palette, self.config.mutation_rate, limits, &mut self.rng);
            next.push(child);
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::DatasetEncoder;
    use crate::engines::generation::progress::{ChannelProgressCallback, ProgressMessage};
    use crate::functions::registry::FunctionRegistry;
    use crate::program::interpreter::Interpreter;
    use crate::program::skeleton::build_initial_program;
    use crate::program::validator::validate_body;
    use crate::types::PrimitiveType;
    use std::sync::mpsc;

    const TARGET: &str = "square";

    struct Fixture {
        seed: Program,
        palette: Arc<FunctionPalette>,
        dataset: Arc<Dataset>,
        executor: Arc<dyn Executor>,
    }

    fn fixture(ops: &[&str]) -> Fixture {
        let registry = Arc::new(FunctionRegistry::new());
        let mut palette = FunctionPalette::from_registry(&registry, ops).unwrap();
        palette.set_target(TARGET);
        let dataset = DatasetEncoder::new(10)
            .encode(&[PrimitiveType::F32], &[PrimitiveType::F32], |x| vec![x[0] * x[0]])
            .unwrap();

        Fixture {
            seed: build_initial_program(TARGET, &["f32"], &["f32"]).unwrap(),
            palette: Arc::new(palette),
            dataset: Arc::new(dataset),
            executor: Arc::new(Interpreter::new(registry)),
        }
    }

    fn config(population_size: usize, iterations: usize) -> EvolutionConfig {
        EvolutionConfig {
            population_size,
            iterations,
            target_error: 0.0,
            seed: Some(7),
            ..Default::default()
        }
    }

    fn initialized(config: EvolutionConfig, ops: &[&str]) -> Population {
        let f = fixture(ops);
        let mut population = Population::new(config);
        population.initialize(f.seed, f.palette, f.dataset, f.executor).unwrap();
        population
    }

    #[test]
    fn test_initialize_fills_valid_population() {
        let ops = ["f32.add", "f32.mul"];
        let palette = fixture(&ops).palette;
        for size in [1, 5, 20] {
            let population = initialized(config(size, 10), &ops);
            assert_eq!(population.state(), PopulationState::Initialized);
            assert_eq!(population.individuals().len(), size);
            for individual in population.individuals() {
                let function = individual.program().function(TARGET).unwrap();
                assert_eq!(function.input_types(), vec![PrimitiveType::F32]);
                assert!(validate_body(function, &function.body, &palette).is_ok());
                assert!(!individual.is_evaluated());
            }
        }
    }

    #[test]
    fn test_initialize_rejects_bad_configuration() {
        let f = fixture(&["f32.add"]);
        let mut population = Population::new(config(0, 10));
        let err = population
            .initialize(f.seed, f.palette, f.dataset, f.executor)
            .unwrap_err();
        assert!(matches!(err, GpsynthError::Configuration(_)));
        assert_eq!(population.state(), PopulationState::Uninitialized);
    }

    #[test]
    fn test_initialize_rejects_missing_target() {
        let f = fixture(&["f32.add"]);
        let seed = build_initial_program("other", &["f32"], &["f32"]).unwrap();
        let mut population = Population::new(config(4, 10));
        assert!(matches!(
            population.initialize(seed, f.palette, f.dataset, f.executor),
            Err(GpsynthError::Configuration(_))
        ));
    }

    #[test]
    fn test_initialize_rejects_incompatible_palette() {
        let f = fixture(&["i32.add"]);
        let mut population = Population::new(config(4, 10));
        assert!(matches!(
            population.initialize(f.seed, f.palette, f.dataset, f.executor),
            Err(GpsynthError::Configuration(_))
        ));
    }

    #[test]
    fn test_evolve_requires_initialization() {
        let mut population = Population::new(config(4, 10));
        let (tx, _rx) = mpsc::channel();
        let mut callback = ChannelProgressCallback::new(tx);
        assert!(matches!(
            population.evolve(&mut callback),
            Err(GpsynthError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_exhausts_budget_with_monotonic_best() {
        let mut population = initialized(config(8, 15), &["f32.add", "f32.neg"]);
        let (tx, rx) = mpsc::channel();
        let mut callback = ChannelProgressCallback::new(tx);

        let result = population.evolve(&mut callback).unwrap();
        drop(callback);

        let best: Vec<f64> = rx
            .iter()
            .filter_map(|m| match m {
                ProgressMessage::GenerationComplete { best_fitness, .. } => Some(best_fitness),
                _ => None,
            })
            .collect();

        assert!(best.windows(2).all(|w| w[1] <= w[0]));
        match result.termination {
            TerminationReason::Exhausted => {
                assert_eq!(result.generations, 15);
                assert_eq!(population.state(), PopulationState::Exhausted);
            }
            TerminationReason::Converged => {
                assert!(result.fitness <= 0.0);
                assert_eq!(population.state(), PopulationState::Converged);
            }
        }
        assert_eq!(best.len(), result.generations);
        assert_eq!(population.individuals().len(), 8);
        assert_eq!(result.fitness, *best.last().unwrap());
    }

    #[test]
    fn test_converges_when_target_is_loose() {
        let mut cfg = config(4, 50);
        cfg.target_error = f64::MAX;
        let mut population = initialized(cfg, &["f32.add"]);
        let (tx, _rx) = mpsc::channel();
        let mut callback = ChannelProgressCallback::new(tx);

        let result = population.evolve(&mut callback).unwrap();
        assert_eq!(result.termination, TerminationReason::Converged);
        assert_eq!(result.generations, 1);
        assert!(population.evolve(&mut callback).is_err());
    }

    #[test]
    fn test_same_seed_same_result() {
        let run = || {
            let mut population = initialized(config(6, 10), &["f32.add", "f32.mul"]);
            let (tx, _rx) = mpsc::channel();
            population.evolve(&mut ChannelProgressCallback::new(tx)).unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!(a.fitness, b.fitness);
        assert_eq!(a.best_program, b.best_program);
    }
}

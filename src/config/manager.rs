use super::{
    dataset::DatasetConfig,
    evolution::EvolutionConfig,
    program::ProgramConfig,
    traits::ConfigSection,
};
use crate::error::GpsynthError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `GPSYNTH__EVOLUTION__ITERATIONS=500`
pub const ENV_PREFIX: &str = "GPSYNTH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub program: ProgramConfig,
    pub dataset: DatasetConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GpsynthError> {
        self.evolution.validate()?;
        self.program.validate()?;
        self.dataset.validate()?;

        let outputs = self.program.output_signature.len();
        if outputs != self.dataset.model.output_arity() {
            return Err(GpsynthError::Configuration(format!(
                "Dataset model {:?} produces {} outputs but the output signature declares {}",
                self.dataset.model,
                self.dataset.model.output_arity(),
                outputs
            )));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML or JSON file, then apply `GPSYNTH__*` environment overrides
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GpsynthError> {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        log::info!(
            "Loaded configuration from {} ({}, {}, {})",
            path.as_ref().display(),
            EvolutionConfig::section_name(),
            ProgramConfig::section_name(),
            DatasetConfig::section_name()
        );

        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GpsynthError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| GpsynthError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Apply `f` and keep the result only if it validates
    pub fn update<F>(&self, f: F) -> Result<(), GpsynthError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(|e| e.into_inner());
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::evolution::SelectionMethod;
    use crate::data::DatasetModel;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_model_arity_must_match_outputs() {
        let mut config = AppConfig::default();
        config.dataset.model = DatasetModel::Volume;
        assert!(config.validate().is_err());

        config.program.input_signature = vec!["f32".to_string(), "f32".to_string()];
        config.program.output_signature = vec!["f32".to_string(), "f32".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gpsynth.toml");

        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.evolution.iterations = 42;
                c.evolution.selection_method = SelectionMethod::Tournament;
                c.evolution.seed = Some(9);
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let loaded = ConfigManager::new();
        loaded.load_from_file(&path).unwrap();
        let config = loaded.get();
        assert_eq!(config.evolution.iterations, 42);
        assert_eq!(config.evolution.selection_method, SelectionMethod::Tournament);
        assert_eq!(config.evolution.seed, Some(9));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[evolution]\npopulation_size = 7").unwrap();

        let manager = ConfigManager::new();
        manager.load_from_file(file.path()).unwrap();
        let config = manager.get();
        assert_eq!(config.evolution.population_size, 7);
        assert_eq!(config.program.function_to_evolve, "polynomialFitting");
    }

    #[test]
    fn test_invalid_update_is_discarded() {
        let manager = ConfigManager::new();
        assert!(manager.update(|c| c.evolution.population_size = 0).is_err());
        assert_eq!(manager.get().evolution.population_size, 100);
    }
}

use super::traits::ConfigSection;
use crate::error::GpsynthError;
use crate::types::PrimitiveType;
use serde::{Deserialize, Serialize};

/// Which function is evolved, its signature and the operations it may use
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    pub function_to_evolve: String,
    pub input_signature: Vec<String>,
    pub output_signature: Vec<String>,
    pub function_set: Vec<String>,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            function_to_evolve: "polynomialFitting".to_string(),
            input_signature: vec!["f32".to_string()],
            output_signature: vec!["f32".to_string()],
            function_set: [
                "f32.add", "f32.mul", "f32.sub", "f32.div", "f32.neg", "f32.abs", "f32.pow",
                "f32.cos", "f32.sin", "f32.acos", "f32.asin", "f32.sqrt", "f32.log",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl ConfigSection for ProgramConfig {
    fn section_name() -> &'static str {
        "program"
    }

    fn validate(&self) -> Result<(), GpsynthError> {
        if self.function_to_evolve.trim().is_empty() {
            return Err(GpsynthError::Configuration(
                "Function to evolve must be named".to_string()
            ));
        }
        if self.input_signature.is_empty() || self.output_signature.is_empty() {
            return Err(GpsynthError::Configuration(
                "Input and output signatures must not be empty".to_string()
            ));
        }
        PrimitiveType::parse_signature(&self.input_signature)?;
        PrimitiveType::parse_signature(&self.output_signature)?;
        if self.function_set.is_empty() {
            return Err(GpsynthError::Configuration(
                "Function set must not be empty".to_string()
            ));
        }
        Ok(())
    }
}

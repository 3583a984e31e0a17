use super::traits::ConfigSection;
use crate::data::DatasetModel;
use crate::error::GpsynthError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub sample_size: usize,
    pub model: DatasetModel,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            sample_size: 100,
            model: DatasetModel::Square,
        }
    }
}

impl ConfigSection for DatasetConfig {
    fn section_name() -> &'static str {
        "dataset"
    }

    fn validate(&self) -> Result<(), GpsynthError> {
        if self.sample_size == 0 {
            return Err(GpsynthError::Configuration(
                "Sample size must be positive".to_string()
            ));
        }
        Ok(())
    }
}

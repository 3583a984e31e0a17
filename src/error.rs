use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpsynthError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Structural mutation error: {0}")]
    StructuralMutation(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Invalid state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GpsynthError>;

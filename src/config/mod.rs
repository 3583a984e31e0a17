pub mod traits;
pub mod evolution;
pub mod program;
pub mod dataset;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, SelectionMethod};
pub use program::ProgramConfig;
pub use dataset::DatasetConfig;
pub use traits::ConfigSection;

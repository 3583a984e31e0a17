pub mod hall_of_fame;
pub mod individual;
pub mod operators;
pub mod population;
pub mod progress;

pub use hall_of_fame::{EliteProgram, HallOfFame};
pub use individual::Individual;
pub use population::{Population, PopulationState, RunResult, TerminationReason};
pub use progress::{ChannelProgressCallback, LogProgressCallback, ProgressCallback, ProgressMessage};

pub mod per_byte;

pub use per_byte::{per_byte_error, Evaluator, WORST_FITNESS};

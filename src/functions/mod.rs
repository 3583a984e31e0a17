pub mod palette;
pub mod primitives;
pub mod registry;
pub mod traits;

pub use palette::{FunctionPalette, PaletteEntry};
pub use registry::FunctionRegistry;
pub use traits::Primitive;

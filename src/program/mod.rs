pub mod interpreter;
pub mod model;
pub mod skeleton;
pub mod validator;

pub use interpreter::{Executor, Interpreter};
pub use model::{Expression, Function, Parameter, Program};
pub use skeleton::build_initial_program;
pub use validator::{validate_body, Scope};

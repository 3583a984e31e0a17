use crate::error::Result;
use crate::program::model::{Function, Parameter, Program, MAIN_FUNCTION};
use crate::types::PrimitiveType;

pub const INPUT_PREFIX: &str = "evo_inp";
pub const OUTPUT_PREFIX: &str = "evo_out";
pub const LOCAL_PREFIX: &str = "evo_tmp";

/// Build the seed program: an empty `main` plus the target function with
/// the requested signature and an empty body.
pub fn build_initial_program<S: AsRef<str>>(
    function_to_evolve: &str,
    input_signature: &[S],
    output_signature: &[S],
) -> Result<Program> {
    let input_types = PrimitiveType::parse_signature(input_signature)?;
    let output_types = PrimitiveType::parse_signature(output_signature)?;

    let mut program = Program::new();
    program.add_function(Function::new(MAIN_FUNCTION))?;

    let mut target = Function::new(function_to_evolve);
    target.inputs = parameters(INPUT_PREFIX, &input_types);
    target.outputs = parameters(OUTPUT_PREFIX, &output_types);
    program.add_function(target)?;

    Ok(program)
}

fn parameters(prefix: &str, types: &[PrimitiveType]) -> Vec<Parameter> {
    types
        .iter()
        .enumerate()
        .map(|(i, ty)| Parameter {
            name: format!("{}_{}", prefix, i),
            data_type: *ty,
        })
        .collect()
}

//! Runs one function of a program on one sample.

use crate::data::codec::{decode_value, encode_value};
use crate::error::{GpsynthError, Result};
use crate::functions::registry::FunctionRegistry;
use crate::program::model::Program;
use crate::types::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Capability to execute a program function on serialized arguments
pub trait Executor: Send + Sync {
    /// `inputs` holds one encoded value per input parameter; the result holds
    /// one encoded value per output parameter.
    fn execute(&self, program: &Program, function: &str, inputs: &[&[u8]]) -> Result<Vec<Vec<u8>>>;
}

pub struct Interpreter {
    registry: Arc<FunctionRegistry>,
}

impl Interpreter {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }
}

impl Executor for Interpreter {
    fn execute(&self, program: &Program, function: &str, inputs: &[&[u8]]) -> Result<Vec<Vec<u8>>> {
        let function = program.function(function).ok_or_else(|| {
            GpsynthError::Execution(format!("Function {} not found", function))
        })?;

        if inputs.len() != function.inputs.len() {
            return Err(GpsynthError::Execution(format!(
                "{} takes {} inputs, got {}",
                function.name,
                function.inputs.len(),
                inputs.len()
            )));
        }

        let mut env: HashMap<&str, Value> = HashMap::new();
        for (param, bytes) in function.inputs.iter().zip(inputs) {
            env.insert(param.name.as_str(), decode_value(param.data_type, bytes)?);
        }
        for param in &function.outputs {
            env.insert(param.name.as_str(), Value::zero(param.data_type));
        }

        let mut args = Vec::with_capacity(2);
        for expr in &function.body {
            let primitive = self.registry.get_primitive(&expr.operator).ok_or_else(|| {
                GpsynthError::Execution(format!("Unknown operator {}", expr.operator))
            })?;

            args.clear();
            for operand in &expr.inputs {
                let value = env.get(operand.as_str()).ok_or_else(|| {
                    GpsynthError::Execution(format!("Undefined variable {}", operand))
                })?;
                args.push(*value);
            }

            let result = primitive
                .execute(&args)
                .map_err(|e| GpsynthError::Execution(e.to_string()))?;
            env.insert(expr.output.as_str(), result);
        }

        function
            .outputs
            .iter()
            .map(|param| {
                let value = env[param.name.as_str()];
                if value.data_type() != param.data_type {
                    return Err(GpsynthError::Execution(format!(
                        "Output {} holds {}, declared {}",
                        param.name,
                        value.data_type(),
                        param.data_type
                    )));
                }
                let mut bytes = Vec::with_capacity(param.data_type.width());
                encode_value(&value, &mut bytes);
                Ok(bytes)
            })
            .collect()
    }
}

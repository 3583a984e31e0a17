use crate::error::{GpsynthError, Result};
use crate::types::PrimitiveType;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAIN_PACKAGE: &str = "main";
pub const MAIN_FUNCTION: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub data_type: PrimitiveType,
}

/// `output = operator(inputs...)`
///
/// Operands and destination are variable names. Writing to an undeclared
/// name defines a local of the operator's result type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub operator: String,
    pub inputs: Vec<String>,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<Parameter>,
    pub outputs: Vec<Parameter>,
    pub body: Vec<Expression>,
}

impl Function {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn input_types(&self) -> Vec<PrimitiveType> {
        self.inputs.iter().map(|p| p.data_type).collect()
    }

    pub fn output_types(&self) -> Vec<PrimitiveType> {
        self.outputs.iter().map(|p| p.data_type).collect()
    }

    pub fn is_input(&self, name: &str) -> bool {
        self.inputs.iter().any(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub package: String,
    pub entry: String,
    pub functions: Vec<Function>,
}

impl Program {
    pub fn new() -> Self {
        Self {
            package: MAIN_PACKAGE.to_string(),
            entry: MAIN_FUNCTION.to_string(),
            functions: Vec::new(),
        }
    }

    pub fn add_function(&mut self, function: Function) -> Result<()> {
        if self.function(&function.name).is_some() {
            return Err(GpsynthError::Configuration(format!(
                "Function {} already exists in package {}",
                function.name, self.package
            )));
        }
        self.functions.push(function);
        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn function_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.functions.iter_mut().find(|f| f.name == name)
    }

    pub fn replace_body(&mut self, name: &str, body: Vec<Expression>) -> Result<()> {
        let function = self.function_mut(name).ok_or_else(|| {
            GpsynthError::Configuration(format!("Function {} not found", name))
        })?;
        function.body = body;
        Ok(())
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}({})", self.output, self.operator, self.inputs.join(", "))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = |params: &[Parameter]| {
            params
                .iter()
                .map(|p| format!("{} {}", p.name, p.data_type))
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(f, "func {}({}) ({}) {{", self.name, params(&self.inputs), params(&self.outputs))?;
        for expr in &self.body {
            writeln!(f, "    {}", expr)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "package {}", self.package)?;
        for function in &self.functions {
            writeln!(f)?;
            writeln!(f, "{}", function)?;
        }
        Ok(())
    }
}

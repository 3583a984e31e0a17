use crate::error::{GpsynthError, Result};
use crate::program::model::{Expression, Program};

/// One candidate program and its cached fitness.
///
/// Cloning deep-copies the program. Any change to the body clears the
/// fitness so it is re-evaluated in the next generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    program: Program,
    fitness: Option<f64>,
}

impl Individual {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            fitness: None,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    pub fn body(&self, function: &str) -> Result<&[Expression]> {
        self.program
            .function(function)
            .map(|f| f.body.as_slice())
            .ok_or_else(|| {
                GpsynthError::Configuration(format!("Function {} not found", function))
            })
    }

    /// Replace the body of `function` in place
    pub fn replace_body(&mut self, function: &str, body: Vec<Expression>) -> Result<()> {
        self.program.replace_body(function, body)?;
        self.fitness = None;
        Ok(())
    }

    /// Clone with `body` as the new body, leaving `self` untouched
    pub fn with_body(&self, function: &str, body: Vec<Expression>) -> Result<Self> {
        let mut child = Self::new(self.program.clone());
        child.replace_body(function, body)?;
        Ok(child)
    }

    /// Stable textual form of the evolved body, used for deduplication
    pub fn canonical_string(&self, function: &str) -> String {
        self.body(function)
            .ok()
            .and_then(|body| serde_json::to_string(body).ok())
            .unwrap_or_default()
    }
}

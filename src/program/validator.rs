use crate::error::{GpsynthError, Result};
use crate::functions::palette::FunctionPalette;
use crate::program::model::{Expression, Function};
use crate::types::PrimitiveType;

#[derive(Debug, Clone)]
struct Variable {
    name: String,
    data_type: PrimitiveType,
    writable: bool,
}

/// Variables visible at one point of a function body, in definition order
#[derive(Debug, Clone)]
pub struct Scope {
    variables: Vec<Variable>,
}

impl Scope {
    /// Scope at the top of the body: parameters only
    pub fn new(function: &Function) -> Self {
        let inputs = function.inputs.iter().map(|p| Variable {
            name: p.name.clone(),
            data_type: p.data_type,
            writable: false,
        });
        let outputs = function.outputs.iter().map(|p| Variable {
            name: p.name.clone(),
            data_type: p.data_type,
            writable: true,
        });
        Self {
            variables: inputs.chain(outputs).collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<PrimitiveType> {
        self.variables.iter().find(|v| v.name == name).map(|v| v.data_type)
    }

    pub fn has_type(&self, data_type: PrimitiveType) -> bool {
        self.variables.iter().any(|v| v.data_type == data_type)
    }

    pub fn variables_of(&self, data_type: PrimitiveType) -> Vec<&str> {
        self.variables
            .iter()
            .filter(|v| v.data_type == data_type)
            .map(|v| v.name.as_str())
            .collect()
    }

    /// Check `expr` against the scope and record the variable it defines
    pub fn apply(&mut self, expr: &Expression, palette: &FunctionPalette) -> Result<()> {
        let entry = palette.get(&expr.operator).ok_or_else(|| {
            GpsynthError::StructuralMutation(format!("{} is not in the palette", expr.operator))
        })?;

        if expr.inputs.len() != entry.arity {
            return Err(GpsynthError::StructuralMutation(format!(
                "{} expects {} operands, got {}",
                expr.operator,
                entry.arity,
                expr.inputs.len()
            )));
        }

        for operand in &expr.inputs {
            match self.lookup(operand) {
                Some(ty) if ty == entry.operand_type => {}
                Some(ty) => {
                    return Err(GpsynthError::StructuralMutation(format!(
                        "{} reads {} of type {}, expected {}",
                        expr.operator, operand, ty, entry.operand_type
                    )))
                }
                None => {
                    return Err(GpsynthError::StructuralMutation(format!(
                        "{} reads undefined variable {}",
                        expr.operator, operand
                    )))
                }
            }
        }

        match self.variables.iter().find(|v| v.name == expr.output) {
            Some(v) if !v.writable => Err(GpsynthError::StructuralMutation(format!(
                "{} writes to input parameter {}",
                expr.operator, expr.output
            ))),
            Some(v) if v.data_type != entry.result_type => {
                Err(GpsynthError::StructuralMutation(format!(
                    "{} writes {} into {} of type {}",
                    expr.operator, entry.result_type, expr.output, v.data_type
                )))
            }
            Some(_) => Ok(()),
            None => {
                self.variables.push(Variable {
                    name: expr.output.clone(),
                    data_type: entry.result_type,
                    writable: true,
                });
                Ok(())
            }
        }
    }
}

/// Validate `body` as the body of `function`
pub fn validate_body(
    function: &Function,
    body: &[Expression],
    palette: &FunctionPalette,
) -> Result<()> {
    let mut scope = Scope::new(function);
    for expr in body {
        scope.apply(expr, palette)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::registry::FunctionRegistry;
    use crate::program::skeleton::build_initial_program;

    fn expr(operator: &str, inputs: &[&str], output: &str) -> Expression {
        Expression {
            operator: operator.to_string(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            output: output.to_string(),
        }
    }

    fn setup() -> (Function, FunctionPalette) {
        let program = build_initial_program("target", &["f32"], &["f32"]).unwrap();
        let palette = FunctionPalette::from_registry(
            &FunctionRegistry::new(),
            &["f32.add", "f32.mul", "i32.add"],
        )
        .unwrap();
        (program.function("target").unwrap().clone(), palette)
    }

    #[test]
    fn test_valid_body_with_local() {
        let (function, palette) = setup();
        let body = vec![
            expr("f32.mul", &["evo_inp_0", "evo_inp_0"], "evo_tmp_0"),
            expr("f32.add", &["evo_tmp_0", "evo_inp_0"], "evo_out_0"),
        ];
        assert!(validate_body(&function, &body, &palette).is_ok());
    }

    #[test]
    fn test_use_before_definition() {
        let (function, palette) = setup();
        let body = vec![expr("f32.add", &["evo_tmp_3", "evo_inp_0"], "evo_out_0")];
        assert!(matches!(
            validate_body(&function, &body, &palette),
            Err(GpsynthError::StructuralMutation(_))
        ));
    }

    #[test]
    fn test_type_and_arity_checks() {
        let (function, palette) = setup();
        let wrong_type = vec![expr("i32.add", &["evo_inp_0", "evo_inp_0"], "evo_tmp_0")];
        assert!(validate_body(&function, &wrong_type, &palette).is_err());

        let wrong_arity = vec![expr("f32.add", &["evo_inp_0"], "evo_out_0")];
        assert!(validate_body(&function, &wrong_arity, &palette).is_err());

        let not_in_palette = vec![expr("f32.sub", &["evo_inp_0", "evo_inp_0"], "evo_out_0")];
        assert!(validate_body(&function, &not_in_palette, &palette).is_err());
    }

    #[test]
    fn test_inputs_are_read_only() {
        let (function, palette) = setup();
        let body = vec![expr("f32.add", &["evo_inp_0", "evo_inp_0"], "evo_inp_0")];
        assert!(validate_body(&function, &body, &palette).is_err());
    }

    #[test]
    fn test_scope_tracks_types() {
        let (function, palette) = setup();
        let mut scope = Scope::new(&function);
        assert!(scope.has_type(PrimitiveType::F32));
        assert!(!scope.has_type(PrimitiveType::I32));
        scope
            .apply(&expr("f32.mul", &["evo_inp_0", "evo_out_0"], "evo_tmp_0"), &palette)
            .unwrap();
        assert_eq!(
            scope.variables_of(PrimitiveType::F32),
            vec!["evo_inp_0", "evo_out_0", "evo_tmp_0"]
        );
    }
}

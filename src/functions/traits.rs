use anyhow::Result;
use crate::types::{PrimitiveType, Value};

/// Primitive operation callable from an evolved expression
pub trait Primitive: Send + Sync {
    /// Display name
    fn ui_name(&self) -> &'static str;

    /// Alias used in expressions, e.g. `f32.add`
    fn alias(&self) -> &'static str;

    /// Number of operands
    fn arity(&self) -> usize;

    /// Type shared by every operand
    fn operand_type(&self) -> PrimitiveType;

    fn result_type(&self) -> PrimitiveType;

    /// Apply to already type-checked operands
    fn execute(&self, args: &[Value]) -> Result<Value>;
}

use anyhow::{bail, Result};
use crate::functions::traits::Primitive;
use crate::types::{PrimitiveType, Value};

fn check_args(primitive: &dyn Primitive, args: &[Value]) -> Result<()> {
    if args.len() != primitive.arity() {
        bail!(
            "{} expects {} operands, got {}",
            primitive.alias(),
            primitive.arity(),
            args.len()
        );
    }
    if let Some(bad) = args.iter().find(|a| a.data_type() != primitive.operand_type()) {
        bail!(
            "{} expects {} operands, got {}",
            primitive.alias(),
            primitive.operand_type(),
            bad.data_type()
        );
    }
    Ok(())
}

// --- Floating point ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Min,
    Max,
    Neg,
    Abs,
    Cos,
    Sin,
    Acos,
    Asin,
    Sqrt,
    Log,
}

impl FloatOp {
    fn arity(&self) -> usize {
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Pow | Self::Min | Self::Max => 2,
            _ => 1,
        }
    }
}

pub struct FloatPrimitive {
    pub alias: &'static str,
    pub ui_name: &'static str,
    pub data_type: PrimitiveType,
    pub op: FloatOp,
}

impl Primitive for FloatPrimitive {
    fn ui_name(&self) -> &'static str { self.ui_name }
    fn alias(&self) -> &'static str { self.alias }
    fn arity(&self) -> usize { self.op.arity() }
    fn operand_type(&self) -> PrimitiveType { self.data_type }
    fn result_type(&self) -> PrimitiveType { self.data_type }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        check_args(self, args)?;
        // f64 intermediates round back exactly for the basic arithmetic ops
        let a = args[0].as_f64();
        let b = args.get(1).map(Value::as_f64).unwrap_or(0.0);
        let result = match self.op {
            FloatOp::Add => a + b,
            FloatOp::Sub => a - b,
            FloatOp::Mul => a * b,
            FloatOp::Div => a / b,
            FloatOp::Pow => a.powf(b),
            FloatOp::Min => a.min(b),
            FloatOp::Max => a.max(b),
            FloatOp::Neg => -a,
            FloatOp::Abs => a.abs(),
            FloatOp::Cos => a.cos(),
            FloatOp::Sin => a.sin(),
            FloatOp::Acos => a.acos(),
            FloatOp::Asin => a.asin(),
            FloatOp::Sqrt => a.sqrt(),
            FloatOp::Log => a.ln(),
        };
        Ok(Value::from_f64(self.data_type, result))
    }
}

// --- Integer ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Min,
    Max,
    Neg,
    Abs,
}

impl IntOp {
    fn arity(&self) -> usize {
        match self {
            Self::Neg | Self::Abs => 1,
            _ => 2,
        }
    }
}

pub struct IntPrimitive {
    pub alias: &'static str,
    pub ui_name: &'static str,
    pub data_type: PrimitiveType,
    pub op: IntOp,
}

fn as_i64(value: &Value) -> i64 {
    match *value {
        Value::I32(v) => v as i64,
        Value::I64(v) => v,
        Value::F32(v) => v as i64,
        Value::F64(v) => v as i64,
    }
}

impl Primitive for IntPrimitive {
    fn ui_name(&self) -> &'static str { self.ui_name }
    fn alias(&self) -> &'static str { self.alias }
    fn arity(&self) -> usize { self.op.arity() }
    fn operand_type(&self) -> PrimitiveType { self.data_type }
    fn result_type(&self) -> PrimitiveType { self.data_type }
    fn execute(&self, args: &[Value]) -> Result<Value> {
        check_args(self, args)?;
        let a = as_i64(&args[0]);
        let b = args.get(1).map(as_i64).unwrap_or(0);
        let result = match self.op {
            IntOp::Add => a.wrapping_add(b),
            IntOp::Sub => a.wrapping_sub(b),
            IntOp::Mul => a.wrapping_mul(b),
            IntOp::Div | IntOp::Mod if b == 0 => bail!("{}: division by zero", self.alias),
            IntOp::Div => a.wrapping_div(b),
            IntOp::Mod => a.wrapping_rem(b),
            IntOp::Min => a.min(b),
            IntOp::Max => a.max(b),
            IntOp::Neg => a.wrapping_neg(),
            IntOp::Abs => a.wrapping_abs(),
        };
        // i32 results wrap through the truncating cast
        Ok(match self.data_type {
            PrimitiveType::I32 => Value::I32(result as i32),
            _ => Value::I64(result),
        })
    }
}

pub const FLOAT_OPS: &[(FloatOp, &str, &str, &str)] = &[
    (FloatOp::Add, "f32.add", "f64.add", "Addition"),
    (FloatOp::Sub, "f32.sub", "f64.sub", "Subtraction"),
    (FloatOp::Mul, "f32.mul", "f64.mul", "Multiplication"),
    (FloatOp::Div, "f32.div", "f64.div", "Division"),
    (FloatOp::Pow, "f32.pow", "f64.pow", "Power"),
    (FloatOp::Min, "f32.min", "f64.min", "Minimum"),
    (FloatOp::Max, "f32.max", "f64.max", "Maximum"),
    (FloatOp::Neg, "f32.neg", "f64.neg", "Negation"),
    (FloatOp::Abs, "f32.abs", "f64.abs", "Absolute Value"),
    (FloatOp::Cos, "f32.cos", "f64.cos", "Cosine"),
    (FloatOp::Sin, "f32.sin", "f64.sin", "Sine"),
    (FloatOp::Acos, "f32.acos", "f64.acos", "Arc Cosine"),
    (FloatOp::Asin, "f32.asin", "f64.asin", "Arc Sine"),
    (FloatOp::Sqrt, "f32.sqrt", "f64.sqrt", "Square Root"),
    (FloatOp::Log, "f32.log", "f64.log", "Natural Logarithm"),
];

pub const INT_OPS: &[(IntOp, &str, &str, &str)] = &[
    (IntOp::Add, "i32.add", "i64.add", "Addition"),
    (IntOp::Sub, "i32.sub", "i64.sub", "Subtraction"),
    (IntOp::Mul, "i32.mul", "i64.mul", "Multiplication"),
    (IntOp::Div, "i32.div", "i64.div", "Division"),
    (IntOp::Mod, "i32.mod", "i64.mod", "Modulo"),
    (IntOp::Min, "i32.min", "i64.min", "Minimum"),
    (IntOp::Max, "i32.max", "i64.max", "Maximum"),
    (IntOp::Neg, "i32.neg", "i64.neg", "Negation"),
    (IntOp::Abs, "i32.abs", "i64.abs", "Absolute Value"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn float(op: FloatOp) -> FloatPrimitive {
        FloatPrimitive { alias: "f32.test", ui_name: "Test", data_type: PrimitiveType::F32, op }
    }

    fn int(op: IntOp) -> IntPrimitive {
        IntPrimitive { alias: "i32.test", ui_name: "Test", data_type: PrimitiveType::I32, op }
    }

    #[test]
    fn test_f32_mul_stays_f32() {
        let out = float(FloatOp::Mul).execute(&[Value::F32(3.0), Value::F32(4.0)]).unwrap();
        assert_eq!(out, Value::F32(12.0));
    }

    #[test]
    fn test_operand_type_is_checked() {
        assert!(float(FloatOp::Add).execute(&[Value::F32(1.0), Value::I32(1)]).is_err());
        assert!(float(FloatOp::Neg).execute(&[Value::F32(1.0), Value::F32(1.0)]).is_err());
    }

    #[test]
    fn test_i32_add_wraps() {
        let out = int(IntOp::Add).execute(&[Value::I32(i32::MAX), Value::I32(1)]).unwrap();
        assert_eq!(out, Value::I32(i32::MIN));
    }

    #[test]
    fn test_integer_division_by_zero_fails() {
        assert!(int(IntOp::Div).execute(&[Value::I32(4), Value::I32(0)]).is_err());
        assert!(int(IntOp::Mod).execute(&[Value::I32(4), Value::I32(0)]).is_err());
        let out = int(IntOp::Mod).execute(&[Value::I32(7), Value::I32(3)]).unwrap();
        assert_eq!(out, Value::I32(1));
    }
}

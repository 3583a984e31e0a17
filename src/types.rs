use crate::error::{GpsynthError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primitive numeric types a target function signature may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    F32,
    F64,
    I32,
    I64,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 4] = [Self::F32, Self::F64, Self::I32, Self::I64];

    /// Serialized width of one sample, in bytes
    pub fn width(&self) -> usize {
        match self {
            Self::F32 | Self::I32 => 4,
            Self::F64 | Self::I64 => 8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::I32 => "i32",
            Self::I64 => "i64",
        }
    }

    /// Parse an ordered list of type names, failing on the first unknown one
    pub fn parse_signature<S: AsRef<str>>(names: &[S]) -> Result<Vec<PrimitiveType>> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl FromStr for PrimitiveType {
    type Err = GpsynthError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                GpsynthError::Configuration(format!("Unrecognized primitive type: {}", s))
            })
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime value held by a program variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    F32(f32),
    F64(f64),
    I32(i32),
    I64(i64),
}

impl Value {
    pub fn zero(ty: PrimitiveType) -> Self {
        match ty {
            PrimitiveType::F32 => Value::F32(0.0),
            PrimitiveType::F64 => Value::F64(0.0),
            PrimitiveType::I32 => Value::I32(0),
            PrimitiveType::I64 => Value::I64(0),
        }
    }

    pub fn data_type(&self) -> PrimitiveType {
        match self {
            Value::F32(_) => PrimitiveType::F32,
            Value::F64(_) => PrimitiveType::F64,
            Value::I32(_) => PrimitiveType::I32,
            Value::I64(_) => PrimitiveType::I64,
        }
    }

    /// Lossy conversion used when building datasets from f64 models
    pub fn from_f64(ty: PrimitiveType, value: f64) -> Self {
        match ty {
            PrimitiveType::F32 => Value::F32(value as f32),
            PrimitiveType::F64 => Value::F64(value),
            PrimitiveType::I32 => Value::I32(value as i32),
            PrimitiveType::I64 => Value::I64(value as i64),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::F32(v) => v as f64,
            Value::F64(v) => v,
            Value::I32(v) => v as f64,
            Value::I64(v) => v as f64,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        let types = PrimitiveType::parse_signature(&["f32", "i64"]).unwrap();
        assert_eq!(types, vec![PrimitiveType::F32, PrimitiveType::I64]);
        assert_eq!(types[0].width(), 4);
        assert_eq!(types[1].width(), 8);
    }

    #[test]
    fn test_parse_unknown_type_is_configuration_error() {
        let err = PrimitiveType::parse_signature(&["f32", "str"]).unwrap_err();
        assert!(matches!(err, GpsynthError::Configuration(_)));
    }

    #[test]
    fn test_from_f64_casts_to_declared_type() {
        assert_eq!(Value::from_f64(PrimitiveType::I32, 3.9), Value::I32(3));
        assert_eq!(Value::from_f64(PrimitiveType::F32, 2.5), Value::F32(2.5));
        assert_eq!(Value::zero(PrimitiveType::I64).data_type(), PrimitiveType::I64);
    }
}

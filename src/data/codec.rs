//! Fixed-width little-endian encoding of sample values.
//!
//! Byte-level fitness comparison relies on every value of a given type always
//! serializing to the same bytes, so nothing here is allowed to vary by
//! platform.

use crate::error::{GpsynthError, Result};
use crate::types::{PrimitiveType, Value};

/// Numeric types with a deterministic fixed-width encoding
pub trait Codec: Sized + Copy {
    const WIDTH: usize;

    fn encode_into(self, out: &mut Vec<u8>);

    fn decode(bytes: &[u8]) -> Result<Self>;
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| {
        GpsynthError::Execution(format!("expected {} bytes, got {}", N, bytes.len()))
    })
}

impl Codec for f32 {
    const WIDTH: usize = 4;

    fn encode_into(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(f32::from_le_bytes(fixed(bytes)?))
    }
}

impl Codec for f64 {
    const WIDTH: usize = 8;

    fn encode_into(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(f64::from_le_bytes(fixed(bytes)?))
    }
}

impl Codec for i32 {
    const WIDTH: usize = 4;

    fn encode_into(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(i32::from_le_bytes(fixed(bytes)?))
    }
}

impl Codec for i64 {
    const WIDTH: usize = 8;

    fn encode_into(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(i64::from_le_bytes(fixed(bytes)?))
    }
}

pub fn encode_value(value: &Value, out: &mut Vec<u8>) {
    match *value {
        Value::F32(v) => v.encode_into(out),
        Value::F64(v) => v.encode_into(out),
        Value::I32(v) => v.encode_into(out),
        Value::I64(v) => v.encode_into(out),
    }
}

pub fn decode_value(ty: PrimitiveType, bytes: &[u8]) -> Result<Value> {
    Ok(match ty {
        PrimitiveType::F32 => Value::F32(f32::decode(bytes)?),
        PrimitiveType::F64 => Value::F64(f64::decode(bytes)?),
        PrimitiveType::I32 => Value::I32(i32::decode(bytes)?),
        PrimitiveType::I64 => Value::I64(i64::decode(bytes)?),
    })
}

/// Decode a whole channel buffer; the length must be a multiple of the width
pub fn decode_all<T: Codec>(buffer: &[u8]) -> Result<Vec<T>> {
    if buffer.len() % T::WIDTH != 0 {
        return Err(GpsynthError::Execution(format!(
            "buffer length {} is not a multiple of {}",
            buffer.len(),
            T::WIDTH
        )));
    }
    buffer.chunks_exact(T::WIDTH).map(T::decode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_is_little_endian() {
        let mut out = Vec::new();
        1.0f32.encode_into(&mut out);
        assert_eq!(out, vec![0x00, 0x00, 0x80, 0x3f]);
    }

    #[test]
    fn test_decode_rejects_wrong_width() {
        assert!(f32::decode(&[0, 0, 0]).is_err());
        assert!(decode_value(PrimitiveType::I64, &[0; 4]).is_err());
    }

    #[test]
    fn test_value_encoding_matches_width() {
        for ty in PrimitiveType::ALL {
            let mut out = Vec::new();
            encode_value(&Value::from_f64(ty, 7.0), &mut out);
            assert_eq!(out.len(), ty.width());
            assert_eq!(decode_value(ty, &out).unwrap(), Value::from_f64(ty, 7.0));
        }
    }

    #[test]
    fn test_decode_all_rejects_partial_sample() {
        assert!(decode_all::<i32>(&[1, 0, 0, 0, 2]).is_err());
    }
}

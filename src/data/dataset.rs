//! Serialized sample buffers, one per input and output channel.

use crate::data::codec::encode_value;
use crate::error::{GpsynthError, Result};
use crate::types::{PrimitiveType, Value};

/// Input and output channel buffers of a target dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    inputs: Vec<Vec<u8>>,
    outputs: Vec<Vec<u8>>,
}

impl Dataset {
    pub fn new(inputs: Vec<Vec<u8>>, outputs: Vec<Vec<u8>>) -> Self {
        Self { inputs, outputs }
    }

    pub fn inputs(&self) -> &[Vec<u8>] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Vec<u8>] {
        &self.outputs
    }

    /// Number of samples encoded for the given signature.
    ///
    /// Fails unless there is exactly one buffer per parameter, every buffer
    /// holds whole samples of its type, and all channels agree on the count.
    pub fn sample_count(
        &self,
        input_types: &[PrimitiveType],
        output_types: &[PrimitiveType],
    ) -> Result<usize> {
        let inputs = role_sample_count("input", &self.inputs, input_types)?;
        let outputs = role_sample_count("output", &self.outputs, output_types)?;
        match (inputs, outputs) {
            (Some(i), Some(o)) if i != o => Err(GpsynthError::Configuration(format!(
                "Input buffers hold {} samples but output buffers hold {}",
                i, o
            ))),
            (Some(n), _) | (None, Some(n)) => Ok(n),
            (None, None) => Ok(0),
        }
    }
}

fn role_sample_count(
    role: &str,
    buffers: &[Vec<u8>],
    types: &[PrimitiveType],
) -> Result<Option<usize>> {
    if buffers.len() != types.len() {
        return Err(GpsynthError::Configuration(format!(
            "Dataset has {} {} buffers but the signature declares {}",
            buffers.len(),
            role,
            types.len()
        )));
    }

    let mut count = None;
    for (channel, (buffer, ty)) in buffers.iter().zip(types).enumerate() {
        if buffer.len() % ty.width() != 0 {
            return Err(GpsynthError::Configuration(format!(
                "{} channel {} has {} bytes, not a multiple of {} ({})",
                role,
                channel,
                buffer.len(),
                ty.width(),
                ty
            )));
        }
        let samples = buffer.len() / ty.width();
        match count {
            Some(expected) if expected != samples => {
                return Err(GpsynthError::Configuration(format!(
                    "{} channel {} holds {} samples, expected {}",
                    role, channel, samples, expected
                )));
            }
            _ => count = Some(samples),
        }
    }
    Ok(count)
}

/// Builds datasets by sampling a mapping at indices `0..sample_size`
pub struct DatasetEncoder {
    sample_size: usize,
}

impl DatasetEncoder {
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size }
    }

    /// Every input channel receives the value `i` for sample `i`; outputs
    /// hold `mapping` evaluated on those inputs, cast to each channel type.
    pub fn encode<F>(
        &self,
        input_types: &[PrimitiveType],
        output_types: &[PrimitiveType],
        mapping: F,
    ) -> Result<Dataset>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        if self.sample_size == 0 {
            return Err(GpsynthError::Configuration(
                "Sample size must be positive".to_string(),
            ));
        }

        let mut inputs: Vec<Vec<u8>> = input_types
            .iter()
            .map(|ty| Vec::with_capacity(self.sample_size * ty.width()))
            .collect();
        let mut outputs: Vec<Vec<u8>> = output_types
            .iter()
            .map(|ty| Vec::with_capacity(self.sample_size * ty.width()))
            .collect();

        let mut sample = Vec::with_capacity(input_types.len());
        for i in 0..self.sample_size {
            sample.clear();
            for (buffer, ty) in inputs.iter_mut().zip(input_types) {
                let value = Value::from_f64(*ty, i as f64);
                encode_value(&value, buffer);
                sample.push(value.as_f64());
            }

            let expected = mapping(&sample);
            if expected.len() != output_types.len() {
                return Err(GpsynthError::Configuration(format!(
                    "Mapping produced {} outputs but the signature declares {}",
                    expected.len(),
                    output_types.len()
                )));
            }
            for ((buffer, ty), value) in outputs.iter_mut().zip(output_types).zip(expected) {
                encode_value(&Value::from_f64(*ty, value), buffer);
            }
        }

        Ok(Dataset::new(inputs, outputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::codec::decode_all;

    #[test]
    fn test_input_channels_are_identical() {
        let types = [PrimitiveType::F32, PrimitiveType::F32];
        let dataset = DatasetEncoder::new(5)
            .encode(&types, &[PrimitiveType::F32], |x| vec![x[0] + x[1]])
            .unwrap();

        assert_eq!(dataset.inputs().len(), 2);
        assert_eq!(dataset.inputs()[0], dataset.inputs()[1]);
        assert_eq!(dataset.inputs()[0].len(), 5 * 4);
        let outputs = decode_all::<f32>(&dataset.outputs()[0]).unwrap();
        assert_eq!(outputs, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_mixed_widths_share_sample_count() {
        let dataset = DatasetEncoder::new(3)
            .encode(&[PrimitiveType::I64], &[PrimitiveType::I32], |x| vec![x[0] * 2.0])
            .unwrap();
        assert_eq!(dataset.inputs()[0].len(), 24);
        assert_eq!(dataset.outputs()[0].len(), 12);
        let count = dataset
            .sample_count(&[PrimitiveType::I64], &[PrimitiveType::I32])
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_mapping_arity_mismatch() {
        let result = DatasetEncoder::new(3).encode(
            &[PrimitiveType::F32],
            &[PrimitiveType::F32, PrimitiveType::F32],
            |x| vec![x[0]],
        );
        assert!(matches!(result, Err(GpsynthError::Configuration(_))));
    }

    #[test]
    fn test_sample_count_detects_ragged_buffers() {
        let dataset = Dataset::new(vec![vec![0; 8], vec![0; 12]], vec![vec![0; 8]]);
        let types = [PrimitiveType::F32, PrimitiveType::F32];
        assert!(dataset.sample_count(&types, &[PrimitiveType::F32]).is_err());
    }

    #[test]
    fn test_sample_count_detects_partial_sample() {
        let dataset = Dataset::new(vec![vec![0; 6]], vec![vec![0; 8]]);
        assert!(dataset
            .sample_count(&[PrimitiveType::F32], &[PrimitiveType::F32])
            .is_err());
    }
}

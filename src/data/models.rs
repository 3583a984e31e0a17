use serde::{Deserialize, Serialize};

/// Built-in numeric mappings used to generate target datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetModel {
    /// x0 * x0
    Square,
    /// x0 * x0 + x0 + 1
    Polynomial,
    /// `volume(x0, x0, x0)`: sum of squares and sum of pairwise products
    Volume,
}

impl DatasetModel {
    pub fn output_arity(&self) -> usize {
        match self {
            Self::Square | Self::Polynomial => 1,
            Self::Volume => 2,
        }
    }

    pub fn apply(&self, inputs: &[f64]) -> Vec<f64> {
        let x = inputs.first().copied().unwrap_or(0.0);
        match self {
            Self::Square => vec![x * x],
            Self::Polynomial => vec![x * x + x + 1.0],
            Self::Volume => {
                let (a, b, c) = (x, x, x);
                vec![a * a + b * b + c * c, a * b + b * c + c * a]
            }
        }
    }
}

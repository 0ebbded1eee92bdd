//! Fitted min-max feature scaler
//!
//! Normalizes an aligned feature vector into the range the models were
//! trained on. The fit parameters (per-column minimum and range) come from
//! the scaler artifact; this module only applies them.

use crate::error::ArtifactError;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Fitted min-max transform: `(x - data_min) / data_range` per column
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct MinMaxScaler {
    pub data_min: Vec<f64>,
    pub data_range: Vec<f64>,
}

impl MinMaxScaler {
    /// Scale a vector of the fitted dimensionality. Columns with zero
    /// range (constant in training) map to 0.
    pub fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ArtifactError> {
        if input.len() != self.data_min.len() || self.data_min.len() != self.data_range.len() {
            return Err(ArtifactError::DimensionMismatch {
                expected: self.data_min.len(),
                actual: input.len(),
            });
        }
        Ok(input
            .iter()
            .zip(self.data_min.iter().zip(&self.data_range))
            .map(|(x, (min, range))| {
                if *range > 0.0 {
                    (x - min) / range
                } else {
                    0.0
                }
            })
            .collect())
    }
}

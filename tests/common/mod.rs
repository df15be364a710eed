//! Deterministic model doubles shared by the integration tests

#![allow(dead_code)]

use ndarray::{Array2, ArrayD, Ix4};
use percept::pipeline::Forward;
use percept::{PerceptError, Result};

/// Linear stand-in for a loaded network: each item's logits depend only on
/// its pixel sum, so predictions are stable across runs and platforms.
/// Items with a negative pixel sum predict class 0; items with a positive
/// sum predict the highest class.
pub struct SumModel {
    pub classes: usize,
}

impl Forward for SumModel {
    fn forward(&self, input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let input = input
            .into_dimensionality::<Ix4>()
            .map_err(|e| PerceptError::Inference(e.to_string()))?;
        let n = input.shape()[0];

        let mut logits = Array2::<f32>::zeros((n, self.classes));
        for (i, item) in input.outer_iter().enumerate() {
            let sum: f32 = item.sum();
            for c in 0..self.classes {
                logits[[i, c]] = sum * (c as f32 + 1.0) * 0.001;
            }
        }
        Ok(logits.into_dyn())
    }
}

/// Returns the same fixed logits row for every batch item
pub struct ConstantModel {
    pub row: Vec<f32>,
}

impl Forward for ConstantModel {
    fn forward(&self, input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let n = input.shape()[0];
        let classes = self.row.len();
        let logits = Array2::from_shape_fn((n, classes), |(_, c)| self.row[c]);
        Ok(logits.into_dyn())
    }
}

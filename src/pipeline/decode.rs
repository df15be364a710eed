//! Output decoding
//!
//! Turns raw output logits into host-representable predictions. The batch
//! path takes the arg-max class index per row; the single-image path
//! additionally normalizes the logits into a probability distribution and
//! attaches the decoded label from the model's label table.

use std::sync::Arc;

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::OutputDecoder;
use crate::error::{PerceptError, Result};
use crate::model::LabelTable;

/// Index of the largest logit. Ties break to the lowest class index.
pub fn argmax(row: ArrayView1<'_, f32>) -> usize {
    let mut best = 0;
    let mut best_val = f32::NEG_INFINITY;
    for (i, &val) in row.iter().enumerate() {
        if val > best_val {
            best = i;
            best_val = val;
        }
    }
    best
}

/// Numerically stable softmax over one logits row
pub fn softmax(row: ArrayView1<'_, f32>) -> Array1<f32> {
    let max_val = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp: Array1<f32> = row.mapv(|x| (x - max_val).exp());
    let sum = exp.sum();
    exp.mapv(|v| v / sum)
}

/// Batch decoder: one integer class index per batch item, index-aligned
/// with the input batch order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgmaxDecoder;

impl OutputDecoder for ArgmaxDecoder {
    type Output = Vec<i64>;

    fn decode(&self, logits: &Array2<f32>) -> Result<Vec<i64>> {
        Ok(logits.rows().into_iter().map(|row| argmax(row) as i64).collect())
    }
}

/// One decoded prediction: class index, label, probability score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassPrediction {
    pub class_id: usize,
    pub class_name: String,
    pub score: f32,
}

/// Single-image decoder: top class after softmax, with its label and score
#[derive(Debug, Clone)]
pub struct TopLabelDecoder {
    labels: Arc<LabelTable>,
}

impl TopLabelDecoder {
    pub fn new(labels: Arc<LabelTable>) -> Self {
        Self { labels }
    }
}

impl OutputDecoder for TopLabelDecoder {
    type Output = Vec<ClassPrediction>;

    fn decode(&self, logits: &Array2<f32>) -> Result<Vec<ClassPrediction>> {
        logits
            .rows()
            .into_iter()
            .map(|row| {
                let probabilities = softmax(row);
                let class_id = argmax(probabilities.view());
                let class_name = self
                    .labels
                    .get(class_id)
                    .ok_or_else(|| {
                        PerceptError::LabelTable(format!(
                            "class index {class_id} outside label table of {} entries",
                            self.labels.len()
                        ))
                    })?
                    .to_string();
                Ok(ClassPrediction {
                    class_id,
                    class_name,
                    score: probabilities[class_id],
                })
            })
            .collect()
    }
}

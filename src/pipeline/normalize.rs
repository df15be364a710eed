//! Raw-array input normalization
//!
//! Canonicalizes numeric arrays of varying rank into the exact
//! (N, 1, H, W) float tensor the batch classifier expects. Supported shape
//! classes:
//!
//! | rank | interpretation | transform |
//! |------|----------------|-----------|
//! | 1 | flattened image(s) | reshape to (N, H, W) |
//! | 2 | single image | add batch axis → (1, H, W) |
//! | 3 | already batched | pass through |
//! | 4 | batched with singleton channel axis | drop the axis → (N, H, W) |
//!
//! Anything else is a shape error naming the supported set. The channel
//! axis of a rank-4 input must actually be size 1; a non-singleton axis is
//! rejected rather than silently reshaped. After shape resolution the data
//! is standardized as `(x - mean) / std` and a channel axis of size 1 is
//! inserted, yielding (N, 1, H, W).
//!
//! Normalization borrows its input and is deterministic: the same raw
//! input always produces the same canonical tensor.

use ndarray::{Array4, ArrayD};
use serde_json::Value;

use super::InputAdapter;
use crate::error::{PerceptError, Result};

/// Canonical tensor geometry and standardization constants for one model
#[derive(Debug, Clone, Copy)]
pub struct TensorSpec {
    pub height: usize,
    pub width: usize,
    pub mean: f32,
    pub std: f32,
}

impl Default for TensorSpec {
    /// The digit classifier's spec: 28×28 single-channel input,
    /// standardized with the dataset's global mean and deviation.
    fn default() -> Self {
        Self {
            height: 28,
            width: 28,
            mean: 0.1307,
            std: 0.3081,
        }
    }
}

impl TensorSpec {
    fn pixels(&self) -> usize {
        self.height * self.width
    }

    fn expected(&self) -> String {
        let (h, w) = (self.height, self.width);
        format!("({0},), ({h}, {w}), (N, {h}, {w}) or (N, 1, {h}, {w})", h * w)
    }
}

/// A raw numeric array as received from a caller: explicit shape plus flat
/// row-major data. Not retained after the request completes.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBatch {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl RawBatch {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if shape.is_empty() || expected != data.len() {
            return Err(PerceptError::Shape {
                expected: format!("{expected} elements for shape {shape:?}"),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { shape, data })
    }

    /// Parse a nested JSON numeric array into shape + flat data.
    ///
    /// The nesting depth defines the rank; every level must be rectangular
    /// and every leaf numeric.
    pub fn from_json(value: &Value) -> Result<Self> {
        let mut shape = Vec::new();
        let mut probe = value;
        while let Value::Array(items) = probe {
            shape.push(items.len());
            match items.first() {
                Some(first) => probe = first,
                None => break,
            }
        }
        if shape.is_empty() {
            return Err(PerceptError::Shape {
                expected: "a nested numeric array".to_string(),
                actual: format!("{value}"),
            });
        }

        let mut data = Vec::with_capacity(shape.iter().product());
        flatten_into(value, &shape, 0, &mut data)?;
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn flatten_into(value: &Value, shape: &[usize], depth: usize, out: &mut Vec<f32>) -> Result<()> {
    match value {
        Value::Array(items) => {
            if depth >= shape.len() || items.len() != shape[depth] {
                return Err(PerceptError::Shape {
                    expected: format!("rectangular array of shape {shape:?}"),
                    actual: "ragged nesting".to_string(),
                });
            }
            for item in items {
                flatten_into(item, shape, depth + 1, out)?;
            }
            Ok(())
        }
        Value::Number(n) => {
            if depth != shape.len() {
                return Err(PerceptError::Shape {
                    expected: format!("rectangular array of shape {shape:?}"),
                    actual: "ragged nesting".to_string(),
                });
            }
            let v = n.as_f64().ok_or_else(|| PerceptError::Shape {
                expected: "finite numeric values".to_string(),
                actual: format!("{n}"),
            })?;
            out.push(v as f32);
            Ok(())
        }
        other => Err(PerceptError::Shape {
            expected: "numeric values".to_string(),
            actual: format!("{other}"),
        }),
    }
}

/// Input adapter for raw numeric arrays
#[derive(Debug, Clone)]
pub struct RawArrayAdapter {
    spec: TensorSpec,
}

impl RawArrayAdapter {
    pub fn new(spec: TensorSpec) -> Self {
        Self { spec }
    }

    /// Resolve the supported shape classes down to (N, H, W)
    fn batch_count(&self, raw: &RawBatch) -> Result<usize> {
        let spec = &self.spec;
        let shape = raw.shape();
        let shape_err = |actual: String| PerceptError::Shape {
            expected: spec.expected(),
            actual,
        };

        match shape {
            &[len] => {
                if len == 0 || len % spec.pixels() != 0 {
                    return Err(shape_err(format!("({len},)")));
                }
                Ok(len / spec.pixels())
            }
            &[h, w] => {
                if (h, w) != (spec.height, spec.width) {
                    return Err(shape_err(format!("({h}, {w})")));
                }
                Ok(1)
            }
            &[n, h, w] => {
                if (h, w) != (spec.height, spec.width) {
                    return Err(shape_err(format!("({n}, {h}, {w})")));
                }
                Ok(n)
            }
            &[n, c, h, w] => {
                // The channel axis must really be singleton; a silent
                // squeeze of a non-singleton axis would reinterpret data.
                if c != 1 || (h, w) != (spec.height, spec.width) {
                    return Err(shape_err(format!("({n}, {c}, {h}, {w})")));
                }
                Ok(n)
            }
            _ => Err(shape_err(format!("rank-{} array {shape:?}", shape.len()))),
        }
    }
}

impl InputAdapter for RawArrayAdapter {
    type Raw = RawBatch;

    fn adapt(&self, raw: &RawBatch) -> Result<ArrayD<f32>> {
        let n = self.batch_count(raw)?;
        let spec = &self.spec;

        let standardized: Vec<f32> = raw
            .data
            .iter()
            .map(|&x| (x - spec.mean) / spec.std)
            .collect();

        let tensor = Array4::from_shape_vec((n, 1, spec.height, spec.width), standardized)
            .map_err(|e| PerceptError::Shape {
                expected: spec.expected(),
                actual: e.to_string(),
            })?;

        Ok(tensor.into_dyn())
    }
}

//! Inference pipeline
//!
//! One generic shape-normalize → forward-pass → decode skeleton shared by
//! both prediction paths, parameterized by an input adapter and an output
//! decoder:
//! - batch arrays: [`RawArrayAdapter`] + [`ArgmaxDecoder`]
//! - encoded images: [`ImageAdapter`] + [`TopLabelDecoder`]
//!
//! The pipeline is stateless per request. The model handle behind the
//! [`Forward`] seam is read-only during inference, so concurrent requests
//! run in parallel without mutual exclusion.

mod decode;
mod encode;
mod image;
mod normalize;

pub use decode::{argmax, softmax, ArgmaxDecoder, ClassPrediction, TopLabelDecoder};
pub use encode::{encode_batch, encode_event, BatchPrediction, EventResponse, PredictionRecord};
pub use image::{ImageAdapter, PreprocessRecipe};
pub use normalize::{RawArrayAdapter, RawBatch, TensorSpec};

use std::sync::Arc;

use ndarray::{Array2, ArrayD, Ix2};

use crate::error::{PerceptError, Result};

/// A no-gradient forward pass producing output logits from a canonical
/// tensor. Implemented by [`crate::model::ModelHandle`] and by
/// deterministic test doubles.
pub trait Forward: Send + Sync {
    fn forward(&self, input: ArrayD<f32>) -> Result<ArrayD<f32>>;
}

/// Canonicalizes one raw input class into the tensor the model expects
pub trait InputAdapter: Send + Sync {
    type Raw;

    fn adapt(&self, raw: &Self::Raw) -> Result<ArrayD<f32>>;
}

/// Decodes output logits into host-representable prediction results
pub trait OutputDecoder: Send + Sync {
    type Output;

    fn decode(&self, logits: &Array2<f32>) -> Result<Self::Output>;
}

/// The shared inference pipeline for one (adapter, decoder) pairing
pub struct Pipeline<A, D> {
    model: Arc<dyn Forward>,
    adapter: A,
    decoder: D,
}

impl<A, D> Pipeline<A, D>
where
    A: InputAdapter,
    D: OutputDecoder,
{
    pub fn new(model: Arc<dyn Forward>, adapter: A, decoder: D) -> Self {
        Self {
            model,
            adapter,
            decoder,
        }
    }

    /// Run one request through the pipeline.
    ///
    /// Either the whole input succeeds or the whole input fails; no partial
    /// results are produced for a failed batch.
    pub fn run(&self, raw: &A::Raw) -> Result<D::Output> {
        let tensor = self.adapter.adapt(raw)?;
        let batch = tensor.shape()[0];

        let logits = self.model.forward(tensor)?;
        let logits = logits.into_dimensionality::<Ix2>().map_err(|_| {
            PerceptError::Inference("model output is not a rank-2 logits array".to_string())
        })?;
        if logits.nrows() != batch {
            return Err(PerceptError::Inference(format!(
                "model returned {} rows for a batch of {batch}",
                logits.nrows()
            )));
        }

        self.decoder.decode(&logits)
    }
}

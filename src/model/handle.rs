//! Loaded model handle
//!
//! Wraps an ONNX Runtime session together with the device it was bound to.
//! Sessions are inference-only by construction: evaluation-mode semantics
//! (no training-mode layers, no gradient graph) are fixed when the artifact
//! is exported, and `Session::run` takes `&self`, so concurrent requests
//! share one handle without mutual exclusion.

use std::path::{Path, PathBuf};

use ndarray::{ArrayD, CowArray};
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;

use crate::device::DeviceKind;
use crate::error::{PerceptError, Result};
use crate::pipeline::Forward;

/// An immutable, evaluation-mode model bound to a specific device
pub struct ModelHandle {
    session: Session,
    device: DeviceKind,
    path: PathBuf,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("path", &self.path)
            .field("device", &self.device)
            .finish()
    }
}

impl ModelHandle {
    /// Load the ONNX artifact at `path` onto `device`.
    ///
    /// The artifact must exist and be a valid serialized model; a missing
    /// file is an [`PerceptError::ArtifactNotFound`], which is fatal at
    /// startup. Device memory allocated for the parameters persists for the
    /// process lifetime (there is no unload operation).
    pub fn load(path: &Path, device: DeviceKind) -> Result<Self> {
        if !path.exists() {
            return Err(PerceptError::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }

        let session = SessionBuilder::new()
            .and_then(|builder| builder.with_execution_providers(device.execution_providers()))
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.commit_from_file(path))
            .map_err(|e| PerceptError::ModelLoad(e.to_string()))?;

        tracing::info!(path = %path.display(), device = %device, "model loaded");

        Ok(Self {
            session,
            device,
            path: path.to_path_buf(),
        })
    }

    pub fn device(&self) -> DeviceKind {
        self.device
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Forward for ModelHandle {
    /// Run a single forward pass and return the raw output logits.
    ///
    /// Pure inference: no parameter updates, no retained graph. The output
    /// is copied off the device into a host-resident array before returning.
    fn forward(&self, input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let input = CowArray::from(input);
        let inputs = ort::inputs![input.view()]
            .map_err(|e| PerceptError::Inference(format!("input binding failed: {e}")))?;

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| PerceptError::Inference(e.to_string()))?;

        let logits = outputs
            .iter()
            .next()
            .ok_or_else(|| PerceptError::Inference("model produced no outputs".to_string()))
            .and_then(|(_name, value)| {
                value
                    .try_extract_tensor::<f32>()
                    .map(|t| t.into_owned())
                    .map_err(|e| PerceptError::Inference(format!("output extraction failed: {e}")))
            })?;

        Ok(logits)
    }
}

//! Error types for the percept inference service

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for percept operations
pub type Result<T> = std::result::Result<T, PerceptError>;

/// Main error type for the inference pipeline
#[derive(Error, Debug)]
pub enum PerceptError {
    /// The serialized model artifact is missing at the configured path.
    /// Fatal at startup: the process never becomes ready without it.
    #[error(
        "model artifact not found at {path}; export the trained network to ONNX \
         (`export-onnx`) and place the file at this path"
    )]
    ArtifactNotFound { path: PathBuf },

    #[error("invalid input shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    /// Requested execution backend is not present. Never a hard failure:
    /// callers fall back to the next-priority device.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    #[error("label table error: {0}")]
    LabelTable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PerceptError::Shape {
            expected: "(N, H, W)".to_string(),
            actual: "rank-5".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid input shape: expected (N, H, W), got rank-5"
        );
    }

    #[test]
    fn test_artifact_not_found_names_path_and_export_step() {
        let err = PerceptError::ArtifactNotFound {
            path: PathBuf::from("/models/digits.onnx"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/models/digits.onnx"));
        assert!(msg.contains("export-onnx"));
    }
}

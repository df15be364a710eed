//! Service configuration
//!
//! All settings come from environment variables with documented defaults,
//! so both deployment shapes (HTTP service and event handler) can be
//! configured without a config file.

use std::path::PathBuf;
use std::str::FromStr;

use crate::device::DeviceKind;

/// Runtime settings shared by the HTTP service and the event handler
#[derive(Debug, Clone)]
pub struct Settings {
    /// Optional device override; `None` means auto-select
    pub device: Option<DeviceKind>,
    /// ONNX artifact for the batch digit classifier
    pub model_path: PathBuf,
    /// ONNX artifact for the single-image classifier
    pub image_model_path: PathBuf,
    /// Ordered label table for the single-image classifier
    pub labels_path: PathBuf,
    /// Key prefix under which prediction records are persisted
    pub predictions_prefix: String,
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body size in bytes
    pub max_body_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let device = std::env::var("DEVICE").ok().and_then(|raw| {
            match DeviceKind::from_str(&raw) {
                Ok(kind) => Some(kind),
                Err(err) => {
                    tracing::warn!(requested = %raw, %err, "ignoring device override");
                    None
                }
            }
        });

        Self {
            device,
            model_path: std::env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./models/digits.onnx")),
            image_model_path: std::env::var("IMAGE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./models/efficientnet_b0.onnx")),
            labels_path: std::env::var("LABELS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./models/labels.txt")),
            predictions_prefix: std::env::var("PREDICTIONS_PREFIX")
                .unwrap_or_else(|_| "predictions/".to_string()),
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16 * 1024 * 1024), // 16MB
        }
    }
}

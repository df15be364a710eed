//! Execution backend selection
//!
//! Probes ONNX Runtime execution providers in fixed priority order
//! (TensorRT, then CUDA, then CPU) and returns the first available backend.
//! CPU is always assumed available as the final fallback, so selection has
//! no error path. Selection happens once at startup; the chosen backend is
//! invariant for the process lifetime.

use std::fmt;
use std::str::FromStr;

use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, ExecutionProvider,
    ExecutionProviderDispatch, TensorRTExecutionProvider,
};
use serde::{Deserialize, Serialize};

use crate::error::PerceptError;

/// Execution backend tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    TensorRt,
    Cuda,
    Cpu,
}

impl DeviceKind {
    /// Whether this backend is usable in the current process environment
    pub fn is_available(self) -> bool {
        match self {
            DeviceKind::TensorRt => TensorRTExecutionProvider::default()
                .is_available()
                .unwrap_or(false),
            DeviceKind::Cuda => CUDAExecutionProvider::default()
                .is_available()
                .unwrap_or(false),
            DeviceKind::Cpu => true,
        }
    }

    /// Execution-provider registration list for a session bound to this
    /// backend. Accelerated backends keep CPU at the end of the list so a
    /// session never fails to place a node.
    pub(crate) fn execution_providers(self) -> Vec<ExecutionProviderDispatch> {
        match self {
            DeviceKind::TensorRt => vec![
                TensorRTExecutionProvider::default().build(),
                CUDAExecutionProvider::default().build(),
                CPUExecutionProvider::default().build(),
            ],
            DeviceKind::Cuda => vec![
                CUDAExecutionProvider::default().build(),
                CPUExecutionProvider::default().build(),
            ],
            DeviceKind::Cpu => vec![CPUExecutionProvider::default().build()],
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::TensorRt => write!(f, "tensorrt"),
            DeviceKind::Cuda => write!(f, "cuda"),
            DeviceKind::Cpu => write!(f, "cpu"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = PerceptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tensorrt" | "trt" => Ok(DeviceKind::TensorRt),
            "cuda" | "gpu" => Ok(DeviceKind::Cuda),
            "cpu" => Ok(DeviceKind::Cpu),
            other => Err(PerceptError::DeviceUnavailable(format!(
                "unknown execution backend '{other}', expected one of: tensorrt, cuda, cpu"
            ))),
        }
    }
}

/// Probe backends in priority order and return the first available one.
///
/// Pure function of the process environment; called once at startup.
pub fn select_device() -> DeviceKind {
    for kind in [DeviceKind::TensorRt, DeviceKind::Cuda] {
        if kind.is_available() {
            tracing::debug!(device = %kind, "accelerator available");
            return kind;
        }
    }
    DeviceKind::Cpu
}

/// Resolve the effective device from an optional configured override.
///
/// An override naming an unavailable backend is not a hard failure: it logs
/// a warning and falls back to automatic selection.
pub fn resolve_device(requested: Option<DeviceKind>) -> DeviceKind {
    match requested {
        Some(kind) if kind.is_available() => kind,
        Some(kind) => {
            tracing::warn!(
                requested = %kind,
                "requested device unavailable, falling back to auto-selection"
            );
            select_device()
        }
        None => select_device(),
    }
}

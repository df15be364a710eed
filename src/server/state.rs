//! Application state shared across handlers

use std::sync::Arc;

use crate::config::Settings;
use crate::device::DeviceKind;
use crate::pipeline::{ArgmaxDecoder, Forward, Pipeline, RawArrayAdapter, TensorSpec};

/// Warm state built once at startup; "ready" is the only state that serves
/// requests.
pub struct AppState {
    pub settings: Settings,
    pub device: DeviceKind,
    pub pipeline: Pipeline<RawArrayAdapter, ArgmaxDecoder>,
}

impl AppState {
    pub fn new(settings: Settings, device: DeviceKind, model: Arc<dyn Forward>) -> Self {
        let pipeline = Pipeline::new(
            model,
            RawArrayAdapter::new(TensorSpec::default()),
            ArgmaxDecoder,
        );
        Self {
            settings,
            device,
            pipeline,
        }
    }
}

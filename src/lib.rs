//! percept - image-classification inference service
//!
//! Serves predictions from a pretrained classifier through two deployment
//! shapes: a synchronous HTTP service and an event-driven handler triggered
//! by object-storage uploads. Both share one inference core:
//!
//! - [`device`] - execution backend probing and selection
//! - [`model`] - ONNX artifact loading, memoized per (path, device)
//! - [`pipeline`] - input normalization, forward pass, result decoding
//!
//! plus the thin boundaries around it:
//!
//! - [`server`] - axum HTTP service (`POST /classify`)
//! - [`events`] - object-upload event handler
//! - [`cli`] - command-line entrypoints
//! - [`config`] - environment-driven settings

pub mod error;

pub mod config;
pub mod device;
pub mod model;
pub mod pipeline;

pub mod cli;
pub mod events;
pub mod server;

pub use error::{PerceptError, Result};

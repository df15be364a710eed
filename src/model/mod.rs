//! Model loading and caching
//!
//! Loads a serialized ONNX artifact into an inference session bound to a
//! selected device and memoizes the loaded handle for the process lifetime.
//! A handle is loaded at most once per (artifact path, device) pair; the
//! cache serializes concurrent first calls so exactly one artifact read and
//! one device-memory allocation occurs.

mod cache;
mod handle;
mod labels;

pub use cache::ModelCache;
pub use handle::ModelHandle;
pub use labels::LabelTable;

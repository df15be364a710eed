//! Object-upload event handling
//!
//! The event-driven deployment shape: an upload notification names a bucket
//! and object key, the handler classifies the uploaded image and persists
//! the prediction record as a JSON object under a derived key next to the
//! source object.

mod store;

pub use store::{FsObjectStore, MemoryObjectStore, ObjectStore};

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PerceptError, Result};
use crate::pipeline::{
    encode_event, EventResponse, ImageAdapter, Pipeline, TopLabelDecoder,
};

/// An object-storage upload notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEvent {
    pub bucket: String,
    pub key: String,
}

/// Derive the key under which a prediction record is persisted:
/// `<prefix><stem>_prediction_<YYYYmmddHHMMSS>.json`
pub fn derive_output_key(prefix: &str, source_key: &str, at: DateTime<Utc>) -> String {
    let stem = Path::new(source_key)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "object".to_string());
    format!("{prefix}{stem}_prediction_{}.json", at.format("%Y%m%d%H%M%S"))
}

/// Handle one upload event end to end.
///
/// Fetches the object, decodes it as an image, runs the single-image
/// pipeline, persists the prediction record, and returns the response the
/// trigger collaborator reports. Failures surface to the caller; nothing is
/// retried here and the warm process stays ready for the next event.
pub fn handle_object_event(
    event: &ObjectEvent,
    store: &dyn ObjectStore,
    pipeline: &Pipeline<ImageAdapter, TopLabelDecoder>,
    predictions_prefix: &str,
) -> Result<EventResponse> {
    info!(bucket = %event.bucket, key = %event.key, "received object event");

    let bytes = store.get_object(&event.bucket, &event.key)?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| PerceptError::ImageDecode(format!("{}: {e}", event.key)))?;

    debug!(key = %event.key, "running prediction");
    let predictions = pipeline.run(&image)?;
    let top = predictions
        .into_iter()
        .next()
        .ok_or_else(|| PerceptError::Inference("model produced an empty batch".to_string()))?;

    let response = encode_event(event.key.clone(), top);

    let output_key = derive_output_key(predictions_prefix, &event.key, Utc::now());
    debug!(bucket = %event.bucket, key = %output_key, "persisting prediction record");
    store.put_object(
        &event.bucket,
        &output_key,
        &serde_json::to_vec(&response.body)?,
    )?;

    info!(
        key = %event.key,
        class_id = response.body.class_id,
        class_name = %response.body.class_name,
        score = response.body.score,
        "prediction persisted"
    );
    Ok(response)
}

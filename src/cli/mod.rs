//! Command-line interface
//!
//! Three entrypoints: the HTTP service, a one-shot single-image
//! classification, and a local run of the object-event handler against a
//! filesystem store.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::device::resolve_device;
use crate::events::{handle_object_event, FsObjectStore, ObjectEvent};
use crate::model::{LabelTable, ModelCache, ModelHandle};
use crate::pipeline::{
    encode_event, ImageAdapter, Pipeline, PreprocessRecipe, TopLabelDecoder,
};
use crate::server::run_server;

#[derive(Parser)]
#[command(name = "percept")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Image-classification inference service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP classification service
    Serve {
        /// Bind host (overrides API_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides API_PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Classify a single image file and print the prediction record
    Classify {
        /// Path to the image file
        image: PathBuf,
    },

    /// Run the object-event handler against a filesystem store root
    HandleEvent {
        /// Store root directory (buckets are subdirectories)
        #[arg(long)]
        root: PathBuf,

        /// Bucket holding the uploaded object
        #[arg(long)]
        bucket: String,

        /// Key of the uploaded object
        #[arg(long)]
        key: String,
    },
}

/// Build the single-image pipeline from settings: resolve the device, load
/// the model through the cache, read the label table.
fn image_pipeline(settings: &Settings) -> anyhow::Result<Pipeline<ImageAdapter, TopLabelDecoder>> {
    let device = resolve_device(settings.device);
    tracing::info!(device = %device, "selected execution backend");

    let cache = ModelCache::new();
    let model = cache.get_or_load(&settings.image_model_path, device, || {
        ModelHandle::load(&settings.image_model_path, device)
    })?;
    let labels = Arc::new(LabelTable::from_file(&settings.labels_path)?);

    Ok(Pipeline::new(
        model,
        ImageAdapter::new(PreprocessRecipe::default()),
        TopLabelDecoder::new(labels),
    ))
}

pub async fn cmd_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut settings = Settings::default();
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }
    run_server(settings).await
}

pub fn cmd_classify(image_path: &PathBuf) -> anyhow::Result<()> {
    let settings = Settings::default();
    let pipeline = image_pipeline(&settings)?;

    let bytes = std::fs::read(image_path)?;
    let image = image::load_from_memory(&bytes)?;
    let prediction = pipeline
        .run(&image)?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("model produced an empty batch"))?;

    let response = encode_event(image_path.display().to_string(), prediction);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub fn cmd_handle_event(root: PathBuf, bucket: String, key: String) -> anyhow::Result<()> {
    let settings = Settings::default();
    let pipeline = image_pipeline(&settings)?;
    let store = FsObjectStore::new(root);
    let event = ObjectEvent { bucket, key };

    let response = handle_object_event(&event, &store, &pipeline, &settings.predictions_prefix)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

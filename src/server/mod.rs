//! HTTP classification service
//!
//! The synchronous deployment shape: one endpoint accepting a JSON batch of
//! raw arrays and returning index-aligned class predictions. Warm-up
//! (device selection and model loading) happens before the listener binds;
//! a warm-up failure aborts startup and the process never becomes ready.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::device::resolve_device;
use crate::model::{ModelCache, ModelHandle};

/// Warm up and run the service until shutdown.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let device = resolve_device(settings.device);
    info!(device = %device, "selected execution backend");

    let cache = ModelCache::new();
    let model = cache.get_or_load(&settings.model_path, device, || {
        ModelHandle::load(&settings.model_path, device)
    })?;

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    let state = Arc::new(AppState::new(settings, device, model));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "server listening and ready");

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("shutdown signal received, stopping server gracefully");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("server shut down cleanly");
    Ok(())
}

//! Backend entry-point: loads configuration, starts the cleanup worker and
//! serves the REST API.

mod server;

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use blog_backend::domain::TagCleanupWorker;
use blog_backend::inbound::http::health::HealthState;
use blog_backend::inbound::http::session_config::{BuildMode, session_settings};
use blog_backend::outbound::persistence::InMemoryStore;
use blog_backend::outbound::queue::ChannelTagCleanupQueue;
use blog_backend::settings::AppSettings;
use ortho_config::OrthoConfig;
use server::{ServerConfig, create_server};

const CLEANUP_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os()).map_err(|error| {
        std::io::Error::other(format!("failed to load configuration: {error}"))
    })?;
    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let store = Arc::new(InMemoryStore::new());
    let worker = TagCleanupWorker::new(Arc::clone(&store), settings.retry_policy());
    let (queue, cleanup_handle) = ChannelTagCleanupQueue::spawn(worker);

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(session, settings.bind_addr())
        .with_post_options(settings.post_service_options());
    info!(bind_addr = %settings.bind_addr(), "starting blog backend");
    let server = create_server(health_state.clone(), config, store, Arc::new(queue))?;
    let result = server.await;

    health_state.mark_unhealthy();
    match tokio::time::timeout(CLEANUP_DRAIN_TIMEOUT, cleanup_handle.finish()).await {
        Ok(Ok(processed)) => info!(processed, "tag cleanup drained"),
        Ok(Err(error)) => warn!(%error, "tag cleanup worker failed"),
        Err(_) => warn!("tag cleanup did not drain before shutdown"),
    }
    result
}

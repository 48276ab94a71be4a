//! `agora-rest-svc` — gateway binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (tracing, optional OTLP export).
//! 3. Build the core collaborators: content store, response cache,
//!    maintenance flag, token verifier.
//! 4. Register every endpoint with the [`dispatch::EndpointRegistry`].
//! 5. Assemble the [`dispatch::Dispatcher`].
//! 6. Build the Axum router and start the server.

mod cache;
mod config;
mod dispatch;
mod endpoints;
mod listing;
mod maintenance;
mod server;
mod store;
mod telemetry;
mod token;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use cache::ResponseCache;
use config::Config;
use dispatch::Dispatcher;
use maintenance::MaintenanceMode;
use server::state::AppState;
use store::ContentStore;
use token::{Clock, SystemClock, TokenVerifier};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "agora-rest-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Core collaborators
    // -----------------------------------------------------------------------
    let store = ContentStore::new();
    let response_cache = ResponseCache::new();
    let maintenance = MaintenanceMode::new(cfg.maintenance_mode);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // -----------------------------------------------------------------------
    // 4. Endpoint registry
    // -----------------------------------------------------------------------
    let registry = endpoints::register_all(
        store,
        response_cache.clone(),
        clock.clone(),
        cfg.default_items_per_page,
    );
    info!(endpoints = registry.len(), "endpoint registry built");

    // -----------------------------------------------------------------------
    // 5. Dispatcher
    // -----------------------------------------------------------------------
    let verifier = TokenVerifier::new(&cfg.token_passphrase, cfg.shared_secret.clone(), clock);
    let dispatcher = Arc::new(Dispatcher::new(registry, response_cache.clone(), verifier));

    // -----------------------------------------------------------------------
    // 6. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(
        dispatcher,
        response_cache,
        maintenance,
        cfg.domain_header_name.clone(),
    );
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

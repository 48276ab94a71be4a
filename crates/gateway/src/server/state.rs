//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::dispatch::{Dispatcher, EndpointRegistry};
use crate::maintenance::MaintenanceMode;
use crate::token::{SystemClock, TokenVerifier};

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed) so
/// that Axum can clone the state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// The endpoint dispatcher — routing, policy, and response caching.
    pub dispatcher: Arc<Dispatcher>,
    /// Handle to the response cache, for health reporting.
    pub cache: ResponseCache,
    /// Runtime-flippable maintenance flag, snapshotted per request.
    pub maintenance: MaintenanceMode,
    /// Name of the HTTP header carrying the active domain.
    pub domain_header_name: Arc<String>,
}

impl AppState {
    /// Create a new [`AppState`] from the assembled collaborators.
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        cache: ResponseCache,
        maintenance: MaintenanceMode,
        domain_header_name: String,
    ) -> Self {
        Self {
            dispatcher,
            cache,
            maintenance,
            domain_header_name: Arc::new(domain_header_name),
        }
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] with an empty endpoint registry,
    /// suitable for tests.
    fn default() -> Self {
        let cache = ResponseCache::new();
        let verifier = TokenVerifier::new("test-passphrase", "test-secret", Arc::new(SystemClock));
        let dispatcher = Arc::new(Dispatcher::new(
            EndpointRegistry::new(),
            cache.clone(),
            verifier,
        ));
        Self::new(
            dispatcher,
            cache,
            MaintenanceMode::default(),
            "X-Agora-Domain".into(),
        )
    }
}

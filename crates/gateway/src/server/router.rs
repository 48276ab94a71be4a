//! Axum router construction.

use axum::{
    routing::{get, on, MethodFilter},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    let dispatch = MethodFilter::GET.or(MethodFilter::POST);
    Router::new()
        .route("/api/:key", on(dispatch, handlers::dispatch_key))
        .route("/api/:key/:id", on(dispatch, handlers::dispatch_key_id))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .with_state(state)
}

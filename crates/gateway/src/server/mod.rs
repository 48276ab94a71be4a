//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router: the `/api/{key}` dispatch surface plus health
//!   and fallback routes, with shared middleware layers.
//! - Translate inbound requests into [`crate::dispatch::RequestContext`]
//!   values and dispatcher outcomes back into HTTP responses.
//! - Inject shared application state (`AppState`) into handlers.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

//! OpenTelemetry setup: traces and structured logs.
//!
//! Spans are exported via OTLP/gRPC when an endpoint is configured; without
//! one the subscriber stays local (JSON-formatted stdout logs only).
//!
//! # Telemetry invariants
//!
//! - **No token material or shared secrets** must appear in any span
//!   attribute or log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;

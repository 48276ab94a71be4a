//! The dispatch error taxonomy shared across crates.
//!
//! Handlers return [`DispatchError`]; the dispatcher is the single place that
//! converts every variant into a concrete HTTP status and a caller-safe
//! message. Several status choices are historical contract and intentionally
//! differ from what a fresh design would pick:
//!
//! - [`DispatchError::TokenRejected`] → 500, not 400
//! - an unknown endpoint key → 500, not 404 (produced by the dispatcher, not
//!   a variant here)
//! - a known key with the wrong HTTP verb → 404, not 405

use thiserror::Error;

/// Message surfaced for missing entities and wrong-verb requests.
pub const NOT_FOUND_MESSAGE: &str = "The requested resource cannot be found on this server.";

/// Message surfaced for rejected request bodies and token failures.
///
/// The required-field names are never disclosed, to resist probing.
pub const REJECTED_MESSAGE: &str = "The server rejected the request.";

/// Errors a response-key handler (or the dispatcher itself) can produce.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request body or parameters failed validation. → 400
    #[error("{0}")]
    MalformedRequest(String),

    /// A shielded-token check failed. → 500 (historical contract, not 400).
    ///
    /// The inner string is the internal reason, for logs only; callers see
    /// [`REJECTED_MESSAGE`].
    #[error("shielded token rejected: {0}")]
    TokenRejected(String),

    /// A business-rule refusal with a handler-chosen status code, e.g. 403
    /// when a participation phase is closed.
    #[error("{message}")]
    Status { code: u16, message: String },

    /// The addressed entity does not exist. → 404
    #[error("{NOT_FOUND_MESSAGE}")]
    NotFound,

    /// Any other failure, surfaced with its own code (default 500) and
    /// logged at error level by the dispatcher.
    #[error("{message}")]
    Unhandled { code: u16, message: String },
}

impl DispatchError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            DispatchError::MalformedRequest(_) => 400,
            DispatchError::TokenRejected(_) => 500,
            DispatchError::Status { code, .. } => *code,
            DispatchError::NotFound => 404,
            DispatchError::Unhandled { code, .. } => *code,
        }
    }

    /// Returns the message safe to expose to callers.
    ///
    /// Token failures collapse to the generic rejection message so that the
    /// cipher, secret, and replay window cannot be probed.
    pub fn public_message(&self) -> String {
        match self {
            DispatchError::TokenRejected(_) => REJECTED_MESSAGE.to_owned(),
            other => other.to_string(),
        }
    }

    /// Shorthand for an [`DispatchError::Unhandled`] with the default 500 code.
    pub fn unhandled(message: impl Into<String>) -> Self {
        DispatchError::Unhandled {
            code: 500,
            message: message.into(),
        }
    }
}

//! Request and response types exchanged between the dispatcher and callers.
//!
//! Every API response uses the envelope `{"status": "success"|"error",
//! "data": <payload-or-message>}`. The body is pretty-printed JSON;
//! `serde_json` leaves unicode and slashes unescaped, which is the required
//! wire encoding.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Outcome marker carried in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// A fully-formed endpoint response: the envelope payload plus the HTTP
/// status code to send it with.
///
/// Constructed once per request by the dispatcher or a handler and treated
/// as immutable afterwards; cacheable responses are stored verbatim and
/// replayed on later hits.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseContent {
    pub status: ResponseStatus,
    /// Handler payload on success; the caller-safe message on error.
    pub data: Value,
    pub http_code: u16,
}

impl ResponseContent {
    /// A successful response with HTTP 200.
    pub fn success(data: Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
            http_code: 200,
        }
    }

    /// An error response carrying `message` and the given HTTP status.
    pub fn error(message: impl Into<String>, http_code: u16) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: Value::String(message.into()),
            http_code,
        }
    }

    /// The JSON envelope for this response.
    pub fn envelope(&self) -> Value {
        let status = match self.status {
            ResponseStatus::Success => "success",
            ResponseStatus::Error => "error",
        };
        json!({ "status": status, "data": self.data })
    }

    /// Serialise the envelope to the wire body (pretty-printed).
    pub fn to_body(&self) -> String {
        serde_json::to_string_pretty(&self.envelope())
            .unwrap_or_else(|_| r#"{"status":"error","data":"serialisation failure"}"#.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Cookies
// ---------------------------------------------------------------------------

/// A cookie a handler asks the server to set alongside its payload.
///
/// Issued only on cache-miss executions — a cache hit replays a response
/// that was fully formed on an earlier request and sets nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Lifetime in seconds; session cookie when absent.
    pub max_age_secs: Option<u64>,
    pub path: String,
}

impl Cookie {
    /// A session cookie scoped to `/`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            max_age_secs: None,
            path: "/".into(),
        }
    }

    /// Set the cookie lifetime in seconds.
    pub fn with_max_age(mut self, secs: u64) -> Self {
        self.max_age_secs = Some(secs);
        self
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Number of endpoint keys registered with the dispatcher.
    pub endpoints_registered: usize,
    /// Number of entries currently held by the response cache.
    pub cache_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let content = ResponseContent::success(json!({"nodes": []}));
        let env = content.envelope();
        assert_eq!(env["status"], "success");
        assert_eq!(env["data"]["nodes"], json!([]));
        assert_eq!(content.http_code, 200);
    }

    #[test]
    fn error_envelope_carries_message() {
        let content = ResponseContent::error("Unknown key: bogus", 500);
        let env = content.envelope();
        assert_eq!(env["status"], "error");
        assert_eq!(env["data"], "Unknown key: bogus");
        assert_eq!(content.http_code, 500);
    }

    #[test]
    fn body_is_pretty_printed() {
        let body = ResponseContent::success(json!({"a": 1})).to_body();
        // Pretty output spans multiple lines with indentation.
        assert!(body.contains('\n'));
        assert!(body.contains("  \"status\""));
    }

    #[test]
    fn body_leaves_unicode_and_slashes_unescaped() {
        let body = ResponseContent::success(json!({"text": "Bürgerbeteiligung a/b"})).to_body();
        assert!(body.contains("Bürgerbeteiligung a/b"));
        assert!(!body.contains("\\u"));
        assert!(!body.contains("\\/"));
    }

    #[test]
    fn cookie_builder() {
        let c = Cookie::new("agora_voted", "7,12").with_max_age(31_536_000);
        assert_eq!(c.path, "/");
        assert_eq!(c.max_age_secs, Some(31_536_000));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            endpoints_registered: 6,
            cache_entries: 2,
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.endpoints_registered, 6);
    }
}

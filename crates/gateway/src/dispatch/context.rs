//! Per-request context passed explicitly through dispatch and handlers.

use std::collections::{BTreeMap, HashMap};

use axum::http::Method;
use common::error::REJECTED_MESSAGE;
use common::DispatchError;
use serde_json::Value;

/// Query parameter that bypasses the cache read (the write still happens).
pub const PARAM_NO_CACHE: &str = "noCache";

/// Query parameter carrying the shielded-request token.
pub const PARAM_TOKEN: &str = "token";

/// Everything a handler may consult about the inbound request.
///
/// Built once per request by the server layer and passed by reference; there
/// is no hidden per-request state anywhere else.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Optional numeric entity id taken from the path.
    pub path_id: Option<u64>,
    pub query: BTreeMap<String, String>,
    pub cookies: HashMap<String, String>,
    /// Raw request body; JSON is parsed on demand via [`Self::json_body`].
    pub body: Vec<u8>,
    /// Active multi-tenancy domain, partitioning settings and cache entries.
    pub domain: String,
    /// Snapshot of the maintenance flag taken when the request arrived.
    pub maintenance_active: bool,
}

impl RequestContext {
    pub fn new(method: Method, domain: impl Into<String>) -> Self {
        Self {
            method,
            path_id: None,
            query: BTreeMap::new(),
            cookies: HashMap::new(),
            body: Vec::new(),
            domain: domain.into(),
            maintenance_active: false,
        }
    }

    pub fn with_path_id(mut self, id: u64) -> Self {
        self.path_id = Some(id);
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_maintenance(mut self, active: bool) -> Self {
        self.maintenance_active = active;
        self
    }

    /// Whether the request asked to bypass the cache read.
    pub fn no_cache(&self) -> bool {
        self.query.contains_key(PARAM_NO_CACHE)
    }

    /// The shielded-request token, if supplied.
    pub fn token(&self) -> Option<&str> {
        self.query.get(PARAM_TOKEN).map(String::as_str)
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// An empty or non-JSON body yields a [`DispatchError::MalformedRequest`]
    /// with the generic rejection message.
    pub fn json_body(&self) -> Result<Value, DispatchError> {
        if self.body.is_empty() {
            return Err(DispatchError::MalformedRequest(REJECTED_MESSAGE.into()));
        }
        serde_json::from_slice(&self.body)
            .map_err(|_| DispatchError::MalformedRequest(REJECTED_MESSAGE.into()))
    }

    /// Compose the cache key for this request under endpoint `key`:
    /// `{domain}/{key}/{pathId}{queryJson}`.
    ///
    /// `noCache` and `token` are transport concerns and excluded, so a
    /// `noCache` refresh writes the entry subsequent normal requests read.
    /// All other parameters participate, keeping cached entries fully
    /// reproducible from `(domain, key, pathId, query)`.
    pub fn cache_key(&self, key: &str) -> String {
        let filtered: BTreeMap<&String, &String> = self
            .query
            .iter()
            .filter(|(k, _)| k.as_str() != PARAM_NO_CACHE && k.as_str() != PARAM_TOKEN)
            .collect();
        let query_json = serde_json::to_string(&filtered).unwrap_or_else(|_| "{}".into());
        let id_part = self.path_id.map(|id| id.to_string()).unwrap_or_default();
        format!("{}/{}/{}{}", self.domain, key, id_part, query_json)
    }
}

//! Startup-time registry mapping endpoint keys to handler objects.

use std::collections::HashMap;
use std::sync::Arc;

use crate::endpoints::ResponseKey;

/// Registry of all endpoint handlers, keyed by lower-cased endpoint key.
///
/// Handlers are registered explicitly at startup (see
/// [`crate::endpoints::register_all`]) and the registry is immutable
/// afterwards, shared across requests via the dispatcher.
#[derive(Default)]
pub struct EndpointRegistry {
    endpoints: HashMap<String, Arc<dyn ResponseKey>>,
}

impl EndpointRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `key`.
    ///
    /// Keys are stored lower-cased; registering the same key again replaces
    /// the previous handler.
    pub fn register(&mut self, key: impl Into<String>, endpoint: Arc<dyn ResponseKey>) {
        self.endpoints.insert(key.into().to_lowercase(), endpoint);
    }

    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<Arc<dyn ResponseKey>> {
        self.endpoints.get(&key.to_lowercase()).cloned()
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

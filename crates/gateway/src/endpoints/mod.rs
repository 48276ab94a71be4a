//! Response-key endpoints: the handler contract and its implementations.
//!
//! Each endpoint declares its allowed methods, cacheability, and token
//! policy; the dispatcher enforces them. Handlers never see HTTP directly —
//! they turn a [`RequestContext`] into a JSON payload or a
//! [`DispatchError`].
//!
//! Every handler consults the request's maintenance snapshot first and
//! returns [`maintenance_payload`] when the platform is closed. The check
//! lives here rather than in the dispatcher so maintenance responses flow
//! through the cache like any other response.

pub mod add_comment;
pub mod add_contribution;
pub mod contribution_details;
pub mod contribution_list;
pub mod init;
pub mod rate;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::Method;
use common::error::REJECTED_MESSAGE;
use common::protocol::Cookie;
use common::DispatchError;
use serde_json::{json, Value};

use crate::cache::ResponseCache;
use crate::dispatch::{EndpointRegistry, RequestContext};
use crate::store::ContentStore;
use crate::token::Clock;

/// Contract every endpoint handler implements.
#[async_trait]
pub trait ResponseKey: Send + Sync {
    /// HTTP methods this endpoint answers to.
    fn methods(&self) -> &'static [Method];

    /// Whether successful responses are cached under the composite key.
    fn is_cacheable(&self) -> bool {
        false
    }

    /// Whether requests must carry a valid shielded token.
    fn requires_shielded_token(&self) -> bool {
        false
    }

    /// Produce the payload for this request.
    async fn execute(&self, ctx: &RequestContext) -> Result<Value, DispatchError>;

    /// Invalidation tags for this response, beyond the two automatic
    /// `agoraRestEndpoint` tags.
    fn cache_tags(&self, _ctx: &RequestContext) -> Vec<String> {
        Vec::new()
    }

    /// Cookies to set alongside a successful cache-miss execution.
    fn cookies(&self, _ctx: &RequestContext) -> Vec<Cookie> {
        Vec::new()
    }

    /// Pure payload transform applied on non-error paths before caching and
    /// serialisation. Used for whitelisting and reshaping.
    fn post_process(&self, payload: Value) -> Value {
        payload
    }
}

/// Fixed payload served by every handler while maintenance mode is active.
pub fn maintenance_payload() -> Value {
    json!({
        "maintenanceMode": true,
        "message": "The platform is temporarily unavailable for maintenance.",
    })
}

/// Require the body to be an object with EXACTLY the given keys.
///
/// Extra keys reject just like missing ones — payloads from anything but the
/// platform front end rarely match the exact set, which keeps naive spam
/// bots out. The message never names the expected fields.
pub(crate) fn require_exact_keys(body: &Value, required: &[&str]) -> Result<(), DispatchError> {
    let rejected = || DispatchError::MalformedRequest(REJECTED_MESSAGE.into());
    let map = body.as_object().ok_or_else(rejected)?;
    if map.len() != required.len() || !required.iter().all(|k| map.contains_key(*k)) {
        return Err(rejected());
    }
    Ok(())
}

/// Extract a required non-empty string field.
pub(crate) fn require_string(body: &Value, key: &str) -> Result<String, DispatchError> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| DispatchError::MalformedRequest(REJECTED_MESSAGE.into()))
}

/// Register every endpoint this gateway serves.
///
/// The explicit call list below is the complete routing table; there is no
/// runtime discovery.
pub fn register_all(
    store: ContentStore,
    cache: ResponseCache,
    clock: Arc<dyn Clock>,
    default_items_per_page: u64,
) -> EndpointRegistry {
    let mut registry = EndpointRegistry::new();
    registry.register("init", Arc::new(init::Init::new(store.clone())));
    registry.register(
        "contributionlist",
        Arc::new(contribution_list::ContributionList::new(
            store.clone(),
            default_items_per_page,
        )),
    );
    registry.register(
        "contributiondetails",
        Arc::new(contribution_details::ContributionDetails::new(store.clone())),
    );
    registry.register(
        "addcontribution",
        Arc::new(add_contribution::AddContribution::new(
            store.clone(),
            cache.clone(),
            clock.clone(),
        )),
    );
    registry.register(
        "addcomment",
        Arc::new(add_comment::AddComment::new(
            store.clone(),
            cache.clone(),
            clock,
        )),
    );
    registry.register("rate", Arc::new(rate::Rate::new(store, cache)));
    registry
}

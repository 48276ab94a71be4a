//! [`Dispatcher`]: the single entry point turning `(key, context)` into a
//! response, enforcing token, method, and cache policy around the handler.

use common::error::NOT_FOUND_MESSAGE;
use common::protocol::Cookie;
use common::{DispatchError, ResponseContent};
use tracing::{debug, error, info, warn};

use super::context::RequestContext;
use super::registry::EndpointRegistry;
use crate::cache::ResponseCache;
use crate::token::TokenVerifier;

/// Tag carried by every cached endpoint response.
pub const FEATURE_TAG: &str = "agoraRestEndpoint";

/// Routes a request to its handler and wraps the outcome.
///
/// Status-code choices here are historical contract, preserved literally:
/// unknown keys report 500 (not 404), a wrong verb on a known key reports
/// 404 (not 405), and token failures report 500 (not 400).
pub struct Dispatcher {
    registry: EndpointRegistry,
    cache: ResponseCache,
    verifier: TokenVerifier,
}

impl Dispatcher {
    pub fn new(registry: EndpointRegistry, cache: ResponseCache, verifier: TokenVerifier) -> Self {
        Self {
            registry,
            cache,
            verifier,
        }
    }

    /// Number of registered endpoint keys (health reporting).
    pub fn endpoint_count(&self) -> usize {
        self.registry.len()
    }

    /// Handle one request.
    ///
    /// Returns the response content plus any cookies the handler asked to
    /// set. Cookies are only ever produced by a cache-miss execution — a
    /// cache hit replays a fully-formed earlier response and sets none.
    pub async fn handle(&self, key: &str, ctx: &RequestContext) -> (ResponseContent, Vec<Cookie>) {
        let canonical = key.to_lowercase();
        let Some(endpoint) = self.registry.get(&canonical) else {
            info!(key, "request for unregistered endpoint key");
            return (
                ResponseContent::error(format!("Unknown key: {key}"), 500),
                Vec::new(),
            );
        };

        if endpoint.requires_shielded_token() {
            if let Err(reason) = self.verifier.verify(ctx.token()) {
                warn!(key, %reason, "shielded token rejected");
                let err = DispatchError::TokenRejected(reason.to_string());
                return (
                    ResponseContent::error(err.public_message(), err.http_status()),
                    Vec::new(),
                );
            }
        }

        if !endpoint.methods().contains(&ctx.method) {
            return (ResponseContent::error(NOT_FOUND_MESSAGE, 404), Vec::new());
        }

        let cacheable = endpoint.is_cacheable();
        let cache_key = ctx.cache_key(&canonical);
        if cacheable && !ctx.no_cache() {
            if let Some(cached) = self.cache.get(&cache_key).await {
                debug!(key, %cache_key, "response cache hit");
                return (cached, Vec::new());
            }
        }

        match endpoint.execute(ctx).await {
            Ok(payload) => {
                let payload = endpoint.post_process(payload);
                // A successful execution refreshes this endpoint's own tag.
                // Coarse on purpose: sibling entries of the same key are
                // purged; downstream listings are the handlers' business.
                let endpoint_tag = format!("{FEATURE_TAG}:{canonical}");
                self.cache.invalidate_tag(&endpoint_tag).await;

                let content = ResponseContent::success(payload);
                if cacheable {
                    let mut tags = endpoint.cache_tags(ctx);
                    tags.push(FEATURE_TAG.to_owned());
                    tags.push(endpoint_tag);
                    self.cache.put(cache_key, content.clone(), tags).await;
                }
                (content, endpoint.cookies(ctx))
            }
            Err(err) => {
                if let DispatchError::Unhandled { code, message } = &err {
                    error!(key, code = *code, %message, "endpoint execution failed");
                }
                (
                    ResponseContent::error(err.public_message(), err.http_status()),
                    Vec::new(),
                )
            }
        }
    }
}
